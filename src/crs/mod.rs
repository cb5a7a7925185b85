//! Coordinate reference system handling.
//!
//! Web vector data arrives in one of two CRSs in practice: geographic
//! WGS84 (EPSG:4326, the GeoJSON mandate) or Web Mercator (EPSG:3857).
//! This module identifies which one a dataset uses and converts Web
//! Mercator coordinates back to longitude/latitude degrees. Anything
//! else is rejected; a full projection engine is out of scope.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use geo::{Coord, Geometry, LineString, Point, Polygon};

use crate::error::{Error, Result};

/// WGS84 spherical radius used by the Web Mercator projection, in meters.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// Creates a CRS from an EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// Geographic WGS84 (EPSG:4326), longitude/latitude in degrees.
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857), easting/northing in meters.
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// Returns the EPSG code.
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees.
    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }

    /// Identifies the CRS described by a `.prj` sidecar file.
    ///
    /// # Arguments
    /// * wkt - the WKT contents of the `.prj` file.
    ///
    /// Recognizes the two CRSs used by web mapping: any top-level
    /// geographic coordinate system normalizes to EPSG:4326, and the
    /// Web Mercator spellings (Esri and OGC flavors, including the
    /// legacy 900913 code) normalize to EPSG:3857. Any other projected
    /// system fails with `UnsupportedCrs`.
    pub fn from_prj_wkt(wkt: &str) -> Result<Self> {
        let trimmed = wkt.trim_start();
        if trimmed.starts_with("GEOGCS") || trimmed.starts_with("GEOGCRS") {
            return Ok(Self::wgs84());
        }
        if wkt.contains("\"3857\"")
            || wkt.contains("\"900913\"")
            || wkt.contains("Pseudo-Mercator")
            || wkt.contains("Web_Mercator")
        {
            return Ok(Self::web_mercator());
        }
        Err(Error::UnsupportedCrs(
            first_quoted_name(wkt).unwrap_or("unnamed CRS").to_string(),
        ))
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Extracts the CRS name, which WKT stores as the first quoted string.
fn first_quoted_name(wkt: &str) -> Option<&str> {
    let start = wkt.find('"')? + 1;
    let len = wkt[start..].find('"')?;
    Some(&wkt[start..start + len])
}

/// Converts one Web Mercator coordinate to longitude/latitude degrees.
pub fn web_mercator_to_wgs84(coord: Coord) -> Coord {
    let lon = (coord.x / EARTH_RADIUS_M).to_degrees();
    let lat = ((coord.y / EARTH_RADIUS_M).exp().atan() * 2.0 - FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

/// Reprojects a geometry to geographic WGS84 coordinates.
///
/// Geographic input is returned unchanged, so reprojection is idempotent.
pub fn reproject_to_wgs84(geometry: &Geometry, from: &Crs) -> Result<Geometry> {
    if from.is_geographic() {
        return Ok(geometry.clone());
    }
    if *from == Crs::web_mercator() {
        return Ok(map_coords(geometry, web_mercator_to_wgs84));
    }
    Err(Error::UnsupportedCrs(from.to_string()))
}

/// Rebuilds a geometry with every coordinate passed through `f`.
pub fn map_coords<F>(geometry: &Geometry, f: F) -> Geometry
where
    F: Fn(Coord) -> Coord + Copy,
{
    match geometry {
        Geometry::Point(p) => Geometry::Point(Point(f(p.0))),
        Geometry::Line(l) => Geometry::Line(geo::Line::new(f(l.start), f(l.end))),
        Geometry::LineString(l) => Geometry::LineString(map_line_string(l, f)),
        Geometry::Polygon(p) => Geometry::Polygon(map_polygon(p, f)),
        Geometry::MultiPoint(m) => {
            Geometry::MultiPoint(geo::MultiPoint(m.0.iter().map(|p| Point(f(p.0))).collect()))
        }
        Geometry::MultiLineString(m) => Geometry::MultiLineString(geo::MultiLineString(
            m.0.iter().map(|l| map_line_string(l, f)).collect(),
        )),
        Geometry::MultiPolygon(m) => Geometry::MultiPolygon(geo::MultiPolygon(
            m.0.iter().map(|p| map_polygon(p, f)).collect(),
        )),
        Geometry::GeometryCollection(c) => Geometry::GeometryCollection(geo::GeometryCollection(
            c.0.iter().map(|g| map_coords(g, f)).collect(),
        )),
        Geometry::Rect(r) => Geometry::Rect(geo::Rect::new(f(r.min()), f(r.max()))),
        Geometry::Triangle(t) => Geometry::Triangle(geo::Triangle(f(t.0), f(t.1), f(t.2))),
    }
}

/// Visits every coordinate of a geometry in order.
pub fn for_each_coord<F>(geometry: &Geometry, f: &mut F)
where
    F: FnMut(Coord),
{
    match geometry {
        Geometry::Point(p) => f(p.0),
        Geometry::Line(l) => {
            f(l.start);
            f(l.end);
        }
        Geometry::LineString(l) => l.coords().for_each(|c| f(*c)),
        Geometry::Polygon(p) => {
            p.exterior().coords().for_each(|c| f(*c));
            for ring in p.interiors() {
                ring.coords().for_each(|c| f(*c));
            }
        }
        Geometry::MultiPoint(m) => m.0.iter().for_each(|p| f(p.0)),
        Geometry::MultiLineString(m) => {
            for line in &m.0 {
                line.coords().for_each(|c| f(*c));
            }
        }
        Geometry::MultiPolygon(m) => {
            for polygon in &m.0 {
                polygon.exterior().coords().for_each(|c| f(*c));
                for ring in polygon.interiors() {
                    ring.coords().for_each(|c| f(*c));
                }
            }
        }
        Geometry::GeometryCollection(c) => {
            for geometry in &c.0 {
                for_each_coord(geometry, f);
            }
        }
        Geometry::Rect(r) => {
            f(r.min());
            f(r.max());
        }
        Geometry::Triangle(t) => {
            f(t.0);
            f(t.1);
            f(t.2);
        }
    }
}

fn map_line_string<F>(line: &LineString, f: F) -> LineString
where
    F: Fn(Coord) -> Coord + Copy,
{
    LineString::new(line.coords().map(|c| f(*c)).collect())
}

fn map_polygon<F>(polygon: &Polygon, f: F) -> Polygon
where
    F: Fn(Coord) -> Coord + Copy,
{
    Polygon::new(
        map_line_string(polygon.exterior(), f),
        polygon
            .interiors()
            .iter()
            .map(|ring| map_line_string(ring, f))
            .collect(),
    )
}
