//! Shapefile reading.
//!
//! A shapefile dataset is a `.shp` geometry file with optional
//! sidecars: `.dbf` for the attribute table and `.prj` for the CRS.
//! Both sidecars are looked up next to the `.shp` path. A missing
//! `.dbf` yields attribute-less features; a missing `.prj` is taken
//! to mean geographic WGS84 coordinates.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geo::{Coord, LineString, Point, Polygon};
use shapefile::dbase::FieldValue;
use shapefile::PolygonRing;

use crate::crs::Crs;
use crate::error::Result;
use crate::vector::feature::{AttributeValue, Feature, FeatureCollection};

/// Reads a shapefile and its sidecars into a feature collection.
///
/// Shapes with no supported geometry (null shapes, multipatches) are
/// skipped; attribute rows stay aligned with their shapes by record
/// index.
pub fn read_shapefile(filepath: &Path) -> Result<FeatureCollection> {
    let crs = read_sidecar_crs(filepath)?;
    let attribute_rows = read_attribute_rows(filepath)?;
    let mut shape_reader = shapefile::ShapeReader::from_path(filepath)?;

    let mut collection = FeatureCollection::with_crs(crs);
    let mut num_shapes = 0;
    for (index, shape) in shape_reader.iter_shapes().enumerate() {
        num_shapes += 1;
        let Some(geometry) = convert_shape(shape?) else {
            continue;
        };
        let attributes = attribute_rows
            .as_ref()
            .and_then(|rows| rows.get(index))
            .cloned()
            .unwrap_or_default();
        collection.push(Feature::with_attributes(geometry, attributes));
    }
    if collection.len() != num_shapes {
        log::warn!(
            "Out of {} shapes read, only {} had a supported geometry.",
            num_shapes,
            collection.len()
        )
    }
    Ok(collection)
}

fn read_sidecar_crs(filepath: &Path) -> Result<Crs> {
    let prj_filepath = filepath.with_extension("prj");
    if !prj_filepath.exists() {
        log::warn!(
            "No .prj sidecar next to {}; assuming geographic WGS84 coordinates.",
            filepath.display()
        );
        return Ok(Crs::wgs84());
    }
    Crs::from_prj_wkt(&fs::read_to_string(&prj_filepath)?)
}

fn read_attribute_rows(filepath: &Path) -> Result<Option<Vec<HashMap<String, AttributeValue>>>> {
    let dbf_filepath = filepath.with_extension("dbf");
    if !dbf_filepath.exists() {
        return Ok(None);
    }
    let records = shapefile::dbase::Reader::from_path(&dbf_filepath)?.read()?;
    Ok(Some(records.into_iter().map(record_to_attributes).collect()))
}

fn record_to_attributes(record: shapefile::dbase::Record) -> HashMap<String, AttributeValue> {
    record
        .into_iter()
        .map(|(name, value)| (name, field_to_attribute(value)))
        .collect()
}

fn field_to_attribute(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::String(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => AttributeValue::Float(n),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
        FieldValue::Float(Some(f)) => AttributeValue::Float(f64::from(f)),
        FieldValue::Integer(i) => AttributeValue::Int(i64::from(i)),
        FieldValue::Double(d) => AttributeValue::Float(d),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Logical(None)
        | FieldValue::Float(None) => AttributeValue::Null,
        // Uncommon dBase types (dates, currency, memo) keep their debug text.
        other => AttributeValue::String(format!("{:?}", other)),
    }
}

// TODO support Multipatch shapes by converting their surface parts to polygons
fn convert_shape(shape: shapefile::Shape) -> Option<geo::Geometry> {
    match shape {
        shapefile::Shape::Point(p) => Some(point_geometry(&p)),
        shapefile::Shape::PointM(p) => Some(point_geometry(&p)),
        shapefile::Shape::PointZ(p) => Some(point_geometry(&p)),
        shapefile::Shape::Polyline(p) => Some(polyline_geometry(p.parts())),
        shapefile::Shape::PolylineM(p) => Some(polyline_geometry(p.parts())),
        shapefile::Shape::PolylineZ(p) => Some(polyline_geometry(p.parts())),
        shapefile::Shape::Polygon(p) => polygon_geometry(p.rings()),
        shapefile::Shape::PolygonM(p) => polygon_geometry(p.rings()),
        shapefile::Shape::PolygonZ(p) => polygon_geometry(p.rings()),
        shapefile::Shape::Multipoint(p) => Some(multipoint_geometry(p.points())),
        shapefile::Shape::MultipointM(p) => Some(multipoint_geometry(p.points())),
        shapefile::Shape::MultipointZ(p) => Some(multipoint_geometry(p.points())),
        shapefile::Shape::NullShape | shapefile::Shape::Multipatch(_) => None,
    }
}

/// Planar x/y access shared by the point, point-M and point-Z types.
trait HasXy {
    fn xy(&self) -> Coord;
}

impl HasXy for shapefile::Point {
    fn xy(&self) -> Coord {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl HasXy for shapefile::PointM {
    fn xy(&self) -> Coord {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl HasXy for shapefile::PointZ {
    fn xy(&self) -> Coord {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

fn point_geometry<P: HasXy>(point: &P) -> geo::Geometry {
    geo::Geometry::Point(Point(point.xy()))
}

fn multipoint_geometry<P: HasXy>(points: &[P]) -> geo::Geometry {
    geo::Geometry::MultiPoint(geo::MultiPoint(
        points.iter().map(|p| Point(p.xy())).collect(),
    ))
}

fn polyline_geometry<P: HasXy>(parts: &[Vec<P>]) -> geo::Geometry {
    let mut lines: Vec<LineString> = parts.iter().map(|part| part_to_line_string(part)).collect();
    if lines.len() == 1 {
        geo::Geometry::LineString(lines.remove(0))
    } else {
        geo::Geometry::MultiLineString(geo::MultiLineString(lines))
    }
}

/// Assembles shapefile rings into polygons.
///
/// Rings arrive outer-first with each outer ring followed by its
/// holes, so every inner ring attaches to the most recent outer ring.
fn polygon_geometry<P: HasXy>(rings: &[PolygonRing<P>]) -> Option<geo::Geometry> {
    let mut polygons: Vec<(LineString, Vec<LineString>)> = Vec::new();
    for ring in rings {
        let line = part_to_line_string(ring.points());
        match ring {
            PolygonRing::Outer(_) => polygons.push((line, Vec::new())),
            PolygonRing::Inner(_) => {
                if let Some((_, holes)) = polygons.last_mut() {
                    holes.push(line);
                }
            }
        }
    }
    match polygons.len() {
        0 => None,
        1 => {
            let (exterior, holes) = polygons.remove(0);
            Some(geo::Geometry::Polygon(Polygon::new(exterior, holes)))
        }
        _ => Some(geo::Geometry::MultiPolygon(geo::MultiPolygon(
            polygons
                .into_iter()
                .map(|(exterior, holes)| Polygon::new(exterior, holes))
                .collect(),
        ))),
    }
}

fn part_to_line_string<P: HasXy>(part: &[P]) -> LineString {
    LineString::new(part.iter().map(HasXy::xy).collect())
}
