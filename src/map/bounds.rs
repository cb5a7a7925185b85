//! Geographic extents and viewport fitting.

use std::f64::consts::PI;

use geo::Coord;

use crate::crs;
use crate::vector::feature::FeatureCollection;

/// Latitude limit of the Web Mercator projection.
const MAX_LAT: f64 = 85.05112878;

/// Axis-aligned extent in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WgsBounds {
    pub left_lon: f64,
    pub right_lon: f64,
    pub bottom_lat: f64,
    pub top_lat: f64,
}

impl WgsBounds {
    /// Bounds containing a single coordinate.
    pub fn from_coord(coord: Coord) -> Self {
        Self {
            left_lon: coord.x,
            right_lon: coord.x,
            bottom_lat: coord.y,
            top_lat: coord.y,
        }
    }

    /// Extent of every coordinate in the collection.
    ///
    /// Returns `None` when the collection holds no coordinates, so an
    /// empty dataset never produces a degenerate extent.
    pub fn from_collection(collection: &FeatureCollection) -> Option<Self> {
        let mut bounds: Option<WgsBounds> = None;
        for feature in collection.iter() {
            crs::for_each_coord(&feature.geometry, &mut |coord| {
                bounds = Some(match bounds {
                    Some(mut bounds) => {
                        bounds.extend(coord);
                        bounds
                    }
                    None => WgsBounds::from_coord(coord),
                });
            });
        }
        bounds
    }

    /// Grows the bounds to contain the coordinate.
    pub fn extend(&mut self, coord: Coord) {
        self.left_lon = self.left_lon.min(coord.x);
        self.right_lon = self.right_lon.max(coord.x);
        self.bottom_lat = self.bottom_lat.min(coord.y);
        self.top_lat = self.top_lat.max(coord.y);
    }

    /// Midpoint of the extent as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.bottom_lat + self.top_lat) / 2.0,
            (self.left_lon + self.right_lon) / 2.0,
        )
    }

    /// Highest zoom level at which the whole extent fits in one view.
    ///
    /// Works on the fraction of the world the extent spans on each
    /// axis, measured in normalized Web Mercator units so latitude
    /// stretch is accounted for. Halving the larger fraction buys one
    /// zoom level. A point extent has no span and fits at any zoom, so
    /// it returns `max_zoom`.
    pub fn fit_zoom(&self, max_zoom: u8) -> u8 {
        let frac_x = (self.right_lon - self.left_lon).abs() / 360.0;
        let frac_y = (mercator_y(self.bottom_lat) - mercator_y(self.top_lat)).abs();
        let max_frac = frac_x.max(frac_y);
        if max_frac <= 0.0 {
            return max_zoom;
        }
        let zoom = (1.0 / max_frac).log2().floor();
        zoom.clamp(0.0, f64::from(max_zoom)) as u8
    }
}

/// Normalized Web Mercator Y in `[0, 1]`, 0 at the north edge.
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    (1.0 - lat_rad.tan().asinh() / PI) / 2.0
}
