//! Vector data ingestion.
//!
//! Every vector input, whatever its origin, loads into a
//! [`FeatureCollection`] in geographic WGS84 coordinates. The
//! [`VectorSource`] enum is the single entry point: file paths
//! dispatch on extension, JSON values parse as GeoJSON documents,
//! and in-memory collections reproject if needed.

pub mod feature;
pub mod geojson_io;
pub mod shapefile_io;

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::vector::feature::FeatureCollection;

/// A vector dataset in any of the accepted input forms.
#[derive(Debug, Clone)]
pub enum VectorSource {
    /// Path to a dataset on disk, `.geojson`, `.json` or `.shp`.
    Path(PathBuf),
    /// Features already held in memory.
    Collection(FeatureCollection),
    /// A GeoJSON document held as a JSON value.
    Json(JsonValue),
}

impl VectorSource {
    /// Loads the source into geographic WGS84 features.
    pub fn load(self) -> Result<FeatureCollection> {
        let collection = match self {
            VectorSource::Path(filepath) => read_vector_file(&filepath)?,
            VectorSource::Json(value) => geojson_io::from_json_value(&value)?,
            VectorSource::Collection(collection) => collection,
        };
        if collection.crs().is_geographic() {
            return Ok(collection);
        }
        collection.to_wgs84()
    }
}

impl From<&str> for VectorSource {
    fn from(filepath: &str) -> Self {
        VectorSource::Path(PathBuf::from(filepath))
    }
}

impl From<String> for VectorSource {
    fn from(filepath: String) -> Self {
        VectorSource::Path(PathBuf::from(filepath))
    }
}

impl From<&Path> for VectorSource {
    fn from(filepath: &Path) -> Self {
        VectorSource::Path(filepath.to_path_buf())
    }
}

impl From<PathBuf> for VectorSource {
    fn from(filepath: PathBuf) -> Self {
        VectorSource::Path(filepath)
    }
}

impl From<FeatureCollection> for VectorSource {
    fn from(collection: FeatureCollection) -> Self {
        VectorSource::Collection(collection)
    }
}

impl From<&FeatureCollection> for VectorSource {
    fn from(collection: &FeatureCollection) -> Self {
        VectorSource::Collection(collection.clone())
    }
}

impl From<JsonValue> for VectorSource {
    fn from(value: JsonValue) -> Self {
        VectorSource::Json(value)
    }
}

/// Reads a vector dataset, choosing the reader by file extension.
pub fn read_vector_file(filepath: &Path) -> Result<FeatureCollection> {
    let extension = filepath
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "geojson" | "json" => geojson_io::read_geojson_file(filepath),
        "shp" => shapefile_io::read_shapefile(filepath),
        _ => Err(Error::UnsupportedExtension(extension)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use geo::{Geometry, Point};
    use serde_json::json;
    use testdir::testdir;

    use super::VectorSource;
    use crate::crs::Crs;
    use crate::error::Error;
    use crate::vector::feature::{Feature, FeatureCollection};

    const TOKYO_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Tokyo"},
                "geometry": {"type": "Point", "coordinates": [139.7671, 35.6812]}
            }
        ]
    }"#;

    fn point_coordinates(collection: &FeatureCollection) -> (f64, f64) {
        let Geometry::Point(point) = &collection.features()[0].geometry else {
            panic!("expected a point");
        };
        (point.x(), point.y())
    }

    #[test]
    fn test_all_source_kinds_yield_identical_coordinates() {
        let dir = testdir!();
        let filepath = dir.join("tokyo.geojson");
        fs::write(&filepath, TOKYO_GEOJSON).unwrap();

        let from_file = VectorSource::from(filepath).load().unwrap();

        let json: serde_json::Value = serde_json::from_str(TOKYO_GEOJSON).unwrap();
        let from_json = VectorSource::from(json).load().unwrap();

        let mut collection = FeatureCollection::new();
        collection.push(Feature::new(Geometry::Point(Point::new(139.7671, 35.6812))));
        let from_memory = VectorSource::from(collection).load().unwrap();

        assert_eq!(point_coordinates(&from_file), (139.7671, 35.6812));
        assert_eq!(
            point_coordinates(&from_file),
            point_coordinates(&from_json)
        );
        assert_eq!(
            point_coordinates(&from_file),
            point_coordinates(&from_memory)
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = VectorSource::from("roads.gpkg").load().unwrap_err();
        assert!(matches!(err, Error::UnsupportedExtension(extension) if extension == "gpkg"));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let err = VectorSource::from(json!(5)).load().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_web_mercator_collection_is_reprojected() {
        let mut collection = FeatureCollection::with_crs(Crs::web_mercator());
        collection.push(Feature::new(Geometry::Point(Point::new(0.0, 0.0))));

        let loaded = VectorSource::from(collection).load().unwrap();
        assert_eq!(loaded.crs(), &Crs::wgs84());
        assert_eq!(point_coordinates(&loaded), (0.0, 0.0));
    }
}
