//! GeoJSON reading and writing.
//!
//! GeoJSON coordinates are geographic WGS84 per RFC 7946, so
//! collections read here never need reprojection.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::vector::feature::{AttributeValue, Feature, FeatureCollection};

/// Reads a GeoJSON file into a feature collection.
pub fn read_geojson_file(filepath: &Path) -> Result<FeatureCollection> {
    let contents = fs::read_to_string(filepath)?;
    parse_geojson_str(&contents)
}

/// Parses GeoJSON text into a feature collection.
///
/// Accepts all three document kinds: a FeatureCollection, a single
/// Feature, or a bare Geometry. The latter two become one-feature
/// collections.
pub fn parse_geojson_str(contents: &str) -> Result<FeatureCollection> {
    from_geojson(geojson::GeoJson::from_str(contents)?)
}

/// Builds a feature collection from an in-memory JSON value.
///
/// The value must be a JSON object; any other kind fails with
/// `InvalidInput` naming what was passed.
pub fn from_json_value(value: &JsonValue) -> Result<FeatureCollection> {
    if !value.is_object() {
        return Err(Error::InvalidInput(format!(
            "expected a GeoJSON object, got {}",
            json_kind(value)
        )));
    }
    from_geojson(geojson::GeoJson::from_json_value(value.clone())?)
}

/// Converts a collection to its GeoJSON representation.
pub fn to_geojson(collection: &FeatureCollection) -> geojson::FeatureCollection {
    geojson::FeatureCollection {
        bbox: None,
        features: collection.iter().map(feature_to_geojson).collect(),
        foreign_members: None,
    }
}

/// Writes a collection to a GeoJSON file.
pub fn write_geojson_file(collection: &FeatureCollection, output_filepath: &Path) -> Result<()> {
    let geojson_contents = geojson::GeoJson::from(to_geojson(collection));
    fs::write(output_filepath, geojson_contents.to_string())?;
    Ok(())
}

fn from_geojson(geojson: geojson::GeoJson) -> Result<FeatureCollection> {
    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => collect_features(fc.features),
        geojson::GeoJson::Feature(feature) => collect_features(vec![feature]),
        geojson::GeoJson::Geometry(geometry) => {
            let mut collection = FeatureCollection::new();
            collection.push(Feature::new(geo::Geometry::try_from(geometry)?));
            Ok(collection)
        }
    }
}

fn collect_features(features: Vec<geojson::Feature>) -> Result<FeatureCollection> {
    let num_features = features.len();
    let mut collection = FeatureCollection::new();
    for feature in features {
        if let Some(feature) = convert_feature(feature)? {
            collection.push(feature);
        }
    }
    if collection.len() != num_features {
        log::warn!(
            "Out of {} features read, only {} carried a geometry.",
            num_features,
            collection.len()
        )
    }
    Ok(collection)
}

fn convert_feature(feature: geojson::Feature) -> Result<Option<Feature>> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };
    let geometry = geo::Geometry::try_from(geometry)?;
    let attributes = feature
        .properties
        .map(|properties| {
            properties
                .into_iter()
                .map(|(key, value)| (key, AttributeValue::from(&value)))
                .collect()
        })
        .unwrap_or_else(HashMap::new);
    let id = feature.id.map(|id| match id {
        geojson::feature::Id::String(s) => s,
        geojson::feature::Id::Number(n) => n.to_string(),
    });
    Ok(Some(Feature {
        geometry,
        attributes,
        id,
    }))
}

fn feature_to_geojson(feature: &Feature) -> geojson::Feature {
    let mut properties = geojson::JsonObject::new();
    for (key, value) in &feature.attributes {
        properties.insert(key.clone(), value.to_json());
    }
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            &feature.geometry,
        ))),
        id: feature.id.clone().map(geojson::feature::Id::String),
        properties: if properties.is_empty() {
            None
        } else {
            Some(properties)
        },
        foreign_members: None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testdir::testdir;

    use super::{from_json_value, parse_geojson_str, read_geojson_file, write_geojson_file};
    use crate::error::Error;
    use crate::vector::feature::AttributeValue;

    const CITY_POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 7,
                "properties": {"name": "Tokyo", "population": 37400068},
                "geometry": {"type": "Point", "coordinates": [139.7671, 35.6812]}
            },
            {
                "type": "Feature",
                "properties": {"name": "nowhere"},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection_skips_null_geometries() {
        let collection = parse_geojson_str(CITY_POINTS).unwrap();
        assert_eq!(collection.len(), 1);

        let feature = &collection.features()[0];
        assert_eq!(feature.id.as_deref(), Some("7"));
        assert_eq!(
            feature.attributes.get("name"),
            Some(&AttributeValue::String("Tokyo".to_string()))
        );
        assert_eq!(
            feature.attributes.get("population"),
            Some(&AttributeValue::Int(37_400_068))
        );
    }

    #[test]
    fn test_parse_bare_geometry_document() {
        let collection =
            parse_geojson_str(r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#)
                .unwrap();
        assert_eq!(collection.len(), 1);
        assert!(matches!(
            collection.features()[0].geometry,
            geo::Geometry::LineString(_)
        ));
    }

    #[test]
    fn test_from_json_value_rejects_non_objects() {
        let err = from_json_value(&json!(5)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("a number")));
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = testdir!();
        let filepath = dir.join("cities.geojson");

        let collection = parse_geojson_str(CITY_POINTS).unwrap();
        write_geojson_file(&collection, &filepath).unwrap();

        let reread = read_geojson_file(&filepath).unwrap();
        assert_eq!(reread, collection);
    }
}
