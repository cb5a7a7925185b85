//! Vector features and feature collections.

use std::collections::HashMap;

use geo::Geometry;
use serde_json::Value as JsonValue;

use crate::crs::{self, Crs};
use crate::error::Result;

/// A single attribute value attached to a feature.
///
/// Scalar JSON and dBase values map onto these variants; anything
/// structured (arrays, nested objects) is kept as its JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Converts the value to its JSON representation.
    pub fn to_json(&self) -> JsonValue {
        match self {
            AttributeValue::Null => JsonValue::Null,
            AttributeValue::Bool(b) => JsonValue::Bool(*b),
            AttributeValue::Int(i) => JsonValue::from(*i),
            AttributeValue::Float(f) => JsonValue::from(*f),
            AttributeValue::String(s) => JsonValue::String(s.clone()),
        }
    }
}

impl From<&JsonValue> for AttributeValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => AttributeValue::Null,
            JsonValue::Bool(b) => AttributeValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => AttributeValue::String(s.clone()),
            other => AttributeValue::String(other.to_string()),
        }
    }
}

/// Geographic feature with associated attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub attributes: HashMap<String, AttributeValue>,
    pub id: Option<String>,
}

impl Feature {
    /// Creates a feature with no attributes.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: HashMap::new(),
            id: None,
        }
    }

    /// Creates a feature carrying the given attribute table row.
    pub fn with_attributes(
        geometry: Geometry,
        attributes: HashMap<String, AttributeValue>,
    ) -> Self {
        Self {
            geometry,
            attributes,
            id: None,
        }
    }
}

/// An ordered set of features sharing one coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    crs: Crs,
}

impl FeatureCollection {
    /// Creates an empty collection in geographic WGS84 coordinates.
    pub fn new() -> Self {
        Self::with_crs(Crs::wgs84())
    }

    /// Creates an empty collection in the given CRS.
    pub fn with_crs(crs: Crs) -> Self {
        Self {
            features: Vec::new(),
            crs,
        }
    }

    /// Wraps existing features, taking them to be WGS84 coordinates.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: Crs::wgs84(),
        }
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Returns the collection in geographic WGS84 coordinates.
    ///
    /// A collection that is already geographic is cloned as-is, so
    /// applying this twice yields the same coordinates as applying it
    /// once.
    pub fn to_wgs84(&self) -> Result<Self> {
        if self.crs.is_geographic() {
            return Ok(self.clone());
        }
        let mut features = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            features.push(Feature {
                geometry: crs::reproject_to_wgs84(&feature.geometry, &self.crs)?,
                attributes: feature.attributes.clone(),
                id: feature.id.clone(),
            });
        }
        Ok(Self {
            features,
            crs: Crs::wgs84(),
        })
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Geometry, Point};
    use rstest::rstest;
    use serde_json::json;

    use super::{AttributeValue, Feature, FeatureCollection};
    use crate::crs::Crs;

    #[rstest]
    #[case(json!(null), AttributeValue::Null)]
    #[case(json!(true), AttributeValue::Bool(true))]
    #[case(json!(42), AttributeValue::Int(42))]
    #[case(json!(2.5), AttributeValue::Float(2.5))]
    #[case(json!("name"), AttributeValue::String("name".to_string()))]
    #[case(json!([1, 2]), AttributeValue::String("[1,2]".to_string()))]
    fn test_attribute_from_json(#[case] json: serde_json::Value, #[case] expected: AttributeValue) {
        assert_eq!(AttributeValue::from(&json), expected);
    }

    #[test]
    fn test_attribute_json_round_trip_scalars() {
        let value = AttributeValue::Int(7);
        assert_eq!(AttributeValue::from(&value.to_json()), value);
    }

    #[test]
    fn test_to_wgs84_is_idempotent_for_geographic_collections() {
        let mut collection = FeatureCollection::new();
        collection.push(Feature::new(Geometry::Point(Point::new(139.7671, 35.6812))));

        let once = collection.to_wgs84().unwrap();
        let twice = once.to_wgs84().unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, collection);
    }

    #[test]
    fn test_to_wgs84_converts_web_mercator() {
        let mut collection = FeatureCollection::with_crs(Crs::web_mercator());
        collection.push(Feature::new(Geometry::Point(Point::new(
            20_037_508.342789244,
            0.0,
        ))));

        let geographic = collection.to_wgs84().unwrap();
        assert_eq!(geographic.crs(), &Crs::wgs84());
        let Geometry::Point(point) = &geographic.features()[0].geometry else {
            panic!("expected a point");
        };
        assert_relative_eq!(point.x(), 180.0, epsilon = 1e-9);
        assert_relative_eq!(point.y(), 0.0, epsilon = 1e-9);
    }
}
