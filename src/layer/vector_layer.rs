//! Vector layers and their styling options.

use serde_json::{Map, Value as JsonValue};

use crate::vector::feature::FeatureCollection;

/// Style applied to a vector feature while the pointer is over it.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverStyle {
    /// Stroke color, any CSS color string.
    pub color: String,
    /// Fill opacity between 0 and 1.
    pub fill_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            fill_opacity: 0.2,
        }
    }
}

impl HoverStyle {
    /// Returns the style as Leaflet path options.
    pub fn to_json(&self) -> Map<String, JsonValue> {
        let mut style = Map::new();
        style.insert("color".to_string(), JsonValue::String(self.color.clone()));
        style.insert("fillOpacity".to_string(), JsonValue::from(self.fill_opacity));
        style
    }
}

/// Options accepted when adding vector data to a map.
#[derive(Debug, Clone)]
pub struct VectorOptions {
    /// Name shown in the layer control.
    pub name: String,
    /// Leaflet path options applied to every feature.
    pub style: Map<String, JsonValue>,
    /// Style applied while hovering a feature.
    pub hover_style: HoverStyle,
    /// Whether adding the layer moves the viewport to its extent.
    pub zoom_to_layer: bool,
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            style: Map::new(),
            hover_style: HoverStyle::default(),
            zoom_to_layer: true,
        }
    }
}

impl VectorOptions {
    /// Default options under the given layer name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Vector features styled for display.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    pub name: String,
    pub collection: FeatureCollection,
    pub style: Map<String, JsonValue>,
    pub hover_style: HoverStyle,
}

impl VectorLayer {
    /// Pairs loaded features with their display options.
    pub fn new(collection: FeatureCollection, options: VectorOptions) -> Self {
        Self {
            name: options.name,
            collection,
            style: options.style,
            hover_style: options.hover_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverStyle, VectorOptions};

    #[test]
    fn test_default_options() {
        let options = VectorOptions::default();
        assert_eq!(options.name, "Untitled");
        assert!(options.zoom_to_layer);
        assert_eq!(options.hover_style, HoverStyle::default());
    }

    #[test]
    fn test_hover_style_uses_leaflet_option_names() {
        let style = HoverStyle::default().to_json();
        assert_eq!(style["color"], "red");
        assert_eq!(style["fillOpacity"], 0.2);
    }
}
