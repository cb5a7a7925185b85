//! The map facade.
//!
//! A [`Map`] collects tile and vector layers, tracks the viewport
//! they imply, and renders the result. All vector inputs are loaded
//! through [`VectorSource`], so every layer holds geographic WGS84
//! coordinates by the time it is attached.

pub mod bounds;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::{json, Value as JsonValue};

use crate::basemap::{self, GoogleMapType};
use crate::error::Result;
use crate::html;
use crate::layer::{Layer, VectorLayer, VectorOptions};
use crate::map::bounds::WgsBounds;
use crate::vector::feature::FeatureCollection;
use crate::vector::{geojson_io, shapefile_io, VectorSource};

/// Initial display settings for a map.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Initial center as `(lat, lon)`.
    pub center: (f64, f64),
    /// Initial zoom level.
    pub zoom: f64,
    /// Rendered map height in pixels.
    pub height_px: u32,
    /// Whether the scroll wheel zooms the map.
    pub scroll_wheel_zoom: bool,
    /// Zoom ceiling applied when fitting layer extents.
    pub max_zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: (0.0, 0.0),
            zoom: 2.0,
            height_px: 600,
            scroll_wheel_zoom: true,
            max_zoom: 18,
        }
    }
}

/// The part of the world the map currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Center as `(lat, lon)`.
    pub center: (f64, f64),
    pub zoom: f64,
}

/// An interactive control attached to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Layer visibility toggles in the top right corner.
    LayerToggle,
    /// Swipe comparison between two tile layers, referenced by their
    /// positions in the layer list.
    SideBySide { left: usize, right: usize },
}

/// A web map under construction.
#[derive(Debug, Clone)]
pub struct Map {
    options: MapOptions,
    viewport: Viewport,
    layers: Vec<Layer>,
    controls: Vec<Control>,
}

impl Map {
    /// Creates a map with the default world view.
    pub fn new() -> Self {
        Self::with_options(MapOptions::default())
    }

    /// Creates a map with the given display settings.
    pub fn with_options(options: MapOptions) -> Self {
        let viewport = Viewport {
            center: options.center,
            zoom: options.zoom,
        };
        Self {
            options,
            viewport,
            layers: Vec::new(),
            controls: Vec::new(),
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Adds vector data from any accepted source.
    ///
    /// Files dispatch on their extension, JSON values parse as GeoJSON
    /// and in-memory collections reproject as needed. With
    /// `zoom_to_layer` set, the viewport moves to the layer's extent;
    /// a layer without coordinates leaves the viewport alone.
    pub fn add_vector(
        &mut self,
        source: impl Into<VectorSource>,
        options: VectorOptions,
    ) -> Result<()> {
        let collection = source.into().load()?;
        self.attach_vector_layer(collection, options);
        Ok(())
    }

    /// Adds vector data from a GeoJSON file.
    pub fn add_geojson(
        &mut self,
        filepath: impl AsRef<Path>,
        options: VectorOptions,
    ) -> Result<()> {
        let collection = geojson_io::read_geojson_file(filepath.as_ref())?;
        self.attach_vector_layer(collection, options);
        Ok(())
    }

    /// Adds vector data from a shapefile.
    pub fn add_shapefile(
        &mut self,
        filepath: impl AsRef<Path>,
        options: VectorOptions,
    ) -> Result<()> {
        let collection = shapefile_io::read_shapefile(filepath.as_ref())?.to_wgs84()?;
        self.attach_vector_layer(collection, options);
        Ok(())
    }

    /// Adds vector data already held in memory.
    pub fn add_collection(
        &mut self,
        collection: FeatureCollection,
        options: VectorOptions,
    ) -> Result<()> {
        self.add_vector(collection, options)
    }

    /// Adds a built-in basemap by name.
    ///
    /// Exactly one tile layer is added per call. An unknown name fails
    /// with `UnknownBasemap` and leaves the map unchanged.
    pub fn add_basemap(&mut self, name: &str) -> Result<()> {
        let layer = basemap::resolve_basemap(name)?;
        log::info!("Added basemap '{}'.", layer.name);
        self.layers.push(Layer::Tile(layer));
        Ok(())
    }

    /// Adds one of the Google tile sets.
    ///
    /// The map type is matched case-insensitively against `roadmap`,
    /// `satellite`, `hybrid` and `terrain`; anything else fails with
    /// `UnknownMapType` and leaves the map unchanged.
    pub fn add_google_map(&mut self, map_type: &str) -> Result<()> {
        let layer = basemap::google_tile_layer(GoogleMapType::from_str(map_type)?);
        log::info!("Added Google '{}' tiles.", map_type.to_ascii_lowercase());
        self.layers.push(Layer::Tile(layer));
        Ok(())
    }

    /// Shows layer visibility toggles in the top right corner.
    ///
    /// Each call appends another control, so callers add it once per
    /// map.
    pub fn add_layer_control(&mut self) {
        self.controls.push(Control::LayerToggle);
    }

    /// Adds a swipe comparison between two tile sources.
    ///
    /// Each side is either a built-in basemap name or an XYZ URL
    /// template. Both sides resolve before anything is added, so a bad
    /// name leaves the map unchanged.
    pub fn add_split_map(&mut self, left: &str, right: &str) -> Result<()> {
        let mut left_layer = basemap::resolve_tile_source(left)?;
        let mut right_layer = basemap::resolve_tile_source(right)?;
        left_layer.overlay = true;
        right_layer.overlay = true;
        log::info!(
            "Added split view of '{}' and '{}'.",
            left_layer.name,
            right_layer.name
        );
        let left_index = self.layers.len();
        self.layers.push(Layer::Tile(left_layer));
        let right_index = self.layers.len();
        self.layers.push(Layer::Tile(right_layer));
        self.controls.push(Control::SideBySide {
            left: left_index,
            right: right_index,
        });
        Ok(())
    }

    /// Moves the viewport to the given extent.
    pub fn fit_bounds(&mut self, bounds: WgsBounds) {
        self.viewport = Viewport {
            center: bounds.center(),
            zoom: f64::from(bounds.fit_zoom(self.options.max_zoom)),
        };
        log::debug!(
            "Viewport fitted to center {:?} at zoom {}.",
            self.viewport.center,
            self.viewport.zoom
        );
    }

    /// Renders the map as a self-contained HTML page.
    pub fn to_html(&self) -> String {
        html::render_page(self)
    }

    /// Writes the rendered HTML page to a file.
    pub fn write_html(&self, output_filepath: impl AsRef<Path>) -> Result<()> {
        let output_filepath = output_filepath.as_ref();
        fs::write(output_filepath, self.to_html())?;
        log::info!("Wrote map to {}.", output_filepath.display());
        Ok(())
    }

    /// Snapshot of the map as plain JSON, for clients that render the
    /// map themselves. Vector layers carry their features as GeoJSON.
    pub fn to_state(&self) -> Result<JsonValue> {
        let mut layers = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            layers.push(match layer {
                Layer::Vector(layer) => {
                    let data = serde_json::to_value(geojson::GeoJson::from(
                        geojson_io::to_geojson(&layer.collection),
                    ))?;
                    json!({
                        "type": "vector",
                        "name": layer.name,
                        "feature_count": layer.collection.len(),
                        "style": JsonValue::Object(layer.style.clone()),
                        "hover_style": JsonValue::Object(layer.hover_style.to_json()),
                        "data": data,
                    })
                }
                Layer::Tile(layer) => json!({
                    "type": "tile",
                    "name": layer.name,
                    "url": layer.url,
                    "attribution": layer.attribution,
                    "overlay": layer.overlay,
                }),
            });
        }
        let controls: Vec<JsonValue> = self
            .controls
            .iter()
            .map(|control| match control {
                Control::LayerToggle => json!("layer_control"),
                Control::SideBySide { left, right } => json!({
                    "split": {"left": left, "right": right},
                }),
            })
            .collect();
        Ok(json!({
            "center": [self.viewport.center.0, self.viewport.center.1],
            "zoom": self.viewport.zoom,
            "height_px": self.options.height_px,
            "scroll_wheel_zoom": self.options.scroll_wheel_zoom,
            "layers": layers,
            "controls": controls,
        }))
    }

    fn attach_vector_layer(&mut self, collection: FeatureCollection, options: VectorOptions) {
        let zoom_to_layer = options.zoom_to_layer;
        let layer = VectorLayer::new(collection, options);
        log::info!(
            "Added vector layer '{}' with {} features.",
            layer.name,
            layer.collection.len()
        );
        if zoom_to_layer {
            match WgsBounds::from_collection(&layer.collection) {
                Some(bounds) => self.fit_bounds(bounds),
                None => log::debug!(
                    "Layer '{}' has no coordinates; viewport unchanged.",
                    layer.name
                ),
            }
        }
        self.layers.push(Layer::Vector(layer));
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Geometry, Point};

    use super::{Control, Map};
    use crate::error::Error;
    use crate::layer::{Layer, VectorOptions};
    use crate::vector::feature::{Feature, FeatureCollection};

    fn city_pair() -> FeatureCollection {
        let mut collection = FeatureCollection::new();
        collection.push(Feature::new(Geometry::Point(Point::new(139.7, 35.7))));
        collection.push(Feature::new(Geometry::Point(Point::new(135.5, 34.7))));
        collection
    }

    #[test]
    fn test_new_map_shows_the_world() {
        let map = Map::new();
        assert_eq!(map.viewport().center, (0.0, 0.0));
        assert_eq!(map.viewport().zoom, 2.0);
        assert!(map.layers().is_empty());
        assert!(map.controls().is_empty());
    }

    #[test]
    fn test_add_basemap_adds_exactly_one_layer() {
        let mut map = Map::new();
        map.add_basemap("openstreetmap").unwrap();
        assert_eq!(map.layers().len(), 1);
        assert_eq!(map.layers()[0].name(), "OpenStreetMap");
    }

    #[test]
    fn test_unknown_basemap_leaves_map_unchanged() {
        let mut map = Map::new();
        let err = map.add_basemap("Atlantis.SeaFloor").unwrap_err();
        assert!(matches!(err, Error::UnknownBasemap(_)));
        assert!(map.layers().is_empty());
    }

    #[test]
    fn test_add_google_map_is_case_insensitive() {
        let mut map = Map::new();
        map.add_google_map("HYBRID").unwrap();
        let Layer::Tile(layer) = &map.layers()[0] else {
            panic!("expected a tile layer");
        };
        assert_eq!(layer.name, "Google Map");
        assert!(layer.url.contains("lyrs=y"));
    }

    #[test]
    fn test_bogus_google_map_type_leaves_map_unchanged() {
        let mut map = Map::new();
        let err = map.add_google_map("streetview").unwrap_err();
        assert!(matches!(err, Error::UnknownMapType(_)));
        assert!(map.layers().is_empty());
    }

    #[test]
    fn test_adding_vector_data_zooms_to_its_extent() {
        let mut map = Map::new();
        map.add_collection(city_pair(), VectorOptions::named("cities"))
            .unwrap();

        let viewport = map.viewport();
        assert_relative_eq!(viewport.center.0, 35.2, epsilon = 1e-9);
        assert_relative_eq!(viewport.center.1, 137.6, epsilon = 1e-9);
        assert_eq!(viewport.zoom, 6.0);
    }

    #[test]
    fn test_zoom_to_layer_can_be_disabled() {
        let mut map = Map::new();
        let options = VectorOptions {
            zoom_to_layer: false,
            ..VectorOptions::named("cities")
        };
        map.add_collection(city_pair(), options).unwrap();
        assert_eq!(map.viewport().center, (0.0, 0.0));
        assert_eq!(map.viewport().zoom, 2.0);
    }

    #[test]
    fn test_empty_collection_keeps_viewport_and_adds_layer() {
        let mut map = Map::new();
        map.add_collection(FeatureCollection::new(), VectorOptions::default())
            .unwrap();
        assert_eq!(map.layers().len(), 1);
        assert_eq!(map.viewport().center, (0.0, 0.0));
        assert_eq!(map.viewport().zoom, 2.0);
    }

    #[test]
    fn test_split_map_records_both_sides() {
        let mut map = Map::new();
        map.add_split_map("openstreetmap", "cartodbpositron").unwrap();
        assert_eq!(map.layers().len(), 2);
        assert_eq!(map.layers()[0].name(), "OpenStreetMap");
        assert_eq!(map.layers()[1].name(), "CartoDB.Positron");
        assert_eq!(
            map.controls(),
            &[Control::SideBySide { left: 0, right: 1 }]
        );
        for layer in map.layers() {
            let Layer::Tile(tile) = layer else {
                panic!("expected tile layers");
            };
            assert!(tile.overlay);
        }
    }

    #[test]
    fn test_layer_control_appends_on_every_call() {
        let mut map = Map::new();
        map.add_layer_control();
        map.add_layer_control();
        assert_eq!(map.controls(), &[Control::LayerToggle, Control::LayerToggle]);
    }

    #[test]
    fn test_state_snapshot_lists_layers_and_controls() {
        let mut map = Map::new();
        map.add_basemap("openstreetmap").unwrap();
        map.add_collection(city_pair(), VectorOptions::named("cities"))
            .unwrap();
        map.add_layer_control();

        let state = map.to_state().unwrap();
        assert_eq!(state["layers"].as_array().unwrap().len(), 2);
        assert_eq!(state["layers"][0]["type"], "tile");
        assert_eq!(state["layers"][1]["name"], "cities");
        assert_eq!(state["layers"][1]["feature_count"], 2);
        assert_eq!(state["layers"][1]["data"]["type"], "FeatureCollection");
        assert_eq!(state["controls"][0], "layer_control");
        assert_eq!(state["height_px"], 600);
    }
}
