//! Map layers.

pub mod tile_layer;
pub mod vector_layer;

pub use tile_layer::TileLayer;
pub use vector_layer::{HoverStyle, VectorLayer, VectorOptions};

/// Anything a map can display.
#[derive(Debug, Clone)]
pub enum Layer {
    Vector(VectorLayer),
    Tile(TileLayer),
}

impl Layer {
    /// Name shown in the layer control.
    pub fn name(&self) -> &str {
        match self {
            Layer::Vector(layer) => &layer.name,
            Layer::Tile(layer) => &layer.name,
        }
    }
}
