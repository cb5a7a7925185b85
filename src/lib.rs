//! Interactive web maps from vector data.
//!
//! Builds Leaflet maps out of GeoJSON files, shapefiles and in-memory
//! feature collections. Vector data loads into geographic WGS84
//! coordinates whatever its source, layers carry their own styling,
//! and the finished map renders as a self-contained HTML page.
//!
//! ```no_run
//! use webmap::{Map, VectorOptions};
//!
//! fn main() -> webmap::Result<()> {
//!     let mut map = Map::new();
//!     map.add_basemap("openstreetmap")?;
//!     map.add_vector("cities.geojson", VectorOptions::named("Cities"))?;
//!     map.add_layer_control();
//!     map.write_html("map.html")?;
//!     Ok(())
//! }
//! ```

pub mod basemap;
pub mod crs;
pub mod error;
pub mod html;
pub mod layer;
pub mod map;
pub mod vector;

pub use basemap::GoogleMapType;
pub use crs::Crs;
pub use error::{Error, Result};
pub use layer::{HoverStyle, Layer, TileLayer, VectorLayer, VectorOptions};
pub use map::bounds::WgsBounds;
pub use map::{Control, Map, MapOptions, Viewport};
pub use vector::feature::{AttributeValue, Feature, FeatureCollection};
pub use vector::VectorSource;
