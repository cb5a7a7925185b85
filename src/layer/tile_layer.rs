//! Tile layers.

/// A raster tile layer addressed by an XYZ URL template.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Name shown in the layer control.
    pub name: String,
    /// URL template with `{x}`, `{y}` and `{z}` placeholders.
    pub url: String,
    /// Attribution text required by the tile provider.
    pub attribution: Option<String>,
    /// Whether the layer control lists this as an overlay rather than
    /// a base layer.
    pub overlay: bool,
}

impl TileLayer {
    /// Creates a base tile layer.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            attribution: None,
            overlay: false,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }
}
