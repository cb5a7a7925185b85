//! Built-in basemap registry.
//!
//! Maps a small set of well-known tile provider names to their XYZ URL
//! templates and attributions. Lookups are forgiving about spelling:
//! case and punctuation are ignored, so `"cartodbpositron"` and
//! `"CartoDB.Positron"` name the same entry.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::layer::TileLayer;

struct BasemapProvider {
    /// Canonical name, also used in the layer control.
    name: &'static str,
    url: &'static str,
    attribution: &'static str,
}

const BASEMAPS: &[BasemapProvider] = &[
    BasemapProvider {
        name: "OpenStreetMap",
        url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "&copy; OpenStreetMap contributors",
    },
    BasemapProvider {
        name: "CartoDB.Positron",
        url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
        attribution: "&copy; OpenStreetMap contributors &copy; CARTO",
    },
    BasemapProvider {
        name: "CartoDB.DarkMatter",
        url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
        attribution: "&copy; OpenStreetMap contributors &copy; CARTO",
    },
    BasemapProvider {
        name: "OpenTopoMap",
        url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution: "&copy; OpenStreetMap contributors, SRTM | &copy; OpenTopoMap (CC-BY-SA)",
    },
    BasemapProvider {
        name: "Esri.WorldImagery",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri",
    },
    BasemapProvider {
        name: "Esri.WorldStreetMap",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri",
    },
    BasemapProvider {
        name: "Esri.WorldTopoMap",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: "Tiles &copy; Esri",
    },
];

/// Looks up a basemap by name.
///
/// The returned layer carries the canonical entry name, whatever
/// spelling was used for the lookup. Unknown names fail with
/// `UnknownBasemap` preserving the caller's text.
pub fn resolve_basemap(name: &str) -> Result<TileLayer> {
    let key = normalize(name);
    BASEMAPS
        .iter()
        .find(|provider| normalize(provider.name) == key)
        .map(|provider| {
            TileLayer::new(provider.name, provider.url).with_attribution(provider.attribution)
        })
        .ok_or_else(|| Error::UnknownBasemap(name.to_string()))
}

/// Resolves a tile reference that is either a known basemap name or an
/// XYZ URL template.
pub fn resolve_tile_source(value: &str) -> Result<TileLayer> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(TileLayer::new(value, value));
    }
    resolve_basemap(value)
}

/// Canonical names of all built-in basemaps.
pub fn basemap_names() -> impl Iterator<Item = &'static str> {
    BASEMAPS.iter().map(|provider| provider.name)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The Google tile sets reachable without an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoogleMapType {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

impl GoogleMapType {
    /// Layer code used in the tile URL.
    fn tile_code(self) -> char {
        match self {
            GoogleMapType::Roadmap => 'm',
            GoogleMapType::Satellite => 's',
            GoogleMapType::Hybrid => 'y',
            GoogleMapType::Terrain => 'p',
        }
    }
}

impl FromStr for GoogleMapType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "roadmap" => Ok(GoogleMapType::Roadmap),
            "satellite" => Ok(GoogleMapType::Satellite),
            "hybrid" => Ok(GoogleMapType::Hybrid),
            "terrain" => Ok(GoogleMapType::Terrain),
            _ => Err(Error::UnknownMapType(s.to_string())),
        }
    }
}

/// Builds the tile layer for one of the Google map types.
pub fn google_tile_layer(map_type: GoogleMapType) -> TileLayer {
    let url = format!(
        "https://mt1.google.com/vt/lyrs={}&x={{x}}&y={{y}}&z={{z}}",
        map_type.tile_code()
    );
    TileLayer::new("Google Map", url).with_attribution("Google")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::{google_tile_layer, resolve_basemap, resolve_tile_source, GoogleMapType};
    use crate::error::Error;

    #[rstest]
    #[case("OpenStreetMap", "OpenStreetMap")]
    #[case("openstreetmap", "OpenStreetMap")]
    #[case("CartoDB.Positron", "CartoDB.Positron")]
    #[case("cartodb positron", "CartoDB.Positron")]
    #[case("ESRI.WORLDIMAGERY", "Esri.WorldImagery")]
    fn test_lookup_ignores_case_and_punctuation(
        #[case] query: &str,
        #[case] canonical_name: &str,
    ) {
        let layer = resolve_basemap(query).unwrap();
        assert_eq!(layer.name, canonical_name);
    }

    #[test]
    fn test_unknown_basemap_keeps_caller_spelling() {
        let err = resolve_basemap("Atlantis.SeaFloor").unwrap_err();
        assert!(matches!(err, Error::UnknownBasemap(name) if name == "Atlantis.SeaFloor"));
    }

    #[test]
    fn test_url_passes_through_as_tile_source() {
        let layer = resolve_tile_source("https://tiles.example.com/{z}/{x}/{y}.png").unwrap();
        assert_eq!(layer.url, "https://tiles.example.com/{z}/{x}/{y}.png");
    }

    #[rstest]
    #[case("roadmap", 'm')]
    #[case("SATELLITE", 's')]
    #[case("Hybrid", 'y')]
    #[case("terrain", 'p')]
    fn test_google_map_types_parse_case_insensitively(#[case] input: &str, #[case] code: char) {
        let map_type = GoogleMapType::from_str(input).unwrap();
        let layer = google_tile_layer(map_type);
        assert_eq!(layer.name, "Google Map");
        assert!(layer.url.contains(&format!("lyrs={}", code)));
    }

    #[test]
    fn test_bogus_google_map_type_is_rejected() {
        let err = GoogleMapType::from_str("streetview").unwrap_err();
        assert!(matches!(err, Error::UnknownMapType(kind) if kind == "streetview"));
    }
}
