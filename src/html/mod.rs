//! Leaflet HTML rendering.
//!
//! Renders a [`Map`] as one self-contained HTML page: Leaflet comes
//! from a CDN, layer data is embedded as GeoJSON, and a single script
//! builds the map. Nothing is fetched from the generating program
//! afterwards.
//!
//! Embedded strings are written as JSON string literals, which are
//! valid JavaScript literals, and every `</` is escaped so embedded
//! data can never terminate the surrounding script tag.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::layer::{Layer, TileLayer, VectorLayer};
use crate::map::{Control, Map};
use crate::vector::geojson_io;

const LEAFLET_VERSION: &str = "1.9.4";
const SIDE_BY_SIDE_SRC: &str =
    "https://cdn.jsdelivr.net/gh/digidem/leaflet-side-by-side@gh-pages/leaflet-side-by-side.js";

/// Renders the whole page for a map.
pub fn render_page(map: &Map) -> String {
    let variables: Vec<String> = (0..map.layers().len())
        .map(|index| format!("layer_{}", index))
        .collect();

    let mut script = map_init_js(map);
    for (index, layer) in map.layers().iter().enumerate() {
        match layer {
            Layer::Tile(tile) => {
                script.push_str(&tile_layer_js(&variables[index], tile, map.options().max_zoom))
            }
            Layer::Vector(vector) => script.push_str(&vector_layer_js(&variables[index], vector)),
        }
    }
    for control in map.controls() {
        match control {
            Control::LayerToggle => script.push_str(&layer_control_js(map, &variables)),
            Control::SideBySide { left, right } => script.push_str(&format!(
                "L.control.sideBySide({}, {}).addTo(map);\n",
                variables[*left], variables[*right]
            )),
        }
    }

    let uses_split = map
        .controls()
        .iter()
        .any(|control| matches!(control, Control::SideBySide { .. }));
    let plugin_include = if uses_split {
        format!("<script src=\"{}\"></script>\n", SIDE_BY_SIDE_SRC)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Map</title>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/{version}/leaflet.css" crossorigin="anonymous" referrerpolicy="no-referrer" />
<script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/{version}/leaflet.js" crossorigin="anonymous" referrerpolicy="no-referrer"></script>
{plugin}<style>
html, body {{ margin: 0; padding: 0; }}
#map {{ height: {height}px; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
{script}</script>
</body>
</html>
"#,
        version = LEAFLET_VERSION,
        plugin = plugin_include,
        height = map.options().height_px,
        script = script,
    )
}

fn map_init_js(map: &Map) -> String {
    let viewport = map.viewport();
    format!(
        "var map = L.map(\"map\", {{center: [{lat}, {lon}], zoom: {zoom}, scrollWheelZoom: {scroll}}});\n",
        lat = viewport.center.0,
        lon = viewport.center.1,
        zoom = viewport.zoom,
        scroll = map.options().scroll_wheel_zoom,
    )
}

fn tile_layer_js(variable: &str, layer: &TileLayer, max_zoom: u8) -> String {
    let mut options = JsonMap::new();
    options.insert("maxZoom".to_string(), JsonValue::from(max_zoom));
    if let Some(attribution) = &layer.attribution {
        options.insert(
            "attribution".to_string(),
            JsonValue::String(attribution.clone()),
        );
    }
    format!(
        "var {variable} = L.tileLayer({url}, {options}).addTo(map);\n",
        variable = variable,
        url = js_string(&layer.url),
        options = js_object(&options),
    )
}

fn vector_layer_js(variable: &str, layer: &VectorLayer) -> String {
    let geojson_text =
        geojson::GeoJson::from(geojson_io::to_geojson(&layer.collection)).to_string();
    let data = embed_json(&geojson_text);
    format!(
        "var {variable}_data = {data};\n\
         var {variable} = L.geoJSON({variable}_data, {{style: {style}}});\n\
         {variable}.on(\"mouseover\", function (e) {{ if (e.layer.setStyle) {{ e.layer.setStyle({hover}); }} }});\n\
         {variable}.on(\"mouseout\", function (e) {{ if (e.layer.setStyle) {{ {variable}.resetStyle(e.layer); }} }});\n\
         {variable}.addTo(map);\n",
        variable = variable,
        data = data,
        style = js_object(&layer.style),
        hover = js_object(&layer.hover_style.to_json()),
    )
}

fn layer_control_js(map: &Map, variables: &[String]) -> String {
    let mut base_entries = Vec::new();
    let mut overlay_entries = Vec::new();
    for (layer, variable) in map.layers().iter().zip(variables) {
        let entry = format!("{}: {}", js_string(layer.name()), variable);
        match layer {
            Layer::Tile(tile) if !tile.overlay => base_entries.push(entry),
            _ => overlay_entries.push(entry),
        }
    }
    format!(
        "L.control.layers({{{base}}}, {{{overlays}}}, {{position: \"topright\"}}).addTo(map);\n",
        base = base_entries.join(", "),
        overlays = overlay_entries.join(", "),
    )
}

/// Quotes a string as a JavaScript literal.
fn js_string(value: &str) -> String {
    embed_json(&JsonValue::String(value.to_string()).to_string())
}

/// Writes a JSON object as a JavaScript object literal.
fn js_object(object: &JsonMap<String, JsonValue>) -> String {
    embed_json(&JsonValue::Object(object.clone()).to_string())
}

/// Makes JSON text safe to embed inside a script tag.
///
/// `</` only occurs inside JSON string literals, where the escaped
/// form is equivalent.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
