use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

use webmap::{Map, MapOptions, VectorOptions};

/// Renders an interactive web map from a YAML config.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

#[derive(Deserialize, Debug)]
struct LayerConfig {
    filepath: PathBuf,
    name: Option<String>,
    hover_color: Option<String>,
    #[serde(default = "default_true")]
    zoom_to_layer: bool,
}

#[derive(Deserialize, Debug)]
struct SplitViewConfig {
    #[serde(default = "default_split_left")]
    left: String,
    #[serde(default = "default_split_right")]
    right: String,
}

#[derive(Deserialize, Debug)]
struct Config {
    output_filepath: PathBuf,
    /// Initial center as [lat, lon].
    center: Option<(f64, f64)>,
    zoom: Option<f64>,
    height_px: Option<u32>,
    basemap: Option<String>,
    google_map: Option<String>,
    #[serde(default)]
    layers: Vec<LayerConfig>,
    split_view: Option<SplitViewConfig>,
    #[serde(default)]
    layer_control: bool,
}

fn default_true() -> bool {
    true
}

fn default_split_left() -> String {
    "openstreetmap".to_string()
}

fn default_split_right() -> String {
    "cartodbpositron".to_string()
}

fn build_map(config: &Config) -> anyhow::Result<Map> {
    let mut options = MapOptions::default();
    if let Some(center) = config.center {
        options.center = center;
    }
    if let Some(zoom) = config.zoom {
        options.zoom = zoom;
    }
    if let Some(height_px) = config.height_px {
        options.height_px = height_px;
    }
    let mut map = Map::with_options(options);

    if let Some(basemap) = &config.basemap {
        map.add_basemap(basemap)?;
    }
    if let Some(map_type) = &config.google_map {
        map.add_google_map(map_type)?;
    }
    for layer in &config.layers {
        let mut vector_options = match &layer.name {
            Some(name) => VectorOptions::named(name),
            None => VectorOptions::default(),
        };
        if let Some(color) = &layer.hover_color {
            vector_options.hover_style.color = color.clone();
        }
        vector_options.zoom_to_layer = layer.zoom_to_layer;
        log::info!("Loading vector layer from {:?}", &layer.filepath);
        map.add_vector(layer.filepath.as_path(), vector_options)?;
    }
    if let Some(split_view) = &config.split_view {
        map.add_split_map(&split_view.left, &split_view.right)?;
    }
    if config.layer_control {
        map.add_layer_control();
    }
    Ok(map)
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    let map = build_map(&config)?;
    map.write_html(&config.output_filepath)?;
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
