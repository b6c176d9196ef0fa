//! Command-line entry point.
//!
//! Loads a regions document (the path given as the first argument, or the
//! last document recorded in the config file) and prints a summary of its
//! images, labels and regions.

use std::path::PathBuf;
use std::process::ExitCode;

use segedit::{EditorConfig, FsImageProvider, ImageProvider, PolygonEditor};

fn main() -> ExitCode {
    let config = EditorConfig::load_from_default_path().unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let path = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => path,
        None => match config.preferences.last_document.clone() {
            Some(path) => path,
            None => {
                eprintln!("Usage: segedit <regions.json>");
                return ExitCode::from(2);
            }
        },
    };

    let mut editor = PolygonEditor::with_config(&config);
    if let Err(e) = editor.load_document(&path) {
        eprintln!("Failed to load {}: {}", path.display(), e);
        return ExitCode::FAILURE;
    }

    let provider = editor.base_dir().map(FsImageProvider::new);
    let store = editor.store();
    for image_id in store.image_ids() {
        let size = match provider.as_ref().map(|p| p.dimensions(image_id)) {
            Some(Ok(dims)) => format!("{}x{}", dims.width, dims.height),
            _ => "unreadable".to_string(),
        };
        println!("{image_id} ({size})");
        for label in store.labels_for(image_id) {
            println!("  {label}: {} regions", store.regions_for(image_id, label).len());
        }
    }
    println!(
        "{} images, {} labels, {} regions",
        store.image_count(),
        store.labels().len(),
        store.region_count()
    );

    let mut config = config;
    config.preferences.last_document = Some(path);
    if let Err(e) = config.save_to_default_path() {
        log::warn!("Could not update config: {}", e);
    }

    ExitCode::SUCCESS
}
