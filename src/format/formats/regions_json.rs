//! Regions JSON format implementation.
//!
//! Decoding walks a parsed [`serde_json::Value`] so that every shape problem
//! can be reported with its location. Object key order is preserved, so
//! images and labels come back in document order.
//!
//! # Coordinate coercion
//!
//! Imported coordinates are truncated to whole numbers, even when the
//! document carries fractional values. Points placed or dragged during an
//! editing session keep their fractional part, and encoding writes them out
//! unchanged. Only the decode side is lossy.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::format::error::FormatError;
use crate::format::traits::{AnnotationFormat, ExportOptions, ExportResult};
use crate::model::{Point, Region};
use crate::region_store::RegionStore;

/// The legacy `image → label → [[[x, y], ...], ...]` document.
pub struct RegionsJsonFormat;

impl RegionsJsonFormat {
    /// Decode a document from JSON text.
    pub fn decode(json: &[u8]) -> Result<RegionStore, FormatError> {
        let document: Value = serde_json::from_slice(json)
            .map_err(|e| FormatError::malformed(format!("invalid JSON: {e}")))?;

        let Value::Object(images) = document else {
            return Err(FormatError::malformed(
                "top level must be an object mapping image names to labels",
            ));
        };

        let mut store = RegionStore::new();

        for (image_id, labels) in &images {
            store.register_image(image_id);

            let Value::Object(labels) = labels else {
                return Err(FormatError::malformed(format!(
                    "'{image_id}': expected an object mapping labels to regions"
                )));
            };

            for (label, regions) in labels {
                let Value::Array(regions) = regions else {
                    return Err(FormatError::malformed(format!(
                        "'{image_id}/{label}': expected an array of regions"
                    )));
                };

                store.ensure_label(image_id, label);
                for (region_index, region) in regions.iter().enumerate() {
                    let location = format!("{image_id}/{label}[{region_index}]");
                    let region = decode_region(region, &location)?;
                    store.push_region(image_id, label, region);
                }
            }
        }

        Ok(store)
    }

    /// Encode a store as JSON text.
    pub fn encode(store: &RegionStore, pretty: bool) -> Result<Vec<u8>, FormatError> {
        let bytes = if pretty {
            serde_json::to_vec_pretty(store)?
        } else {
            serde_json::to_vec(store)?
        };
        Ok(bytes)
    }
}

fn decode_region(value: &Value, location: &str) -> Result<Region, FormatError> {
    let Value::Array(points) = value else {
        return Err(FormatError::malformed(format!(
            "'{location}': expected an array of [x, y] points"
        )));
    };

    points
        .iter()
        .enumerate()
        .map(|(point_index, point)| decode_point(point, &format!("{location}[{point_index}]")))
        .collect()
}

fn decode_point(value: &Value, location: &str) -> Result<Point, FormatError> {
    let invalid = || FormatError::malformed(format!("'{location}': expected a numeric [x, y] pair"));

    match value.as_array().map(Vec::as_slice) {
        Some([x, y]) => {
            let x = x.as_f64().ok_or_else(invalid)?;
            let y = y.as_f64().ok_or_else(invalid)?;
            Ok(Point::new(x, y).truncated())
        }
        _ => Err(invalid()),
    }
}

/// Write `bytes` to `path` via a temporary file in the same directory, so an
/// interrupted or failed save never leaves a half-written document.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FormatError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".segedit-")
        .suffix(".json.tmp")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| FormatError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

impl AnnotationFormat for RegionsJsonFormat {
    fn id(&self) -> &'static str {
        "regions-json"
    }

    fn display_name(&self) -> &'static str {
        "Regions JSON"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn export(
        &self,
        store: &RegionStore,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("Exporting regions to {:?}", path);

        let (bytes, mut result) = self.export_to_bytes(store, options)?;
        write_atomically(path, &bytes)?;
        result.files_created = vec![path.to_path_buf()];

        log::info!(
            "Exported {} images with {} regions",
            result.images_exported,
            result.regions_exported
        );

        Ok(result)
    }

    fn export_to_bytes(
        &self,
        store: &RegionStore,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError> {
        let bytes = Self::encode(store, options.pretty)?;
        Ok((bytes, ExportResult::for_store(store)))
    }

    fn import(&self, path: &Path) -> Result<RegionStore, FormatError> {
        log::info!("Importing regions from {:?}", path);

        let bytes = std::fs::read(path)?;
        let store = self.import_from_bytes(&bytes)?;

        log::info!(
            "Imported {} images with {} regions ({} labels)",
            store.image_count(),
            store.region_count(),
            store.labels().len()
        );

        Ok(store)
    }

    fn import_from_bytes(&self, bytes: &[u8]) -> Result<RegionStore, FormatError> {
        Self::decode(bytes).inspect_err(|e| log::warn!("Rejected regions document: {}", e))
    }
}
