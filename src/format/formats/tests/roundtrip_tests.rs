//! Round-trip tests through the encoder and decoder, in memory and on disk.

use crate::format::formats::RegionsJsonFormat;
use crate::format::{AnnotationFormat, ExportOptions};
use crate::model::{Point, Region};
use crate::region_store::RegionStore;

fn region(points: &[(f64, f64)]) -> Region {
    points.iter().copied().map(Point::from).collect()
}

/// Store built through the public mutation operations only.
fn create_store() -> RegionStore {
    let mut store = RegionStore::new();
    store.register_image("img1.png");
    store.register_image("img2.png");
    store.register_image("empty.png");

    let i = store.append_region("img1.png", "cat");
    store
        .set_region("img1.png", "cat", i, region(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]))
        .unwrap();
    let i = store.append_region("img1.png", "cat");
    store
        .set_region("img1.png", "cat", i, region(&[(0.0, 0.0), (5.0, 0.0)]))
        .unwrap();
    store.append_region("img1.png", "dog");

    let i = store.append_region("img2.png", "dog");
    store
        .set_region(
            "img2.png",
            "dog",
            i,
            region(&[(100.0, 200.0), (300.0, 200.0), (300.0, 400.0), (100.0, 400.0)]),
        )
        .unwrap();
    store.ensure_label("img2.png", "bird");

    store
}

#[test]
fn test_roundtrip_in_memory() {
    let original = create_store();

    for pretty in [true, false] {
        let bytes = RegionsJsonFormat::encode(&original, pretty).unwrap();
        let loaded = RegionsJsonFormat::decode(&bytes).unwrap();
        assert_eq!(loaded, original);
    }
}

#[test]
fn test_roundtrip_details() {
    let original = create_store();
    let bytes = RegionsJsonFormat::encode(&original, true).unwrap();
    let loaded = RegionsJsonFormat::decode(&bytes).unwrap();

    assert_eq!(
        loaded.image_ids().collect::<Vec<_>>(),
        original.image_ids().collect::<Vec<_>>()
    );
    for image in original.image_ids() {
        assert_eq!(loaded.labels_for(image), original.labels_for(image));
        for label in original.labels_for(image) {
            assert_eq!(
                loaded.regions_for(image, label),
                original.regions_for(image, label)
            );
        }
    }
    assert_eq!(loaded.labels(), original.labels());
}

#[test]
fn test_roundtrip_after_delete_keeps_empty_label() {
    let mut store = RegionStore::new();
    store.push_region("img1.png", "cat", region(&[(10.0, 10.0), (20.0, 10.0)]));
    store.delete_region("img1.png", "cat", 0).unwrap();

    let bytes = RegionsJsonFormat::encode(&store, false).unwrap();
    assert_eq!(
        String::from_utf8(bytes.clone()).unwrap(),
        r#"{"img1.png":{"cat":[]}}"#
    );
    assert_eq!(RegionsJsonFormat::decode(&bytes).unwrap(), store);
}

#[test]
fn test_export_import_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    let original = create_store();

    let result = RegionsJsonFormat
        .export(&original, &path, &ExportOptions::default())
        .unwrap();
    assert_eq!(result.images_exported, 3);
    assert_eq!(result.regions_exported, 4);
    assert_eq!(result.files_created, vec![path.clone()]);

    let loaded = RegionsJsonFormat.import(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn test_export_replaces_existing_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    std::fs::write(&path, "old contents that are much longer than the new document").unwrap();

    let mut store = RegionStore::new();
    store.register_image("a.png");
    RegionsJsonFormat
        .export(&store, &path, &ExportOptions::new().pretty(false))
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"a.png":{}}"#);
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("regions.json");
    let result = RegionsJsonFormat.export(&create_store(), &path, &ExportOptions::default());
    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn test_import_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = RegionsJsonFormat
        .import(&dir.path().join("missing.json"))
        .unwrap_err();
    assert!(!err.is_malformed());
}
