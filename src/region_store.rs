//! Region storage for a session.
//!
//! [`RegionStore`] maps image identifiers to labels to ordered lists of
//! [`Region`]s. Image and label order follows insertion order, which is also
//! the order documents are written in. The list index of a region is its
//! region number (0-based here, shown 1-based to users); deleting a region
//! shifts every later index down by one.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::EditorError;
use crate::model::Region;

// ============================================================================
// Label Set
// ============================================================================

/// The global set of labels seen or created during a session.
///
/// Labels are not per-image. The set only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeSet<String>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label. Returns true if it was not already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.labels.insert(label.into())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Add every label of `other` to this set.
    pub fn merge(&mut self, other: &LabelSet) {
        self.labels.extend(other.labels.iter().cloned());
    }
}

// ============================================================================
// Region Store
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct LabelRegions {
    label: String,
    regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq)]
struct ImageRegions {
    id: String,
    labels: Vec<LabelRegions>,
}

impl ImageRegions {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            labels: Vec::new(),
        }
    }

    fn label(&self, label: &str) -> Option<&LabelRegions> {
        self.labels.iter().find(|entry| entry.label == label)
    }

    fn label_mut(&mut self, label: &str) -> Option<&mut LabelRegions> {
        self.labels.iter_mut().find(|entry| entry.label == label)
    }
}

/// Authoritative image → label → regions mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionStore {
    images: Vec<ImageRegions>,
    labels: LabelSet,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image with an empty label map. Returns false if it already existed.
    pub fn register_image(&mut self, image_id: &str) -> bool {
        if self.contains_image(image_id) {
            return false;
        }
        self.images.push(ImageRegions::new(image_id));
        true
    }

    pub fn contains_image(&self, image_id: &str) -> bool {
        self.image(image_id).is_some()
    }

    /// Image identifiers in insertion order.
    pub fn image_ids(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.id.as_str())
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Make sure `label` has a (possibly empty) region list for `image_id`.
    ///
    /// Registers the image if needed and records the label in the global
    /// label set.
    pub fn ensure_label(&mut self, image_id: &str, label: &str) {
        self.label_entry(image_id, label);
    }

    /// Append an empty region and return its index.
    pub fn append_region(&mut self, image_id: &str, label: &str) -> usize {
        self.push_region(image_id, label, Region::new())
    }

    /// Append `region` and return its index.
    pub fn push_region(&mut self, image_id: &str, label: &str, region: Region) -> usize {
        let regions = self.label_entry(image_id, label);
        regions.push(region);
        regions.len() - 1
    }

    /// Overwrite the region at `index`.
    pub fn set_region(
        &mut self,
        image_id: &str,
        label: &str,
        index: usize,
        region: Region,
    ) -> Result<(), EditorError> {
        let slot = self.region_mut(image_id, label, index)?;
        *slot = region;
        Ok(())
    }

    /// Remove the region at `index`, shifting later regions down.
    pub fn delete_region(
        &mut self,
        image_id: &str,
        label: &str,
        index: usize,
    ) -> Result<Region, EditorError> {
        self.check_index(image_id, label, index)?;
        let regions = self
            .image_mut(image_id)
            .and_then(|image| image.label_mut(label))
            .map(|entry| &mut entry.regions);
        match regions {
            Some(regions) => Ok(regions.remove(index)),
            None => Err(Self::out_of_range(image_id, label, index, 0)),
        }
    }

    /// Get the region at `index`.
    pub fn region(&self, image_id: &str, label: &str, index: usize) -> Result<&Region, EditorError> {
        self.check_index(image_id, label, index)?;
        Ok(&self.regions_for(image_id, label)[index])
    }

    /// Labels with a region list on `image_id`, in insertion order.
    /// Empty if the image is unknown.
    pub fn labels_for(&self, image_id: &str) -> Vec<&str> {
        self.image(image_id)
            .map(|image| image.labels.iter().map(|e| e.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Regions for `(image_id, label)`. Empty if either key is absent.
    pub fn regions_for(&self, image_id: &str, label: &str) -> &[Region] {
        self.image(image_id)
            .and_then(|image| image.label(label))
            .map(|entry| entry.regions.as_slice())
            .unwrap_or(&[])
    }

    /// The global label set.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Add a label to the global set without attaching it to any image.
    pub fn add_label(&mut self, label: &str) -> bool {
        self.labels.insert(label)
    }

    /// Add every label from `labels` to the global set.
    pub fn merge_labels(&mut self, labels: &LabelSet) {
        self.labels.merge(labels);
    }

    /// Total number of regions across all images and labels.
    pub fn region_count(&self) -> usize {
        self.images
            .iter()
            .flat_map(|image| image.labels.iter())
            .map(|entry| entry.regions.len())
            .sum()
    }

    fn image(&self, image_id: &str) -> Option<&ImageRegions> {
        self.images.iter().find(|image| image.id == image_id)
    }

    fn image_entry(&mut self, image_id: &str) -> &mut ImageRegions {
        match self.images.iter().position(|image| image.id == image_id) {
            Some(pos) => &mut self.images[pos],
            None => {
                self.images.push(ImageRegions::new(image_id));
                let last = self.images.len() - 1;
                &mut self.images[last]
            }
        }
    }

    fn image_mut(&mut self, image_id: &str) -> Option<&mut ImageRegions> {
        self.images.iter_mut().find(|image| image.id == image_id)
    }

    /// Region list for `(image_id, label)`, created if absent.
    fn label_entry(&mut self, image_id: &str, label: &str) -> &mut Vec<Region> {
        self.labels.insert(label);
        let image = self.image_entry(image_id);
        let pos = match image.labels.iter().position(|entry| entry.label == label) {
            Some(pos) => pos,
            None => {
                image.labels.push(LabelRegions {
                    label: label.to_string(),
                    regions: Vec::new(),
                });
                image.labels.len() - 1
            }
        };
        &mut image.labels[pos].regions
    }

    fn region_mut(
        &mut self,
        image_id: &str,
        label: &str,
        index: usize,
    ) -> Result<&mut Region, EditorError> {
        let len = self.regions_for(image_id, label).len();
        self.image_mut(image_id)
            .and_then(|image| image.label_mut(label))
            .and_then(|entry| entry.regions.get_mut(index))
            .ok_or_else(|| Self::out_of_range(image_id, label, index, len))
    }

    fn out_of_range(image_id: &str, label: &str, index: usize, len: usize) -> EditorError {
        EditorError::IndexOutOfRange {
            image: image_id.to_string(),
            label: label.to_string(),
            index,
            len,
        }
    }

    fn check_index(&self, image_id: &str, label: &str, index: usize) -> Result<(), EditorError> {
        let len = self.regions_for(image_id, label).len();
        if index < len {
            Ok(())
        } else {
            Err(Self::out_of_range(image_id, label, index, len))
        }
    }
}

/// Serializes as `{ image: { label: [region, ...] } }`, keeping insertion order.
impl Serialize for RegionStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.images.len()))?;
        for image in &self.images {
            map.serialize_entry(&image.id, image)?;
        }
        map.end()
    }
}

impl Serialize for ImageRegions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for entry in &self.labels {
            map.serialize_entry(&entry.label, &entry.regions)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn square(offset: f64) -> Region {
        Region::from_points(vec![
            Point::new(offset, offset),
            Point::new(offset + 10.0, offset),
            Point::new(offset + 10.0, offset + 10.0),
        ])
    }

    #[test]
    fn test_register_image_is_idempotent() {
        let mut store = RegionStore::new();
        assert!(store.register_image("a.png"));
        store.ensure_label("a.png", "cat");
        assert!(!store.register_image("a.png"));
        assert_eq!(store.image_count(), 1);
        // Re-registering must not wipe the label map
        assert_eq!(store.labels_for("a.png"), vec!["cat"]);
    }

    #[test]
    fn test_absent_keys_read_as_empty() {
        let store = RegionStore::new();
        assert!(store.labels_for("missing.png").is_empty());
        assert!(store.regions_for("missing.png", "cat").is_empty());
    }

    #[test]
    fn test_append_returns_increasing_indices() {
        let mut store = RegionStore::new();
        store.register_image("a.png");
        assert_eq!(store.append_region("a.png", "cat"), 0);
        assert_eq!(store.append_region("a.png", "cat"), 1);
        assert_eq!(store.append_region("a.png", "dog"), 0);
        assert_eq!(store.region_count(), 3);
        assert!(store.labels().contains("dog"));
    }

    #[test]
    fn test_set_region_overwrites() {
        let mut store = RegionStore::new();
        let index = store.append_region("a.png", "cat");
        store.set_region("a.png", "cat", index, square(0.0)).unwrap();
        assert_eq!(store.regions_for("a.png", "cat"), &[square(0.0)]);

        let err = store.set_region("a.png", "cat", 1, square(5.0)).unwrap_err();
        assert!(matches!(
            err,
            EditorError::IndexOutOfRange { index: 1, len: 1, .. }
        ));
        // Failed write leaves the store untouched
        assert_eq!(store.regions_for("a.png", "cat"), &[square(0.0)]);
    }

    #[test]
    fn test_delete_shifts_indices() {
        let mut store = RegionStore::new();
        for offset in [0.0, 100.0, 200.0] {
            store.push_region("a.png", "cat", square(offset));
        }

        let removed = store.delete_region("a.png", "cat", 0).unwrap();
        assert_eq!(removed, square(0.0));

        // B is now at 0, C at 1; the old index 2 no longer exists
        assert_eq!(store.region("a.png", "cat", 0).unwrap(), &square(100.0));
        assert_eq!(store.region("a.png", "cat", 1).unwrap(), &square(200.0));
        assert!(matches!(
            store.region("a.png", "cat", 2),
            Err(EditorError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_delete_last_region_keeps_label() {
        let mut store = RegionStore::new();
        store.push_region("a.png", "cat", square(0.0));
        store.delete_region("a.png", "cat", 0).unwrap();
        assert_eq!(store.labels_for("a.png"), vec!["cat"]);
        assert!(store.regions_for("a.png", "cat").is_empty());
    }

    #[test]
    fn test_delete_unknown_label() {
        let mut store = RegionStore::new();
        store.register_image("a.png");
        assert!(matches!(
            store.delete_region("a.png", "cat", 0),
            Err(EditorError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn test_label_set_is_sorted_and_merges() {
        let mut store = RegionStore::new();
        store.add_label("zebra");
        store.ensure_label("a.png", "ant");

        let mut other = LabelSet::new();
        other.insert("moth");
        store.merge_labels(&other);

        let labels: Vec<_> = store.labels().iter().collect();
        assert_eq!(labels, vec!["ant", "moth", "zebra"]);
        // Labels created without an image are not attached to any image
        assert_eq!(store.labels_for("a.png"), vec!["ant"]);
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let mut store = RegionStore::new();
        store.register_image("b.png");
        store.push_region("a.png", "zebra", square(0.0));
        store.ensure_label("a.png", "ant");

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(
            json,
            r#"{"b.png":{},"a.png":{"zebra":[[[0,0],[10,0],[10,10]]],"ant":[]}}"#
        );
    }
}
