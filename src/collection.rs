//! Indexed, read-only container of ground-truth and detection boxes.

use crate::error::{Result, VocEvalError};
use crate::stats::CollectionStats;
use crate::types::{BoxKind, BoxRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// What to do with a record that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidBoxPolicy {
    /// Drop the record, count it in the stats and keep going.
    #[default]
    Skip,
    /// Abort with the validation error.
    Reject,
}

/// All boxes of one evaluation run, indexed by image, class and kind.
///
/// Records keep their insertion order inside every group; the matcher relies
/// on it for stable tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct BoxCollection {
    records: Vec<BoxRecord>,
    groups: HashMap<(String, String, BoxKind), Vec<usize>>,
    detections_by_class: HashMap<String, Vec<usize>>,
    ground_truth_counts: HashMap<String, usize>,
    classes: BTreeSet<String>,
    stats: CollectionStats,
}

impl BoxCollection {
    /// Build a collection, skipping invalid records.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::collection::BoxCollection;
    /// use voc_eval::types::{BoundingBox, BoxRecord};
    ///
    /// let collection = BoxCollection::from_records(vec![
    ///     BoxRecord::ground_truth("img1", "dog", BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
    ///     BoxRecord::ground_truth("img1", "dog", BoundingBox::new(10.0, 0.0, 0.0, 10.0)),
    /// ]);
    /// assert_eq!(collection.len(), 1);
    /// assert_eq!(collection.stats().skipped_invalid_geometry, 1);
    /// ```
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = BoxRecord>,
    {
        let mut collection = Self::default();
        for record in records {
            if let Err(err) = collection.insert(record) {
                log::warn!("skipping box record: {}", err);
            }
        }
        collection.stats.log_summary();
        collection
    }

    /// Build a collection applying the given policy to invalid records.
    pub fn try_from_records<I>(records: I, policy: InvalidBoxPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = BoxRecord>,
    {
        let mut collection = Self::default();
        for record in records {
            match (collection.insert(record), policy) {
                (Err(err), InvalidBoxPolicy::Skip) => log::warn!("skipping box record: {}", err),
                (result, _) => result?,
            }
        }
        collection.stats.log_summary();
        Ok(collection)
    }

    /// Store a valid record. An invalid one is counted as skipped and returned as the error.
    fn insert(&mut self, record: BoxRecord) -> Result<()> {
        self.stats.add_record();

        if let Err(err) = record.validate() {
            match &err {
                VocEvalError::InvalidGeometry { .. } => self.stats.skip_invalid_geometry(),
                _ => self.stats.skip_invalid_confidence(),
            }
            return Err(err);
        }

        let index = self.records.len();
        let key = (record.image_id.clone(), record.class_label.clone(), record.kind);
        self.groups.entry(key).or_default().push(index);
        self.classes.insert(record.class_label.clone());

        match record.kind {
            BoxKind::GroundTruth => {
                self.stats.accept_ground_truth();
                *self
                    .ground_truth_counts
                    .entry(record.class_label.clone())
                    .or_insert(0) += 1;
            }
            BoxKind::Detection => {
                self.stats.accept_detection();
                self.detections_by_class
                    .entry(record.class_label.clone())
                    .or_default()
                    .push(index);
            }
        }

        self.records.push(record);
        Ok(())
    }

    /// Records of one image, class and kind, in insertion order.
    pub fn query(&self, image_id: &str, class_label: &str, kind: BoxKind) -> Vec<&BoxRecord> {
        self.groups
            .get(&(image_id.to_string(), class_label.to_string(), kind))
            .map(|indices| indices.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Ground-truth boxes of one image and class.
    pub fn ground_truths(&self, image_id: &str, class_label: &str) -> Vec<&BoxRecord> {
        self.query(image_id, class_label, BoxKind::GroundTruth)
    }

    /// All detections of a class across images, in insertion order.
    pub fn detections(&self, class_label: &str) -> Vec<&BoxRecord> {
        self.detections_by_class
            .get(class_label)
            .map(|indices| indices.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Number of ground-truth boxes of a class across all images.
    pub fn ground_truth_count(&self, class_label: &str) -> usize {
        self.ground_truth_counts.get(class_label).copied().unwrap_or(0)
    }

    /// Distinct class labels from both sides, in lexical order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// All accepted records in insertion order.
    pub fn records(&self) -> &[BoxRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counters of accepted and skipped records.
    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }
}

impl FromIterator<BoxRecord> for BoxCollection {
    fn from_iter<I: IntoIterator<Item = BoxRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
