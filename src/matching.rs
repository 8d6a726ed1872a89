//! Detection matching utilities for evaluating predictions against ground truth.

use crate::collection::BoxCollection;
use crate::metrics::iou::calculate_iou;
use crate::types::BoxRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of matching one detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub image_id: String,
    pub confidence: f64,
    pub is_true_positive: bool,
    /// Best IoU against the unclaimed ground truths of the image (0.0 if none).
    pub iou: f64,
    /// Index of the claimed ground truth in the slice it was matched against.
    pub ground_truth_index: Option<usize>,
}

impl MatchEntry {
    pub fn new(image_id: impl Into<String>, confidence: f64, is_true_positive: bool) -> Self {
        Self {
            image_id: image_id.into(),
            confidence,
            is_true_positive,
            iou: 0.0,
            ground_truth_index: None,
        }
    }
}

/// Matched detections of one class, ordered by confidence (descending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMatches {
    pub class_label: String,
    pub entries: Vec<MatchEntry>,
    /// Ground-truth boxes of the class across all images, matched or not.
    pub total_ground_truth: usize,
}

impl ClassMatches {
    pub fn true_positives(&self) -> usize {
        self.entries.iter().filter(|e| e.is_true_positive).count()
    }

    pub fn false_positives(&self) -> usize {
        self.entries.len() - self.true_positives()
    }

    /// Ground truths never claimed by a detection.
    pub fn false_negatives(&self) -> usize {
        self.total_ground_truth - self.true_positives()
    }
}

/// Claimed ground-truth boxes, one bitmap per image.
///
/// A box can be claimed once; later detections must skip it.
#[derive(Debug, Default)]
pub struct ClaimSet {
    claimed: HashMap<String, Vec<bool>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether ground truth `index` of `image_id` has been claimed.
    pub fn is_claimed(&self, image_id: &str, index: usize) -> bool {
        self.claimed
            .get(image_id)
            .and_then(|bits| bits.get(index).copied())
            .unwrap_or(false)
    }

    /// Claim ground truth `index` of `image_id`; returns false if it was already taken.
    pub fn claim(&mut self, image_id: &str, index: usize) -> bool {
        let bits = self.claimed.entry(image_id.to_string()).or_default();
        if bits.len() <= index {
            bits.resize(index + 1, false);
        }
        if bits[index] {
            return false;
        }
        bits[index] = true;
        true
    }

    /// Number of claimed boxes across all images.
    pub fn claimed_count(&self) -> usize {
        self.claimed
            .values()
            .map(|bits| bits.iter().filter(|&&b| b).count())
            .sum()
    }
}

/// Order detections by confidence, highest first, keeping input order on ties.
pub fn sort_by_confidence(detections: &mut [&BoxRecord]) {
    // slice::sort_by is stable; total_cmp keeps the order total even for NaN
    detections.sort_by(|a, b| b.score().total_cmp(&a.score()));
}

/// Find the unclaimed ground truth with the highest IoU.
///
/// Ties keep the lowest stored index.
fn best_unclaimed<'a>(
    detection: &BoxRecord,
    candidates: impl Iterator<Item = (usize, &'a BoxRecord)>,
    claims: &ClaimSet,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (gt_idx, gt) in candidates {
        if claims.is_claimed(&detection.image_id, gt_idx) {
            continue;
        }

        let iou = calculate_iou(&detection.bbox, &gt.bbox);
        match best {
            Some((_, best_iou)) if iou <= best_iou => {}
            _ => best = Some((gt_idx, iou)),
        }
    }

    best
}

fn assign<'a>(
    detection: &BoxRecord,
    candidates: impl Iterator<Item = (usize, &'a BoxRecord)>,
    claims: &mut ClaimSet,
    iou_threshold: f64,
) -> MatchEntry {
    let mut entry = MatchEntry::new(detection.image_id.clone(), detection.score(), false);

    if let Some((gt_idx, iou)) = best_unclaimed(detection, candidates, claims) {
        entry.iou = iou;
        if iou >= iou_threshold && claims.claim(&detection.image_id, gt_idx) {
            entry.is_true_positive = true;
            entry.ground_truth_index = Some(gt_idx);
        }
    }

    log::trace!(
        "detection image={} conf={:.4} iou={:.4} tp={}",
        entry.image_id,
        entry.confidence,
        entry.iou,
        entry.is_true_positive
    );

    entry
}

/// Match detections to ground truth.
///
/// Uses greedy matching: detections are sorted by confidence (descending,
/// stable), and each one claims the highest-IoU unclaimed ground truth of its
/// own image and class when that IoU reaches `iou_threshold`. Ground truths
/// of other images or classes are never candidates.
///
/// # Arguments
///
/// * `detections` - Detections to rank, usually one image/class group
/// * `ground_truths` - Ground truth boxes; indices in the result refer to this slice
/// * `iou_threshold` - Minimum IoU to consider a match
///
/// # Returns
///
/// One entry per detection, sorted by confidence (descending).
pub fn match_detections(
    detections: &[&BoxRecord],
    ground_truths: &[&BoxRecord],
    iou_threshold: f64,
) -> Vec<MatchEntry> {
    let mut ordered = detections.to_vec();
    sort_by_confidence(&mut ordered);

    let mut claims = ClaimSet::new();
    ordered
        .into_iter()
        .map(|det| {
            let candidates = ground_truths
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, gt)| gt.image_id == det.image_id && gt.class_label == det.class_label);
            assign(det, candidates, &mut claims, iou_threshold)
        })
        .collect()
}

/// Match all detections of one class across every image of the collection.
///
/// Detections are ranked globally by confidence; each may only claim ground
/// truth from its own image.
///
/// # Example
///
/// ```
/// use voc_eval::collection::BoxCollection;
/// use voc_eval::matching::match_class;
/// use voc_eval::types::{BoundingBox, BoxRecord};
///
/// let collection = BoxCollection::from_records(vec![
///     BoxRecord::ground_truth("img1", "dog", BoundingBox::new(10.0, 10.0, 50.0, 50.0)),
///     BoxRecord::detection("img1", "dog", BoundingBox::new(12.0, 12.0, 48.0, 48.0), 0.9),
///     BoxRecord::detection("img2", "dog", BoundingBox::new(12.0, 12.0, 48.0, 48.0), 0.8),
/// ]);
/// let matches = match_class(&collection, "dog", 0.5);
/// assert!(matches.entries[0].is_true_positive);
/// assert!(!matches.entries[1].is_true_positive);
/// assert_eq!(matches.total_ground_truth, 1);
/// ```
pub fn match_class(collection: &BoxCollection, class_label: &str, iou_threshold: f64) -> ClassMatches {
    let mut detections = collection.detections(class_label);
    sort_by_confidence(&mut detections);

    let mut ground_truths_by_image: HashMap<&str, Vec<&BoxRecord>> = HashMap::new();
    let mut claims = ClaimSet::new();
    let mut entries = Vec::with_capacity(detections.len());

    for det in detections {
        let ground_truths = ground_truths_by_image
            .entry(det.image_id.as_str())
            .or_insert_with(|| collection.ground_truths(&det.image_id, class_label));
        entries.push(assign(
            det,
            ground_truths.iter().copied().enumerate(),
            &mut claims,
            iou_threshold,
        ));
    }

    let total_ground_truth = collection.ground_truth_count(class_label);
    log::debug!(
        "class '{}': {} detections, {} ground truths, {} claimed",
        class_label,
        entries.len(),
        total_ground_truth,
        claims.claimed_count()
    );

    ClassMatches {
        class_label: class_label.to_string(),
        entries,
        total_ground_truth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn gt(image: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> BoxRecord {
        BoxRecord::ground_truth(image, "obj", BoundingBox::new(x1, y1, x2, y2))
    }

    fn det(image: &str, x1: f64, y1: f64, x2: f64, y2: f64, conf: f64) -> BoxRecord {
        BoxRecord::detection(image, "obj", BoundingBox::new(x1, y1, x2, y2), conf)
    }

    #[test]
    fn test_perfect_match() {
        let gts = [gt("a", 10.0, 10.0, 50.0, 50.0)];
        let dets = [det("a", 10.0, 10.0, 50.0, 50.0, 0.9)];

        let matches = match_detections(&[&dets[0]], &[&gts[0]], 0.5);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_true_positive);
        assert_eq!(matches[0].iou, 1.0);
        assert_eq!(matches[0].ground_truth_index, Some(0));
    }

    #[test]
    fn test_no_match() {
        let gts = [gt("a", 200.0, 200.0, 250.0, 250.0)];
        let dets = [det("a", 10.0, 10.0, 50.0, 50.0, 0.9)];

        let matches = match_detections(&[&dets[0]], &[&gts[0]], 0.5);
        assert!(!matches[0].is_true_positive);
        assert_eq!(matches[0].ground_truth_index, None);
    }

    #[test]
    fn test_no_ground_truth_is_false_positive() {
        let dets = [det("a", 10.0, 10.0, 50.0, 50.0, 0.9)];
        let matches = match_detections(&[&dets[0]], &[], 0.0);
        assert!(!matches[0].is_true_positive);
    }

    #[test]
    fn test_confidence_sorting() {
        let gts = [gt("a", 20.0, 20.0, 70.0, 70.0)];
        let dets = [
            det("a", 10.0, 10.0, 60.0, 60.0, 0.5),
            det("a", 20.0, 20.0, 70.0, 70.0, 0.9),
            det("a", 30.0, 30.0, 80.0, 80.0, 0.7),
        ];
        let det_refs: Vec<&BoxRecord> = dets.iter().collect();

        let matches = match_detections(&det_refs, &[&gts[0]], 0.5);
        let confidences: Vec<f64> = matches.iter().map(|m| m.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.7, 0.5]);

        // Only the highest confidence detection claims the ground truth
        assert!(matches[0].is_true_positive);
        assert!(!matches[1].is_true_positive);
        assert!(!matches[2].is_true_positive);
    }

    #[test]
    fn test_claimed_box_skipped_for_next_best() {
        // Second detection overlaps both; first is claimed so it takes the second.
        let gts = [gt("a", 0.0, 0.0, 10.0, 10.0), gt("a", 2.0, 0.0, 12.0, 10.0)];
        let dets = [
            det("a", 0.0, 0.0, 10.0, 10.0, 0.9),
            det("a", 1.0, 0.0, 11.0, 10.0, 0.8),
        ];
        let gt_refs: Vec<&BoxRecord> = gts.iter().collect();
        let det_refs: Vec<&BoxRecord> = dets.iter().collect();

        let matches = match_detections(&det_refs, &gt_refs, 0.5);
        assert_eq!(matches[0].ground_truth_index, Some(0));
        assert_eq!(matches[1].ground_truth_index, Some(1));
        assert!(matches[1].is_true_positive);
    }

    #[test]
    fn test_tie_break_lowest_index() {
        let gts = [gt("a", 0.0, 0.0, 10.0, 10.0), gt("a", 0.0, 0.0, 10.0, 10.0)];
        let dets = [det("a", 0.0, 0.0, 10.0, 10.0, 0.9)];
        let gt_refs: Vec<&BoxRecord> = gts.iter().collect();

        let matches = match_detections(&[&dets[0]], &gt_refs, 0.5);
        assert_eq!(matches[0].ground_truth_index, Some(0));
    }

    #[test]
    fn test_equal_confidence_keeps_input_order() {
        let collection = BoxCollection::from_records(vec![
            gt("a", 0.0, 0.0, 10.0, 10.0),
            det("a", 0.0, 0.0, 10.0, 9.0, 0.5),
            det("a", 0.0, 0.0, 10.0, 10.0, 0.5),
        ]);

        let matches = match_class(&collection, "obj", 0.5);
        // The first stored detection wins the box although the second fits better.
        assert!(matches.entries[0].is_true_positive);
        assert!((matches.entries[0].iou - 0.9).abs() < 1e-12);
        assert!(!matches.entries[1].is_true_positive);
    }

    #[test]
    fn test_claims_scoped_per_image() {
        let collection = BoxCollection::from_records(vec![
            gt("a", 0.0, 0.0, 10.0, 10.0),
            gt("b", 0.0, 0.0, 10.0, 10.0),
            det("a", 0.0, 0.0, 10.0, 10.0, 0.9),
            det("b", 0.0, 0.0, 10.0, 10.0, 0.8),
            det("c", 0.0, 0.0, 10.0, 10.0, 0.7),
        ]);

        let matches = match_class(&collection, "obj", 0.5);
        assert_eq!(matches.true_positives(), 2);
        assert_eq!(matches.false_positives(), 1);
        assert_eq!(matches.false_negatives(), 0);
        assert_eq!(matches.entries[2].image_id, "c");
        assert!(!matches.entries[2].is_true_positive);
    }

    #[test]
    fn test_mixed_images_claim_only_own_ground_truth() {
        let gts = [gt("a", 0.0, 0.0, 10.0, 10.0)];
        let dets = [
            det("a", 0.0, 0.0, 10.0, 10.0, 0.9),
            det("b", 0.0, 0.0, 10.0, 10.0, 0.8),
        ];
        let det_refs: Vec<&BoxRecord> = dets.iter().collect();

        let matches = match_detections(&det_refs, &[&gts[0]], 0.5);
        assert!(matches[0].is_true_positive);
        assert_eq!(matches[0].ground_truth_index, Some(0));
        // Same box, other image: never a candidate.
        assert!(!matches[1].is_true_positive);
        assert_eq!(matches[1].ground_truth_index, None);
        assert_eq!(matches[1].iou, 0.0);
    }

    #[test]
    fn test_mixed_slices_scope_by_image_and_class() {
        let gts = [
            BoxRecord::ground_truth("a", "cat", BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            gt("b", 0.0, 0.0, 10.0, 10.0),
            gt("a", 0.0, 0.0, 10.0, 10.0),
        ];
        let dets = [
            det("a", 0.0, 0.0, 10.0, 10.0, 0.9),
            det("a", 0.0, 0.0, 10.0, 10.0, 0.8),
            det("b", 0.0, 0.0, 10.0, 10.0, 0.7),
        ];
        let gt_refs: Vec<&BoxRecord> = gts.iter().collect();
        let det_refs: Vec<&BoxRecord> = dets.iter().collect();

        let matches = match_detections(&det_refs, &gt_refs, 0.5);
        let claimed: Vec<Option<usize>> = matches.iter().map(|m| m.ground_truth_index).collect();
        assert_eq!(claimed, vec![Some(2), None, Some(1)]);
        assert_eq!(matches.iter().filter(|m| m.is_true_positive).count(), 2);
    }

    #[test]
    fn test_nan_confidence_sorts_without_panic() {
        let dets = [
            det("a", 0.0, 0.0, 10.0, 10.0, 0.3),
            det("a", 0.0, 0.0, 10.0, 10.0, f64::NAN),
            det("a", 0.0, 0.0, 10.0, 10.0, 0.7),
        ];
        let mut det_refs: Vec<&BoxRecord> = dets.iter().collect();
        sort_by_confidence(&mut det_refs);

        // Positive NaN orders above every finite score under total_cmp.
        assert!(det_refs[0].score().is_nan());
        assert_eq!(det_refs[1].score(), 0.7);
        assert_eq!(det_refs[2].score(), 0.3);
    }

    #[test]
    fn test_claim_set() {
        let mut claims = ClaimSet::new();
        assert!(!claims.is_claimed("a", 3));
        assert!(claims.claim("a", 3));
        assert!(!claims.claim("a", 3));
        assert!(claims.is_claimed("a", 3));
        assert!(!claims.is_claimed("b", 3));
        assert_eq!(claims.claimed_count(), 1);
    }
}
