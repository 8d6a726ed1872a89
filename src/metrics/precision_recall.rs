//! Cumulative precision-recall curve construction.

use crate::matching::MatchEntry;
use crate::types::PrecisionRecallPoint;
use serde::{Deserialize, Serialize};

/// Precision and recall after each detection rank of one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    /// Confidence of the detection at each rank.
    pub confidences: Vec<f64>,
    pub true_positives: usize,
    pub false_positives: usize,
    pub total_ground_truth: usize,
}

impl PrecisionRecallCurve {
    /// Number of ranks (detections) on the curve.
    pub fn len(&self) -> usize {
        self.precision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precision.is_empty()
    }

    /// Curve as `(recall, precision, confidence)` points in rank order.
    pub fn points(&self) -> Vec<PrecisionRecallPoint> {
        self.recall
            .iter()
            .zip(&self.precision)
            .zip(&self.confidences)
            .map(|((&recall, &precision), &confidence)| PrecisionRecallPoint {
                recall,
                precision,
                confidence,
            })
            .collect()
    }
}

/// Calculate precision for a TP/FP count, 0.0 when both are zero.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::precision_recall::calculate_precision;
///
/// assert_eq!(calculate_precision(8, 2), 0.8);
/// assert_eq!(calculate_precision(0, 0), 0.0);
/// ```
pub fn calculate_precision(true_positives: usize, false_positives: usize) -> f64 {
    if true_positives + false_positives > 0 {
        true_positives as f64 / (true_positives + false_positives) as f64
    } else {
        0.0
    }
}

/// Calculate recall against the number of ground-truth positives, 0.0 when there are none.
///
/// ```
/// use voc_eval::metrics::precision_recall::calculate_recall;
///
/// assert_eq!(calculate_recall(3, 4), 0.75);
/// assert_eq!(calculate_recall(0, 0), 0.0);
/// ```
pub fn calculate_recall(true_positives: usize, total_ground_truth: usize) -> f64 {
    if total_ground_truth > 0 {
        true_positives as f64 / total_ground_truth as f64
    } else {
        0.0
    }
}

/// Build the cumulative precision-recall curve from a TP/FP flag sequence.
///
/// # Arguments
///
/// * `is_true_positive` - Flags in rank order (confidence descending)
/// * `total_ground_truth` - Number of ground-truth positives of the class
pub fn calculate_precision_recall_curve(
    is_true_positive: &[bool],
    total_ground_truth: usize,
) -> (Vec<f64>, Vec<f64>) {
    let mut precisions = Vec::with_capacity(is_true_positive.len());
    let mut recalls = Vec::with_capacity(is_true_positive.len());
    let mut tp = 0;
    let mut fp = 0;

    for &is_tp in is_true_positive {
        if is_tp {
            tp += 1;
        } else {
            fp += 1;
        }
        precisions.push(calculate_precision(tp, fp));
        recalls.push(calculate_recall(tp, total_ground_truth));
    }

    (precisions, recalls)
}

/// Build the curve for one class from its ordered match entries.
pub fn build_curve(entries: &[MatchEntry], total_ground_truth: usize) -> PrecisionRecallCurve {
    let flags: Vec<bool> = entries.iter().map(|e| e.is_true_positive).collect();
    let (precision, recall) = calculate_precision_recall_curve(&flags, total_ground_truth);
    let true_positives = flags.iter().filter(|&&is_tp| is_tp).count();

    PrecisionRecallCurve {
        precision,
        recall,
        confidences: entries.iter().map(|e| e.confidence).collect(),
        true_positives,
        false_positives: flags.len() - true_positives,
        total_ground_truth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_recall_curve() {
        let is_tp = vec![true, true, false, true, false];
        let (precision, recall) = calculate_precision_recall_curve(&is_tp, 4);
        assert_eq!(precision.len(), 5);
        assert_eq!(recall, vec![0.25, 0.5, 0.5, 0.75, 0.75]);
        assert_eq!(precision[0], 1.0);
        assert!((precision[2] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(precision[4], 0.6);
    }

    #[test]
    fn test_no_ground_truth_gives_zero_recall() {
        let (precision, recall) = calculate_precision_recall_curve(&[true, false], 0);
        assert_eq!(recall, vec![0.0, 0.0]);
        assert_eq!(precision, vec![1.0, 0.5]);
    }

    #[test]
    fn test_empty_sequence() {
        let (precision, recall) = calculate_precision_recall_curve(&[], 3);
        assert!(precision.is_empty());
        assert!(recall.is_empty());
    }

    #[test]
    fn test_build_curve_totals() {
        let entries = vec![
            MatchEntry::new("a", 0.9, true),
            MatchEntry::new("a", 0.8, false),
            MatchEntry::new("b", 0.7, true),
        ];
        let curve = build_curve(&entries, 4);
        assert_eq!(curve.true_positives, 2);
        assert_eq!(curve.false_positives, 1);
        assert_eq!(curve.total_ground_truth, 4);
        assert_eq!(curve.confidences, vec![0.9, 0.8, 0.7]);
        assert_eq!(*curve.recall.last().unwrap(), 0.5);

        let points = curve.points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].precision, 0.5);
        assert_eq!(points[1].confidence, 0.8);
    }
}
