//! Average Precision (AP) and mean Average Precision (mAP) calculation.
//!
//! Two PASCAL VOC integration rules are supported, both consuming the same
//! `(precision[], recall[])` pair in rank order:
//!
//! - [`InterpolationMethod::ElevenPoint`]: VOC2007 style, mean of the maximum
//!   precision at recall >= r for r in {0.0, 0.1, ..., 1.0}.
//! - [`InterpolationMethod::EveryPoint`]: VOC2010+ style, area under the
//!   monotonic precision envelope.

use serde::{Deserialize, Serialize};

/// Number of recall levels sampled by the 11-point rule.
pub const ELEVEN_POINT_LEVELS: usize = 11;

/// Rule used to turn a precision-recall curve into a scalar AP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    ElevenPoint,
    EveryPoint,
}

impl InterpolationMethod {
    /// Calculate AP for a curve given in rank order.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::metrics::ap::InterpolationMethod;
    ///
    /// let precisions = vec![1.0, 0.5];
    /// let recalls = vec![0.5, 0.5];
    /// assert_eq!(InterpolationMethod::EveryPoint.average_precision(&precisions, &recalls), 0.5);
    /// assert_eq!(
    ///     InterpolationMethod::ElevenPoint.average_precision(&precisions, &recalls),
    ///     6.0 / 11.0
    /// );
    /// ```
    pub fn average_precision(&self, precisions: &[f64], recalls: &[f64]) -> f64 {
        self.interpolate(precisions, recalls).ap
    }

    /// Calculate AP together with the interpolated curve it integrates.
    pub fn interpolate(&self, precisions: &[f64], recalls: &[f64]) -> InterpolatedCurve {
        match self {
            Self::ElevenPoint => eleven_point_interpolation(precisions, recalls),
            Self::EveryPoint => every_point_interpolation(precisions, recalls),
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElevenPoint => write!(f, "11-point interpolation"),
            Self::EveryPoint => write!(f, "every-point interpolation"),
        }
    }
}

/// AP plus the interpolated precision-recall curve, ready for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedCurve {
    pub ap: f64,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

/// 11-point interpolated AP.
///
/// The returned curve holds the 11 recall levels in ascending order and the
/// interpolated precision at each level.
pub fn eleven_point_interpolation(precisions: &[f64], recalls: &[f64]) -> InterpolatedCurve {
    let recall_levels: Vec<f64> = (0..ELEVEN_POINT_LEVELS)
        .map(|i| i as f64 / (ELEVEN_POINT_LEVELS - 1) as f64)
        .collect();

    let interpolated: Vec<f64> = recall_levels
        .iter()
        .map(|&level| {
            precisions
                .iter()
                .zip(recalls)
                .filter(|(_, &r)| r >= level)
                .map(|(&p, _)| p)
                .fold(0.0f64, f64::max)
        })
        .collect();

    let ap = interpolated.iter().sum::<f64>() / ELEVEN_POINT_LEVELS as f64;

    InterpolatedCurve {
        ap: ap.clamp(0.0, 1.0),
        precision: interpolated,
        recall: recall_levels,
    }
}

/// Every-point (area under the envelope) interpolated AP.
///
/// The curve is padded with `(recall 0, precision 0)` in front and
/// `(recall 1, precision 0)` at the end, the precision is replaced by its
/// running maximum from the high-recall end, and rectangles are summed where
/// recall changes. The returned curve is the envelope without the trailing
/// sentinel.
pub fn every_point_interpolation(precisions: &[f64], recalls: &[f64]) -> InterpolatedCurve {
    let n = precisions.len().min(recalls.len());

    let mut mrec = Vec::with_capacity(n + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(&recalls[..n]);
    mrec.push(1.0);

    let mut mpre = Vec::with_capacity(n + 2);
    mpre.push(0.0);
    mpre.extend_from_slice(&precisions[..n]);
    mpre.push(0.0);

    for i in (0..mpre.len() - 1).rev() {
        mpre[i] = mpre[i].max(mpre[i + 1]);
    }

    let ap: f64 = (1..mrec.len())
        .filter(|&i| mrec[i] != mrec[i - 1])
        .map(|i| (mrec[i] - mrec[i - 1]) * mpre[i])
        .sum();

    mrec.pop();
    mpre.pop();

    InterpolatedCurve {
        ap: ap.clamp(0.0, 1.0),
        precision: mpre,
        recall: mrec,
    }
}

/// Calculate mean Average Precision (mAP) across classes.
///
/// Returns `None` for an empty slice, since the mean is undefined there.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::calculate_map;
///
/// let class_aps = vec![0.8, 0.9, 0.75, 0.85];
/// let map = calculate_map(&class_aps).unwrap();
/// assert!((map - 0.825).abs() < 1e-10);
/// assert!(calculate_map(&[]).is_none());
/// ```
pub fn calculate_map(class_aps: &[f64]) -> Option<f64> {
    if class_aps.is_empty() {
        return None;
    }

    Some(class_aps.iter().sum::<f64>() / class_aps.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve_is_zero() {
        assert_eq!(InterpolationMethod::ElevenPoint.average_precision(&[], &[]), 0.0);
        assert_eq!(InterpolationMethod::EveryPoint.average_precision(&[], &[]), 0.0);
    }

    #[test]
    fn test_single_perfect_detection() {
        let ap11 = InterpolationMethod::ElevenPoint.average_precision(&[1.0], &[1.0]);
        let ap_all = InterpolationMethod::EveryPoint.average_precision(&[1.0], &[1.0]);
        assert_eq!(ap11, 1.0);
        assert_eq!(ap_all, 1.0);
    }

    #[test]
    fn test_perfect_ranking() {
        let precisions = vec![1.0; 10];
        let recalls: Vec<f64> = (1..=10).map(|i| i as f64 / 10.0).collect();
        let ap = InterpolationMethod::EveryPoint.average_precision(&precisions, &recalls);
        assert!((ap - 1.0).abs() < 1e-12);
        let ap11 = InterpolationMethod::ElevenPoint.average_precision(&precisions, &recalls);
        assert!((ap11 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_point_envelope() {
        // TP, FP, TP with 3 ground truths
        let precisions = vec![1.0, 0.5, 2.0 / 3.0];
        let recalls = vec![1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0];
        let curve = every_point_interpolation(&precisions, &recalls);

        // 1/3 * 1.0 + 1/3 * 2/3
        assert!((curve.ap - (1.0 / 3.0 + 2.0 / 9.0)).abs() < 1e-12);
        assert_eq!(curve.recall.len(), 4);
        assert_eq!(curve.precision[0], 1.0);
        assert_eq!(curve.precision[2], 2.0 / 3.0);
    }

    #[test]
    fn test_eleven_point_levels() {
        let precisions = vec![1.0, 0.5, 2.0 / 3.0];
        let recalls = vec![1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0];
        let curve = eleven_point_interpolation(&precisions, &recalls);

        // r in {0.0..0.3} -> 1.0, r in {0.4..0.6} -> 2/3, r >= 0.7 -> 0
        let expected = (4.0 * 1.0 + 3.0 * (2.0 / 3.0)) / 11.0;
        assert!((curve.ap - expected).abs() < 1e-12);
        assert_eq!(curve.recall.len(), 11);
        assert_eq!(curve.recall[10], 1.0);
        assert_eq!(curve.precision[10], 0.0);
    }

    #[test]
    fn test_eleven_point_recall_on_level() {
        // 3 TPs over 10 ground truths: final recall lands exactly on level 0.3
        let precisions = vec![1.0, 1.0, 1.0];
        let recalls: Vec<f64> = (1..=3).map(|tp| tp as f64 / 10.0).collect();
        assert_eq!(recalls[2], 0.3);

        let curve = eleven_point_interpolation(&precisions, &recalls);
        assert_eq!(curve.precision[3], 1.0);
        assert_eq!(curve.precision[4], 0.0);
        assert!((curve.ap - 4.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_false_positives() {
        let precisions = vec![0.0, 0.0];
        let recalls = vec![0.0, 0.0];
        assert_eq!(InterpolationMethod::EveryPoint.average_precision(&precisions, &recalls), 0.0);
        // Recall level 0.0 is reached, but with precision 0.
        assert_eq!(InterpolationMethod::ElevenPoint.average_precision(&precisions, &recalls), 0.0);
    }

    #[test]
    fn test_recomputation_is_bit_identical() {
        let precisions = vec![1.0, 0.5, 0.6667, 0.75, 0.6];
        let recalls = vec![0.25, 0.25, 0.5, 0.75, 0.75];
        for method in [InterpolationMethod::ElevenPoint, InterpolationMethod::EveryPoint] {
            let first = method.average_precision(&precisions, &recalls);
            let second = method.average_precision(&precisions, &recalls);
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn test_calculate_map() {
        assert_eq!(calculate_map(&[0.5]), Some(0.5));
        assert_eq!(calculate_map(&[]), None);
    }
}
