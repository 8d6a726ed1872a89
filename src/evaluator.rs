//! Main evaluation orchestrator for PASCAL VOC detection metrics.

use crate::collection::BoxCollection;
use crate::config::EvaluationConfig;
use crate::error::{Result, VocEvalError};
use crate::matching::match_class;
use crate::metrics::ap::calculate_map;
use crate::metrics::precision_recall::build_curve;
use crate::report::{ClassResult, EvaluationReport};
use crate::types::BoxRecord;

/// Evaluate detections against ground truth.
///
/// **Independent per-class evaluation**: every class is matched, turned into a
/// precision-recall curve and integrated on its own, then classes with at
/// least one ground-truth box are averaged into the mAP. Classes are visited
/// in lexical order so the report is deterministic.
///
/// # Arguments
///
/// * `collection` - Ground truth and detections of the run
/// * `config` - IoU threshold, interpolation method and output selection
///
/// # Errors
///
/// * `ThresholdOutOfRange` if the configured IoU threshold is outside [0, 1]
/// * `NoQualifyingClasses` if no class has ground truth
///
/// # Example
///
/// ```
/// use voc_eval::collection::BoxCollection;
/// use voc_eval::config::EvaluationConfig;
/// use voc_eval::evaluator::evaluate;
/// use voc_eval::types::{BoundingBox, BoxRecord};
///
/// let collection = BoxCollection::from_records(vec![
///     BoxRecord::ground_truth("img1", "cat", BoundingBox::new(10.0, 10.0, 50.0, 50.0)),
///     BoxRecord::detection("img1", "cat", BoundingBox::new(12.0, 12.0, 48.0, 48.0), 0.9),
/// ]);
/// let report = evaluate(&collection, &EvaluationConfig::default()).unwrap();
/// assert_eq!(report.map, 1.0);
/// ```
pub fn evaluate(collection: &BoxCollection, config: &EvaluationConfig) -> Result<EvaluationReport> {
    config.validate()?;

    log::debug!(
        "evaluating {} classes at IoU {} with {}",
        collection.class_count(),
        config.iou_threshold,
        config.method
    );

    let mut classes = Vec::new();
    let mut excluded_classes = Vec::new();

    for class_label in collection.classes() {
        match evaluate_class(collection, class_label, config) {
            Some(result) => {
                log::debug!("class '{}': AP {:.4}", class_label, result.ap);
                classes.push(result);
            }
            None => {
                log::debug!("class '{}' has no ground truth, excluded from mAP", class_label);
                excluded_classes.push(class_label.to_string());
            }
        }
    }

    let aps: Vec<f64> = classes.iter().map(|c| c.ap).collect();
    let map = calculate_map(&aps).ok_or(VocEvalError::NoQualifyingClasses {
        classes: collection.class_count(),
    })?;

    Ok(EvaluationReport {
        iou_threshold: config.iou_threshold,
        method: config.method,
        output: config.output,
        classes,
        excluded_classes,
        map,
        stats: collection.stats().clone(),
    })
}

/// Evaluate a single class.
///
/// Returns `None` when the class has no ground-truth boxes, since its AP is undefined.
pub fn evaluate_class(
    collection: &BoxCollection,
    class_label: &str,
    config: &EvaluationConfig,
) -> Option<ClassResult> {
    let matches = match_class(collection, class_label, config.iou_threshold);
    if matches.total_ground_truth == 0 {
        return None;
    }

    let curve = build_curve(&matches.entries, matches.total_ground_truth);
    let interpolated = config.method.interpolate(&curve.precision, &curve.recall);

    Some(ClassResult {
        class_label: class_label.to_string(),
        ap: interpolated.ap,
        total_ground_truth: curve.total_ground_truth,
        true_positives: curve.true_positives,
        false_positives: curve.false_positives,
        precision: curve.precision,
        recall: curve.recall,
        confidences: curve.confidences,
        interpolated,
    })
}

/// Build a collection from the two sides and evaluate it.
///
/// Invalid records are skipped and counted in the report's stats.
pub fn evaluate_records<G, D>(
    ground_truths: G,
    detections: D,
    config: &EvaluationConfig,
) -> Result<EvaluationReport>
where
    G: IntoIterator<Item = BoxRecord>,
    D: IntoIterator<Item = BoxRecord>,
{
    config.validate()?;
    let collection = BoxCollection::from_records(ground_truths.into_iter().chain(detections));
    evaluate(&collection, config)
}
