//! Evaluation results and their export.
//!
//! The report is plain data: rendering to text or JSON returns a `String` and
//! the caller decides where it goes.

use crate::config::OutputFields;
use crate::error::Result;
use crate::metrics::ap::{InterpolatedCurve, InterpolationMethod};
use crate::stats::CollectionStats;
use crate::types::PrecisionRecallPoint;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Metrics of one class with at least one ground-truth box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResult {
    pub class_label: String,
    pub ap: f64,
    /// Cumulative precision per detection rank.
    pub precision: Vec<f64>,
    /// Cumulative recall per detection rank.
    pub recall: Vec<f64>,
    /// Detection confidence per rank.
    pub confidences: Vec<f64>,
    pub total_ground_truth: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub interpolated: InterpolatedCurve,
}

impl ClassResult {
    /// `(recall, precision)` pairs in rank order, for curve plotting.
    pub fn plot_series(&self) -> Vec<(f64, f64)> {
        self.recall
            .iter()
            .copied()
            .zip(self.precision.iter().copied())
            .collect()
    }

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

    /// Ground truths never matched.
    pub fn false_negatives(&self) -> usize {
        self.total_ground_truth.saturating_sub(self.true_positives)
    }

    /// Keep only the selected fields.
    pub fn summary(&self, fields: &OutputFields) -> ClassSummary {
        ClassSummary {
            class_label: self.class_label.clone(),
            ap: fields.ap.then_some(self.ap),
            precision: fields.precision.then(|| self.precision.clone()),
            recall: fields.recall.then(|| self.recall.clone()),
            total_ground_truth: fields.totals.then_some(self.total_ground_truth),
            true_positives: fields.totals.then_some(self.true_positives),
            false_positives: fields.totals.then_some(self.false_positives),
            interpolated: fields.interpolated.then(|| self.interpolated.clone()),
        }
    }
}

/// A class result reduced to the configured output fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ground_truth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_positives: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_positives: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolated: Option<InterpolatedCurve>,
}

/// Result of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub iou_threshold: f64,
    pub method: InterpolationMethod,
    pub output: OutputFields,
    /// Classes with ground truth, in lexical order.
    pub classes: Vec<ClassResult>,
    /// Classes seen only in detections; they do not count towards the mAP.
    pub excluded_classes: Vec<String>,
    pub map: f64,
    pub stats: CollectionStats,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    iou_threshold: f64,
    method: InterpolationMethod,
    map: f64,
    classes: Vec<ClassSummary>,
    excluded_classes: &'a [String],
    stats: &'a CollectionStats,
}

impl EvaluationReport {
    /// Result of one class, if it was evaluated.
    pub fn class(&self, class_label: &str) -> Option<&ClassResult> {
        self.classes.iter().find(|c| c.class_label == class_label)
    }

    /// Per-class results reduced to the configured output fields.
    pub fn summaries(&self) -> Vec<ClassSummary> {
        self.classes.iter().map(|c| c.summary(&self.output)).collect()
    }

    /// Serialize the report, honoring the configured output fields.
    pub fn to_json(&self) -> Result<String> {
        let summary = ReportSummary {
            iou_threshold: self.iou_threshold,
            method: self.method,
            map: self.map,
            classes: self.summaries(),
            excluded_classes: &self.excluded_classes,
            stats: &self.stats,
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    /// Render the plain-text results summary.
    ///
    /// AP and mAP are printed as percentages with two decimals, precision and
    /// recall values with two decimals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let fields = &self.output;

        // Writing to a String cannot fail.
        let _ = writeln!(out, "Object Detection Metrics (PASCAL VOC)");
        let _ = writeln!(out, "IoU threshold: {}", self.iou_threshold);
        let _ = writeln!(out, "Method: {}", self.method);
        let _ = write!(out, "\nAverage Precision (AP), Precision and Recall per class:");

        for class in &self.classes {
            let _ = write!(out, "\n\nClass: {}", class.class_label);
            if fields.ap {
                let _ = write!(out, "\nAP: {}", format_percent(class.ap));
            }
            if fields.precision {
                let _ = write!(out, "\nPrecision: {}", format_values(&class.precision));
            }
            if fields.recall {
                let _ = write!(out, "\nRecall: {}", format_values(&class.recall));
            }
            if fields.totals {
                let _ = write!(
                    out,
                    "\nGround truth: {}, TP: {}, FP: {}",
                    class.total_ground_truth, class.true_positives, class.false_positives
                );
            }
        }

        let _ = writeln!(out, "\n\n\nmAP: {}", format_percent(self.map));
        out
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn format_values(values: &[f64]) -> String {
    let formatted: Vec<String> = values.iter().map(|v| format!("'{:.2}'", v)).collect();
    format!("[{}]", formatted.join(", "))
}
