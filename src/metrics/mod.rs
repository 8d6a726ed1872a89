//! Metrics calculation modules for PASCAL VOC evaluation.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use ap::{calculate_map, InterpolatedCurve, InterpolationMethod};
pub use precision_recall::{
    build_curve, calculate_precision, calculate_precision_recall_curve, calculate_recall,
    PrecisionRecallCurve,
};
