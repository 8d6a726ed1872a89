//! Error types for the voc-eval library.

use thiserror::Error;

/// Result type for voc-eval operations.
pub type Result<T> = std::result::Result<T, VocEvalError>;

/// Error types that can occur during PASCAL VOC evaluation.
#[derive(Error, Debug)]
pub enum VocEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while reading a CSV box file.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed box record in an input file.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// A box has negative (or non-finite) extent after normalization.
    #[error("Invalid geometry for image '{image_id}', class '{class_label}': {reason}")]
    InvalidGeometry {
        image_id: String,
        class_label: String,
        reason: String,
    },

    /// A detection confidence outside [0, 1], or missing.
    #[error("Invalid confidence {confidence:?} for image '{image_id}', class '{class_label}'")]
    InvalidConfidence {
        image_id: String,
        class_label: String,
        confidence: Option<f64>,
    },

    /// Relative coordinates were supplied without image dimensions.
    #[error("Missing image size: {0}")]
    MissingImageSize(String),

    /// IoU threshold not in [0, 1].
    #[error("IoU threshold out of range [0, 1]: {0}")]
    ThresholdOutOfRange(f64),

    /// No class has a ground-truth positive, so mAP is undefined.
    #[error("No qualifying classes: none of the {classes} classes has ground-truth boxes")]
    NoQualifyingClasses { classes: usize },
}
