//! Evaluation configuration.
//!
//! Every option the evaluator recognizes lives in [`EvaluationConfig`], which is
//! passed explicitly to [`crate::evaluator::evaluate`].

use crate::error::{Result, VocEvalError};
use crate::metrics::ap::InterpolationMethod;
use serde::{Deserialize, Serialize};

/// Default IoU threshold of the PASCAL VOC protocol.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Which per-class fields the report emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFields {
    pub ap: bool,
    pub precision: bool,
    pub recall: bool,
    /// Ground-truth positives, TP and FP counts.
    pub totals: bool,
    /// Interpolated precision envelope used for the AP.
    pub interpolated: bool,
}

impl Default for OutputFields {
    fn default() -> Self {
        Self {
            ap: true,
            precision: true,
            recall: true,
            totals: true,
            interpolated: false,
        }
    }
}

impl OutputFields {
    /// Every field enabled.
    pub fn all() -> Self {
        Self {
            ap: true,
            precision: true,
            recall: true,
            totals: true,
            interpolated: true,
        }
    }
}

/// Options for one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum IoU for a detection to claim a ground-truth box.
    pub iou_threshold: f64,
    /// Rule used to integrate the precision-recall curve.
    pub method: InterpolationMethod,
    pub output: OutputFields,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            method: InterpolationMethod::EveryPoint,
            output: OutputFields::default(),
        }
    }
}

impl EvaluationConfig {
    /// Create a configuration, rejecting thresholds outside [0, 1].
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::config::EvaluationConfig;
    /// use voc_eval::metrics::ap::InterpolationMethod;
    ///
    /// let config = EvaluationConfig::new(0.75, InterpolationMethod::ElevenPoint).unwrap();
    /// assert_eq!(config.iou_threshold, 0.75);
    /// assert!(EvaluationConfig::new(1.2, InterpolationMethod::EveryPoint).is_err());
    /// ```
    pub fn new(iou_threshold: f64, method: InterpolationMethod) -> Result<Self> {
        let config = Self {
            iou_threshold,
            method,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the output field selection.
    pub fn with_output(mut self, output: OutputFields) -> Self {
        self.output = output;
        self
    }

    /// Parse a configuration from JSON; missing keys take their defaults.
    ///
    /// ```
    /// use voc_eval::config::EvaluationConfig;
    /// use voc_eval::metrics::ap::InterpolationMethod;
    ///
    /// let config = EvaluationConfig::from_json_str(r#"{"method": "eleven_point"}"#).unwrap();
    /// assert_eq!(config.method, InterpolationMethod::ElevenPoint);
    /// assert_eq!(config.iou_threshold, 0.5);
    /// ```
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the IoU threshold.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&threshold) {
        return Err(VocEvalError::ThresholdOutOfRange(threshold));
    }
    Ok(())
}
