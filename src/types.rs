//! Core data types for box records and coordinate conventions.

use crate::error::{Result, VocEvalError};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in absolute XYXY form.
///
/// Coordinates are:
/// - x1: Left coordinate
/// - y1: Top coordinate
/// - x2: Right coordinate
/// - y2: Bottom coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a bounding box from top-left corner plus width and height.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Normalize raw coordinates given in any supported convention.
    ///
    /// Relative coordinates are fractions of the image size and are scaled
    /// before the format conversion, so `image_size` is required for them.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::types::{BoundingBox, BoxFormat, CoordinateType, ImageSize};
    ///
    /// let size = ImageSize::new(200, 100);
    /// let bbox = BoundingBox::from_coords(
    ///     [0.1, 0.2, 0.5, 0.5],
    ///     BoxFormat::Xywh,
    ///     CoordinateType::Relative,
    ///     Some(size),
    /// ).unwrap();
    /// assert_eq!(bbox, BoundingBox::new(20.0, 20.0, 120.0, 70.0));
    /// ```
    pub fn from_coords(
        coords: [f64; 4],
        format: BoxFormat,
        coordinates: CoordinateType,
        image_size: Option<ImageSize>,
    ) -> Result<Self> {
        let [a, b, c, d] = match coordinates {
            CoordinateType::Absolute => coords,
            CoordinateType::Relative => {
                let size = image_size.ok_or_else(|| {
                    VocEvalError::MissingImageSize(
                        "relative coordinates require the image width and height".to_string(),
                    )
                })?;
                let (w, h) = (size.width as f64, size.height as f64);
                [coords[0] * w, coords[1] * h, coords[2] * w, coords[3] * h]
            }
        };

        Ok(match format {
            BoxFormat::Xywh => Self::from_xywh(a, b, c, d),
            BoxFormat::Xyxy => Self::new(a, b, c, d),
        })
    }

    /// Width of the box (may be negative for malformed input).
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Height of the box (may be negative for malformed input).
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check that the box has finite coordinates and non-negative extent.
    ///
    /// Zero-area boxes are valid.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite())
            && self.width() >= 0.0
            && self.height() >= 0.0
    }
}

/// Layout of the four raw coordinates of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// left, top, width, height
    #[default]
    Xywh,
    /// left, top, right, bottom
    Xyxy,
}

/// Whether raw coordinates are pixels or fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateType {
    #[default]
    Absolute,
    Relative,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Which side of the evaluation a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxKind {
    GroundTruth,
    Detection,
}

/// One ground-truth or detected box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub image_id: String,
    pub class_label: String,
    pub bbox: BoundingBox,
    pub kind: BoxKind,
    /// Present for detections only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl BoxRecord {
    /// Create a ground-truth record.
    pub fn ground_truth(
        image_id: impl Into<String>,
        class_label: impl Into<String>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            image_id: image_id.into(),
            class_label: class_label.into(),
            bbox,
            kind: BoxKind::GroundTruth,
            confidence: None,
        }
    }

    /// Create a detection record with its confidence score.
    pub fn detection(
        image_id: impl Into<String>,
        class_label: impl Into<String>,
        bbox: BoundingBox,
        confidence: f64,
    ) -> Self {
        Self {
            image_id: image_id.into(),
            class_label: class_label.into(),
            bbox,
            kind: BoxKind::Detection,
            confidence: Some(confidence),
        }
    }

    /// Confidence score, 0.0 for ground truth.
    pub fn score(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// Check the record's geometry and confidence.
    ///
    /// Ground truth must not carry a confidence; detections must carry one in [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !self.bbox.is_valid() {
            return Err(VocEvalError::InvalidGeometry {
                image_id: self.image_id.clone(),
                class_label: self.class_label.clone(),
                reason: format!(
                    "width {} and height {} must be finite and non-negative",
                    self.bbox.width(),
                    self.bbox.height()
                ),
            });
        }

        let confidence_ok = match (self.kind, self.confidence) {
            (BoxKind::GroundTruth, None) => true,
            (BoxKind::Detection, Some(c)) => (0.0..=1.0).contains(&c),
            _ => false,
        };
        if !confidence_ok {
            return Err(VocEvalError::InvalidConfidence {
                image_id: self.image_id.clone(),
                class_label: self.class_label.clone(),
                confidence: self.confidence,
            });
        }

        Ok(())
    }
}

/// Precision-Recall curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallPoint {
    pub recall: f64,
    pub precision: f64,
    /// Confidence of the detection at this rank.
    pub confidence: f64,
}
