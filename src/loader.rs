//! Loading utilities for box record files.
//!
//! A JSON box file lists one entry per box:
//!
//! ```json
//! {
//!   "boxes": [
//!     {
//!       "image_id": "000001",
//!       "class_label": "dog",
//!       "bbox": [x, y, width, height],
//!       "confidence": 0.95  // For detections only
//!     }
//!   ]
//! }
//! ```
//!
//! CSV box files carry a header row followed by one box per row. Ground-truth
//! rows hold the image at column 1, the class at column 4 and the four box
//! values at columns 5-8 (columns 2 and 3 are ignored). Detection rows hold
//! the image, class, confidence and the four box values. Extra trailing
//! columns are ignored.
//!
//! ```text
//! image,source,difficult,class,x,y,w,h
//! 000001,voc,0,dog,48,240,147,131
//!
//! image,class,confidence,x,y,w,h
//! 000001,dog,0.92,50,236,140,135
//! ```
//!
//! The meaning of the box values is given by [`LoadOptions`]; every record
//! comes out in absolute XYXY form.

use crate::error::{Result, VocEvalError};
use crate::types::{BoundingBox, BoxFormat, BoxKind, BoxRecord, CoordinateType, ImageSize};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One box as it appears in a box file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBox {
    pub image_id: String,
    pub class_label: String,
    pub bbox: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Top-level structure of a box file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxFile {
    pub boxes: Vec<RawBox>,
}

/// Coordinate convention of a box file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    pub format: BoxFormat,
    pub coordinates: CoordinateType,
    /// Required when `coordinates` is relative.
    pub image_size: Option<ImageSize>,
}

impl LoadOptions {
    pub fn new(format: BoxFormat, coordinates: CoordinateType) -> Self {
        Self {
            format,
            coordinates,
            image_size: None,
        }
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some(ImageSize::new(width, height));
        self
    }

    fn validate(&self) -> Result<()> {
        if self.coordinates == CoordinateType::Relative && self.image_size.is_none() {
            return Err(VocEvalError::MissingImageSize(
                "image size is required when coordinates are relative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load box records of one kind from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a `bbox` does
/// not hold exactly four values. Records with negative extent are returned
/// as-is; the collection decides whether to skip them.
///
/// # Example
///
/// ```no_run
/// use voc_eval::loader::{load_from_file, LoadOptions};
/// use voc_eval::types::BoxKind;
///
/// let records = load_from_file("groundtruths.json", BoxKind::GroundTruth, &LoadOptions::default()).unwrap();
/// println!("Loaded {} boxes", records.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(
    path: P,
    kind: BoxKind,
    options: &LoadOptions,
) -> Result<Vec<BoxRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let box_file: BoxFile = serde_json::from_reader(reader)?;
    to_records(box_file, kind, options)
}

/// Load box records of one kind from a JSON string.
///
/// # Example
///
/// ```
/// use voc_eval::loader::{load_from_string, LoadOptions};
/// use voc_eval::types::{BoundingBox, BoxFormat, BoxKind, CoordinateType};
///
/// let json = r#"{
///     "boxes": [
///         {"image_id": "img1", "class_label": "dog", "bbox": [10, 20, 30, 40], "confidence": 0.8}
///     ]
/// }"#;
/// let options = LoadOptions::new(BoxFormat::Xywh, CoordinateType::Absolute);
/// let records = load_from_string(json, BoxKind::Detection, &options).unwrap();
/// assert_eq!(records[0].bbox, BoundingBox::new(10.0, 20.0, 40.0, 60.0));
/// assert_eq!(records[0].confidence, Some(0.8));
/// ```
pub fn load_from_string(json_str: &str, kind: BoxKind, options: &LoadOptions) -> Result<Vec<BoxRecord>> {
    let box_file: BoxFile = serde_json::from_str(json_str)?;
    to_records(box_file, kind, options)
}

/// Load box records of one kind from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if a row is too short or
/// holds a non-numeric box value or confidence.
pub fn load_from_csv<P: AsRef<Path>>(
    path: P,
    kind: BoxKind,
    options: &LoadOptions,
) -> Result<Vec<BoxRecord>> {
    let file = File::open(path)?;
    load_csv_from_reader(BufReader::new(file), kind, options)
}

/// Load box records of one kind from CSV data. The first row is a header and is skipped.
///
/// # Example
///
/// ```
/// use voc_eval::loader::{load_csv_from_reader, LoadOptions};
/// use voc_eval::types::{BoundingBox, BoxKind};
///
/// let data = "image,class,confidence,x,y,w,h\nimg1,dog,0.8,10,20,30,40\n";
/// let records = load_csv_from_reader(data.as_bytes(), BoxKind::Detection, &LoadOptions::default()).unwrap();
/// assert_eq!(records[0].bbox, BoundingBox::new(10.0, 20.0, 40.0, 60.0));
/// assert_eq!(records[0].confidence, Some(0.8));
/// ```
pub fn load_csv_from_reader<R: Read>(
    reader: R,
    kind: BoxKind,
    options: &LoadOptions,
) -> Result<Vec<BoxRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut boxes = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Line 1 is the header.
        boxes.push(raw_box_from_row(&record, row + 2, kind)?);
    }

    log::debug!("read {} {:?} rows from CSV", boxes.len(), kind);
    to_records(BoxFile { boxes }, kind, options)
}

fn raw_box_from_row(record: &csv::StringRecord, line: usize, kind: BoxKind) -> Result<RawBox> {
    let (class_col, confidence_col, bbox_start) = match kind {
        BoxKind::GroundTruth => (3, None, 4),
        BoxKind::Detection => (1, Some(2), 3),
    };
    let needed = bbox_start + 4;
    if record.len() < needed {
        return Err(VocEvalError::InvalidAnnotation(format!(
            "Line {}: expected at least {} columns for {:?}, found {}",
            line,
            needed,
            kind,
            record.len()
        )));
    }

    let number = |col: usize| -> Result<f64> {
        record[col].parse::<f64>().map_err(|_| {
            VocEvalError::InvalidAnnotation(format!(
                "Line {}: column {} is not a number: '{}'",
                line,
                col + 1,
                &record[col]
            ))
        })
    };

    let bbox = (bbox_start..needed).map(&number).collect::<Result<Vec<f64>>>()?;
    let confidence = confidence_col.map(&number).transpose()?;

    Ok(RawBox {
        image_id: record[0].to_string(),
        class_label: record[class_col].to_string(),
        bbox,
        confidence,
    })
}

/// Convert parsed boxes into normalized records.
pub fn to_records(box_file: BoxFile, kind: BoxKind, options: &LoadOptions) -> Result<Vec<BoxRecord>> {
    options.validate()?;

    box_file
        .boxes
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            let coords: [f64; 4] = raw.bbox.as_slice().try_into().map_err(|_| {
                VocEvalError::InvalidAnnotation(format!(
                    "Box {} (image '{}') has invalid bbox length: {}",
                    position,
                    raw.image_id,
                    raw.bbox.len()
                ))
            })?;
            let bbox =
                BoundingBox::from_coords(coords, options.format, options.coordinates, options.image_size)?;

            let confidence = match kind {
                BoxKind::GroundTruth => None,
                BoxKind::Detection => raw.confidence,
            };

            Ok(BoxRecord {
                image_id: raw.image_id,
                class_label: raw.class_label,
                bbox,
                kind,
                confidence,
            })
        })
        .collect()
}
