//! # voc-eval
//!
//! A Rust library for PASCAL VOC object detection evaluation.
//!
//! This library provides the standard VOC metrics:
//! - **AP** (Average Precision) per class, with 11-point or every-point interpolation
//! - **mAP** (mean Average Precision) over classes that have ground truth
//! - **Precision** and **Recall** curves per class, in detection rank order
//!
//! ## Features
//!
//! - Load box records from JSON or CSV in `xywh` or `xyxy`, absolute or relative coordinates
//! - Calculate IoU (Intersection over Union) between bounding boxes
//! - Greedy, deterministic matching of detections to ground truth per image and class
//! - Skip-and-count handling of invalid boxes
//! - Export results as JSON or a plain-text summary
//!
//! ## Quick Start
//!
//! ```rust
//! use voc_eval::{evaluate, BoundingBox, BoxCollection, BoxRecord, EvaluationConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let collection = BoxCollection::from_records(vec![
//!     BoxRecord::ground_truth("img1", "dog", BoundingBox::new(10.0, 10.0, 50.0, 50.0)),
//!     BoxRecord::detection("img1", "dog", BoundingBox::new(12.0, 12.0, 48.0, 48.0), 0.9),
//! ]);
//!
//! let report = evaluate(&collection, &EvaluationConfig::default())?;
//! println!("mAP: {:.4}", report.map);
//! for class in &report.classes {
//!     println!("{}: AP {:.4}", class.class_label, class.ap);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod types;
pub mod stats;
pub mod collection;
pub mod config;
pub mod loader;
pub mod metrics;
pub mod matching;
pub mod evaluator;
pub mod report;

// Re-export commonly used types and functions
pub use error::{Result, VocEvalError};
pub use types::{
    BoundingBox, BoxFormat, BoxKind, BoxRecord, CoordinateType, ImageSize, PrecisionRecallPoint,
};
pub use collection::{BoxCollection, InvalidBoxPolicy};
pub use config::{EvaluationConfig, OutputFields};
pub use evaluator::{evaluate, evaluate_class, evaluate_records};
pub use loader::{
    load_csv_from_reader, load_from_csv, load_from_file, load_from_string, LoadOptions,
};
pub use metrics::ap::InterpolationMethod;
pub use report::{ClassResult, ClassSummary, EvaluationReport};
pub use stats::CollectionStats;
