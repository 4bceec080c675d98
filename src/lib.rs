//! YOLO segmentation to absolute coordinate converter
//!
//! This library converts YOLO segmentation label files, whose polygon vertices are
//! normalized to the image size, into absolute pixel polygons. It copies each paired
//! image into an output tree and writes a manifest of the processed images.

pub mod batch;
pub mod config;
pub mod conversion;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;
pub mod visualize;

// Re-export commonly used types and functions
pub use batch::{convert_file, process_files, run, BatchReport};
pub use config::Args;
pub use conversion::{format_polygon, parse_record, yolo_segmentation_to_absolute};
pub use error::{BatchError, ConvertError, TaskError};
pub use types::{AbsolutePolygon, AnnotationRecord, ConversionTask, ProcessingStats, TaskSummary};
