use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::error::TaskError;

/// Suffix of the ground-truth copy written next to each converted label file
pub const GROUND_TRUTH_EXTENSION: &str = "gt";

/// Suffix of the prediction-format label file
pub const LABEL_EXTENSION: &str = "txt";

// One line of a YOLO segmentation label file
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub class_id: u32,
    pub coordinates: Vec<f64>,
}

// A polygon in pixel space, flattened as x1,y1,x2,y2,...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsolutePolygon {
    pub class_id: u32,
    pub points: Vec<i64>,
}

impl AbsolutePolygon {
    /// Vertices as (x, y) pairs
    pub fn vertices(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

/// One label file and its paired image, plus where their outputs go.
#[derive(Debug, Clone)]
pub struct ConversionTask {
    pub input_path: PathBuf,
    pub image_path: PathBuf,
    pub output_label_dir: PathBuf,
    pub output_image_dir: PathBuf,
}

impl ConversionTask {
    pub fn new(input_path: PathBuf, args: &Args) -> Self {
        let image_path = input_path.with_extension(&args.image_ext);
        Self {
            input_path,
            image_path,
            output_label_dir: args.output_label_dir.clone(),
            output_image_dir: args.output_image_dir.clone(),
        }
    }

    /// File stem shared by every output of this task, kept verbatim
    pub fn output_stem(&self) -> Result<String, TaskError> {
        self.input_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(|| TaskError::InvalidFileName {
                path: self.input_path.clone(),
            })
    }

    pub fn output_image_path(&self, stem: &str, image_ext: &str) -> PathBuf {
        self.output_image_dir.join(format!("{}.{}", stem, image_ext))
    }

    pub fn output_label_path(&self, stem: &str, image_ext: &str) -> PathBuf {
        labelled_path(&self.output_label_dir, stem, image_ext, LABEL_EXTENSION)
    }

    pub fn output_ground_truth_path(&self, stem: &str, image_ext: &str) -> PathBuf {
        labelled_path(
            &self.output_label_dir,
            stem,
            image_ext,
            GROUND_TRUTH_EXTENSION,
        )
    }
}

fn labelled_path(dir: &Path, stem: &str, image_ext: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}.{}.{}", stem, image_ext, suffix))
}

/// What a successful task produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub records_written: usize,
    pub records_excluded: usize,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files_processed: usize,
    pub successful_conversions: usize,
    pub failed_missing_image: usize,
    pub failed_malformed_record: usize,
    pub failed_other: usize,
    pub records_written: usize,
    pub records_excluded: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, summary: &TaskSummary) {
        self.total_files_processed += 1;
        self.successful_conversions += 1;
        self.records_written += summary.records_written;
        self.records_excluded += summary.records_excluded;
    }

    pub fn record_failure(&mut self, error: &TaskError) {
        self.total_files_processed += 1;
        if matches!(error, TaskError::ImageNotFound { .. }) {
            self.failed_missing_image += 1;
        } else if error.is_malformed_record() {
            self.failed_malformed_record += 1;
        } else {
            self.failed_other += 1;
        }
    }

    pub fn failed_conversions(&self) -> usize {
        self.failed_missing_image + self.failed_malformed_record + self.failed_other
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total files processed: {}", self.total_files_processed);
        log::info!("Successful conversions: {}", self.successful_conversions);
        log::info!("Records written: {}", self.records_written);
        log::info!("Records excluded by class: {}", self.records_excluded);

        let failed = self.failed_conversions();
        if failed > 0 {
            log::warn!(
                "Failed conversions: {} (missing image: {}, malformed record: {}, other: {})",
                failed,
                self.failed_missing_image,
                self.failed_malformed_record,
                self.failed_other
            );
        } else {
            log::info!("Failed conversions: 0");
        }
    }
}
