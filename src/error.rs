use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scaling a single record's coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("record has {len} coordinate values but an even count is required")]
    InvalidRecordLength { len: usize },
    #[error("image dimensions {width}x{height} must both be positive")]
    InvalidImageDimensions { width: u32, height: u32 },
    #[error("coordinate pair ({x}, {y}) does not scale to a finite pixel position")]
    MalformedCoordinate { x: f64, y: f64 },
}

/// Errors that fail one conversion task without affecting the rest of the batch.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("image file not found or unable to read: {path}: {source}")]
    ImageNotFound {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid class id {token:?} at {path}:{line}")]
    InvalidClassId {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("invalid coordinate {token:?} at {path}:{line}")]
    InvalidCoordinate {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("malformed record at {path}:{line}: {source}")]
    Conversion {
        path: PathBuf,
        line: usize,
        #[source]
        source: ConvertError,
    },
    #[error("label file name is not valid UTF-8 or has no stem: {path}")]
    InvalidFileName { path: PathBuf },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render overlay {path}: {source}")]
    Visualize {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl TaskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the contents of the label file itself
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            TaskError::InvalidClassId { .. }
                | TaskError::InvalidCoordinate { .. }
                | TaskError::Conversion { .. }
        )
    }
}

/// Fatal errors that stop the run before dispatch or while finalising it.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid input glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to list input files: {0}")]
    Listing(#[from] glob::GlobError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to write manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
