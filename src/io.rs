use glob::glob;
use image::{DynamicImage, ImageError, ImageReader};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{BatchError, TaskError};

/// Collect every label file matching the input glob pattern
pub fn discover_label_files(pattern: &str) -> Result<Vec<PathBuf>, BatchError> {
    let entries = glob(pattern).map_err(|source| BatchError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Create an output directory if it is missing, leaving existing contents alone
pub fn ensure_output_directory(path: &Path) -> Result<(), TaskError> {
    fs::create_dir_all(path).map_err(|e| TaskError::io(path, e))
}

/// Decode the paired image, sniffing the format from its contents.
///
/// A missing, truncated or otherwise undecodable file is `ImageNotFound`.
pub fn load_image(path: &Path) -> Result<DynamicImage, TaskError> {
    let not_found = |source: ImageError| TaskError::ImageNotFound {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| not_found(ImageError::IoError(e)))?
        .decode()
        .map_err(not_found)
}

/// Copy the source image verbatim to its output location
pub fn copy_image(source: &Path, destination: &Path) -> Result<(), TaskError> {
    fs::copy(source, destination)
        .map(|_| ())
        .map_err(|e| TaskError::io(destination, e))
}

/// Write a converted label file, replacing any previous run's output
pub fn write_label_file(path: &Path, content: &str) -> Result<(), TaskError> {
    let file = File::create(path).map_err(|e| TaskError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| TaskError::io(path, e))
}

/// Re-scan the output image directory and list every image it holds.
///
/// Returns the file names written, in the order the glob yields them.
pub fn write_manifest(
    image_dir: &Path,
    image_ext: &str,
    manifest_path: &Path,
) -> Result<Vec<String>, BatchError> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&image_dir.to_string_lossy()),
        image_ext
    );
    let entries = glob(&pattern).map_err(|source| BatchError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?;
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(format!("{}.{}", stem, image_ext));
        }
    }

    let manifest_error = |source: std::io::Error| BatchError::Manifest {
        path: manifest_path.to_path_buf(),
        source,
    };
    if let Some(parent) = manifest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(manifest_error)?;
    }
    let mut writer = BufWriter::new(File::create(manifest_path).map_err(manifest_error)?);
    for name in &names {
        writeln!(writer, "{}", name).map_err(manifest_error)?;
    }
    writer.flush().map_err(manifest_error)?;

    Ok(names)
}
