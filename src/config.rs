use clap::Parser;
use std::path::{Path, PathBuf};

/// Default manifest file name, written next to the output image directory
pub const MANIFEST_FILE_NAME: &str = "test_list.txt";

/// Command-line arguments for converting YOLO segmentation labels to absolute coordinates.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Glob pattern matching the source YOLO label files
    #[arg(short = 'i', long = "input_glob")]
    pub input_glob: String,

    /// Directory receiving the converted `.txt` and `.gt` label files
    #[arg(short = 'l', long = "output_label_dir")]
    pub output_label_dir: PathBuf,

    /// Directory receiving copies of the paired images
    #[arg(short = 'o', long = "output_image_dir")]
    pub output_image_dir: PathBuf,

    /// Manifest path (defaults to test_list.txt beside the output image directory)
    #[arg(long = "manifest")]
    pub manifest: Option<PathBuf>,

    /// Extension of the images paired with each label file
    #[arg(long = "image_ext", default_value = "png", value_parser = validate_extension)]
    pub image_ext: String,

    /// Class ids whose records are dropped; pass the flag without values to keep every class
    #[arg(
        long = "exclude_classes",
        value_delimiter = ',',
        num_args = 0..,
        default_value = "1"
    )]
    pub exclude_classes: Vec<u32>,

    /// Number of worker threads, 0 uses the available parallelism
    #[arg(long = "workers", default_value_t = 0)]
    pub workers: usize,

    /// Optional directory for images with the converted polygons drawn on top
    #[arg(long = "visualize_dir")]
    pub visualize_dir: Option<PathBuf>,
}

impl Args {
    /// Manifest location, falling back to the sibling of the output image directory
    pub fn manifest_path(&self) -> PathBuf {
        match &self.manifest {
            Some(path) => path.clone(),
            None => self
                .output_image_dir
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(MANIFEST_FILE_NAME),
        }
    }

    pub fn is_excluded(&self, class_id: u32) -> bool {
        self.exclude_classes.contains(&class_id)
    }
}

// Accept "png" or ".png", reject anything that would escape the file name
pub fn validate_extension(s: &str) -> Result<String, String> {
    let ext = s.trim().trim_start_matches('.');
    if ext.is_empty() || ext.contains(&['/', '\\'][..]) || ext.contains(char::is_whitespace) {
        Err("IMAGE_EXT must be a bare file extension such as 'png'".to_string())
    } else {
        Ok(ext.to_string())
    }
}
