use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

use crate::config::Args;
use crate::conversion::{convert_records, format_polygons};
use crate::error::{BatchError, TaskError};
use crate::io::{
    copy_image, discover_label_files, ensure_output_directory, load_image, write_label_file,
    write_manifest,
};
use crate::types::{ConversionTask, ProcessingStats, TaskSummary};
use crate::utils::{create_io_thread_pool, create_progress_bar};
use crate::visualize::render_overlay;

/// Outcome of one task, sent from a worker to the reporter
#[derive(Debug)]
pub struct TaskReport {
    pub input_path: PathBuf,
    pub outcome: Result<TaskSummary, TaskError>,
}

/// Result of a whole run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub stats: ProcessingStats,
    pub manifest_path: PathBuf,
    pub manifest_entries: Vec<String>,
}

/// Convert one label file and copy its image.
///
/// Steps run in a fixed order: decode the image, create the output directories,
/// copy the image, convert every record, then write the label and ground-truth
/// files. Conversion finishes before anything is written, so a malformed record
/// leaves no label output behind (the image copy already happened).
pub fn convert_file(task: &ConversionTask, args: &Args) -> Result<TaskSummary, TaskError> {
    let stem = task.output_stem()?;
    let img = load_image(&task.image_path)?;
    let (width, height) = (img.width(), img.height());

    ensure_output_directory(&task.output_label_dir)?;
    ensure_output_directory(&task.output_image_dir)?;
    copy_image(
        &task.image_path,
        &task.output_image_path(&stem, &args.image_ext),
    )?;

    let content = fs::read_to_string(&task.input_path)
        .map_err(|e| TaskError::io(&task.input_path, e))?;
    let (polygons, records_excluded) =
        convert_records(&content, &task.input_path, width, height, |class_id| {
            args.is_excluded(class_id)
        })?;

    let prediction = format_polygons(&polygons);
    write_label_file(&task.output_label_path(&stem, &args.image_ext), &prediction)?;

    // Identical to the prediction file for now
    let ground_truth = format_polygons(&polygons);
    write_label_file(
        &task.output_ground_truth_path(&stem, &args.image_ext),
        &ground_truth,
    )?;

    if let Some(visualize_dir) = &args.visualize_dir {
        ensure_output_directory(visualize_dir)?;
        let overlay_path = visualize_dir.join(format!("{}.{}", stem, args.image_ext));
        render_overlay(&img, &polygons, &overlay_path)?;
    }

    Ok(TaskSummary {
        records_written: polygons.len(),
        records_excluded,
    })
}

/// Drain task reports until every worker has hung up.
///
/// This is the only place failures are logged and counted.
pub fn collect_reports(reports: Receiver<TaskReport>, pb: &ProgressBar) -> ProcessingStats {
    let mut stats = ProcessingStats::new();
    for report in reports {
        match &report.outcome {
            Ok(summary) => stats.record_success(summary),
            Err(e) => {
                error!("Failed to convert {}: {}", report.input_path.display(), e);
                stats.record_failure(e);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("conversion complete");
    stats
}

/// Run every task on the worker pool and aggregate their outcomes.
///
/// A failing task never stops its siblings; the returned statistics account
/// for every task exactly once.
pub fn process_files(
    tasks: &[ConversionTask],
    args: &Args,
) -> Result<ProcessingStats, BatchError> {
    let pool = create_io_thread_pool(args.workers)?;
    info!(
        "Converting {} label files on {} workers...",
        tasks.len(),
        pool.current_num_threads()
    );

    let pb = create_progress_bar(tasks.len() as u64, "Convert");
    let (sender, receiver) = channel::<TaskReport>();

    let stats = std::thread::scope(|scope| {
        let reporter = scope.spawn(|| collect_reports(receiver, &pb));

        pool.install(|| {
            tasks.par_iter().for_each_with(sender, |sender, task| {
                let outcome = convert_file(task, args);
                // The reporter only stops once every sender is dropped
                let _ = sender.send(TaskReport {
                    input_path: task.input_path.clone(),
                    outcome,
                });
            });
        });

        reporter
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });

    Ok(stats)
}

/// Discover inputs, convert them, then write the manifest.
pub fn run(args: &Args) -> Result<BatchReport, BatchError> {
    let input_files = discover_label_files(&args.input_glob)?;
    if input_files.is_empty() {
        warn!("No label files match {:?}", args.input_glob);
    } else {
        info!("Found {} label files.", input_files.len());
    }

    let tasks: Vec<ConversionTask> = input_files
        .into_iter()
        .map(|path| ConversionTask::new(path, args))
        .collect();

    let stats = process_files(&tasks, args)?;
    stats.print_summary();

    let manifest_path = args.manifest_path();
    info!("Writing manifest {}...", manifest_path.display());
    let manifest_entries =
        write_manifest(&args.output_image_dir, &args.image_ext, &manifest_path)?;
    info!("Manifest lists {} images.", manifest_entries.len());

    Ok(BatchReport {
        stats,
        manifest_path,
        manifest_entries,
    })
}
