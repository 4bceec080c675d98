use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use yoloseg2abs::{run, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting the conversion process...");

    match run(&args) {
        Ok(report) => {
            info!(
                "Conversion finished: {} of {} files converted, manifest at {}",
                report.stats.successful_conversions,
                report.stats.total_files_processed,
                report.manifest_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
