/*!
 * Command-line interface for DirPack
 */

use std::io;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use dirpack::config::{Args, Config};
use dirpack::packer::Packer;
use dirpack::report::{PackReport, ReportFormat, Reporter};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Generate shell completions and exit if requested
    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    // Create a spinner; the walk is sequential, so there is no total to show
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white}")
            .unwrap(),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📦 Packing");

    // Pack the directory
    let start_time = Instant::now();
    let mut packer = Packer::new(config, Arc::new(progress.clone()))?;
    let stats = packer.pack()?;
    let duration = start_time.elapsed();

    // Clear the progress bar
    progress.finish_and_clear();

    // Prepare and print the pack report
    let report = PackReport {
        output_file: packer.output_file().display().to_string(),
        duration,
        total_files: stats.total_files,
        total_size: stats.total_size,
        total_tokens: stats.total_tokens,
        file_details: stats.file_details,
    };

    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&report);

    Ok(())
}
