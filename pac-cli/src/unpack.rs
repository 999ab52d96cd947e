use std::io::IsTerminal;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pac_core::ExtractEvent;
use pac_core::extract::validate_output_dir;

use crate::list::open_with_summary;

pub fn unpack(firmware: &Path, output: &Path, buffer_size: usize) -> anyhow::Result<()> {
    // checked before the firmware file is touched
    validate_output_dir(output)?;

    let pac = open_with_summary(firmware)?;

    // indicatif draws nothing when stdout is not a terminal, so plain
    // percentage lines are printed instead
    let interactive = std::io::stdout().is_terminal();
    let style = ProgressStyle::default_bar().template("\tProgress: {percent:>3}% {wide_bar} {bytes}/{total_bytes}")?;
    let mut bar: Option<ProgressBar> = None;
    let mut last_percent: Option<u8> = None;
    let result = pac
        .extractor(output)
        .buffer_size(buffer_size)
        .on_event(|event| match event {
            ExtractEvent::Skipped { partition_name, .. } => {
                println!("Skipping: {} (empty)", partition_name);
            }
            ExtractEvent::FileStart { path, size, .. } => {
                println!("Extracting: {}", path.display());
                last_percent = None;
                if interactive {
                    let file_bar = ProgressBar::with_draw_target(Some(size), ProgressDrawTarget::stdout());
                    file_bar.set_style(style.clone());
                    bar = Some(file_bar);
                }
            }
            ExtractEvent::Progress { copied, percent, .. } => {
                if let Some(bar) = &bar {
                    bar.set_position(copied);
                } else if last_percent != Some(percent) {
                    println!("\tProgress: {:>3}%", percent);
                    last_percent = Some(percent);
                }
            }
            ExtractEvent::FileDone { .. } => {
                if let Some(bar) = bar.take() {
                    bar.finish();
                }
            }
            ExtractEvent::Start { .. } | ExtractEvent::Finish { .. } => {}
        })
        .run();

    if let Some(bar) = bar.take() {
        bar.abandon();
    }
    let report = result.context("Extraction aborted")?;

    println!(
        "All partitions extracted successfully. ({} extracted, {} skipped, {} bytes)",
        report.extracted, report.skipped, report.bytes_written
    );

    Ok(())
}
