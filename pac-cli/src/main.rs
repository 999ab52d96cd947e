mod list;
mod unpack;

use std::path::PathBuf;

use clap::Parser;
use pac_core::extract::DEFAULT_BUFFER_SIZE;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Extracts partitions from a Spreadtrum/Unisoc PAC firmware file.
#[derive(Debug, Parser)]
#[command(name = "pacextractor", version, about, long_about = None)]
struct Cli {
    /// Input PAC firmware file
    firmware: PathBuf,
    /// Output directory, must already exist
    #[arg(default_value = ".")]
    output: PathBuf,
    /// Print the partition table without extracting anything
    #[arg(short, long)]
    list: bool,
    /// Print the partition table as JSON (with --list)
    #[arg(long, requires = "list")]
    json: bool,
    /// Copy buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,
    /// Log filter for diagnostics on stderr, e.g. "debug" or "pac_core=trace"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if cli.list {
        list::list(&cli.firmware, cli.json)
    } else {
        unpack::unpack(&cli.firmware, &cli.output, cli.buffer_size)
    }
}
