use std::path::Path;

use anyhow::Context;
use pac_core::pac::{PacHeader, PartitionDescriptor};
use pac_core::{PacFile, ParseEvent};
use serde::Serialize;

#[derive(Serialize)]
struct Listing<'a> {
    path: &'a Path,
    header: &'a PacHeader,
    partitions: &'a [PartitionDescriptor],
}

pub fn list(firmware: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        let pac = PacFile::open(firmware).context("Failed to read the firmware file")?;
        let listing = Listing {
            path: firmware,
            header: pac.header(),
            partitions: pac.partitions(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        open_with_summary(firmware)?;
    }

    Ok(())
}

/// Opens `firmware`, printing the header and each partition as they are
/// parsed. Lines for everything read before a parse failure stay printed.
pub fn open_with_summary(firmware: &Path) -> anyhow::Result<PacFile> {
    PacFile::builder()
        .on_parse(print_parse_event)
        .open(firmware)
        .context("Failed to read the firmware file")
}

fn print_parse_event(event: ParseEvent<'_>) {
    match event {
        ParseEvent::Header(header) => {
            println!("Firmware Name: {}", header.firmware_name());
            println!("Product Name: {}", header.product_name());
        }
        ParseEvent::Partition { partition, .. } => {
            println!(
                "Partition: {}\n\tFile Name: {}\n\tSize: {} bytes",
                partition.partition_name(),
                partition.file_name(),
                partition.size()
            );
        }
    }
}
