use serde::Serialize;

use crate::error::{PacError, Result};
use crate::spec;

use super::decode_text;

/// Upper bound on `partition_count`; real firmware carries a few dozen.
pub const MAX_PARTITION_COUNT: u32 = 1024;

/// Size of the fixed header at the start of every PAC file.
pub const HEADER_SIZE: usize = spec::Header::SIZE;

#[derive(Debug, Clone, Serialize)]
pub struct PacHeader {
    product_name: String,
    firmware_name: String,
    partition_count: u32,
    partition_list_offset: u64,
}

impl PacHeader {
    #[inline]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    #[inline]
    pub fn firmware_name(&self) -> &str {
        &self.firmware_name
    }

    #[inline]
    pub fn partition_count(&self) -> u32 {
        self.partition_count
    }

    #[inline]
    pub fn partition_list_offset(&self) -> u64 {
        self.partition_list_offset
    }
}

impl TryFrom<spec::Header> for PacHeader {
    type Error = PacError;

    fn try_from(this: spec::Header) -> Result<Self> {
        let partition_count = u32::try_from(this.partition_count)
            .ok()
            .filter(|&count| count <= MAX_PARTITION_COUNT)
            .ok_or_else(|| {
                PacError::MalformedHeader(format!(
                    "partition count {} outside 0..={}",
                    this.partition_count, MAX_PARTITION_COUNT
                ))
            })?;
        let partition_list_offset = u64::try_from(this.partition_list_offset).map_err(|_| {
            PacError::MalformedHeader(format!(
                "negative partition list offset {}",
                this.partition_list_offset
            ))
        })?;

        Ok(PacHeader {
            product_name: decode_text(&this.product_name),
            firmware_name: decode_text(&this.firmware_name),
            partition_count,
            partition_list_offset,
        })
    }
}

/// Decodes the fixed header from a buffer of at least [`HEADER_SIZE`] bytes.
pub fn decode_header(bytes: &[u8]) -> Result<PacHeader> {
    let raw = spec::Header::from_bytes(bytes)?;
    PacHeader::try_from(raw)
}
