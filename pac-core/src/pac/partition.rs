use serde::Serialize;

use crate::error::Result;
use crate::spec;

use super::{decode_bytes, decode_text};

/// Smallest valid `record_length`: the fixed prefix of a descriptor.
pub const MIN_DESCRIPTOR_SIZE: usize = spec::PartitionRecord::SIZE;

/// One entry of the descriptor chain.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionDescriptor {
    record_length: u32,
    partition_name: String,
    file_name: String,
    #[serde(skip)]
    file_name_bytes: Vec<u8>,
    size: u32,
    offset: u32,
}

impl PartitionDescriptor {
    /// Byte length of the whole record, tail included.
    pub fn record_length(&self) -> u32 {
        self.record_length
    }

    pub fn partition_name(&self) -> &str {
        &self.partition_name
    }

    /// Display form of the file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name exactly as stored, one byte per unit.
    pub fn file_name_bytes(&self) -> &[u8] {
        &self.file_name_bytes
    }

    /// Payload length. Zero means there is nothing to extract.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Absolute payload offset within the container.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl From<spec::PartitionRecord> for PartitionDescriptor {
    fn from(value: spec::PartitionRecord) -> Self {
        Self {
            record_length: value.length,
            partition_name: decode_text(&value.partition_name),
            file_name: decode_text(&value.file_name),
            file_name_bytes: decode_bytes(&value.file_name),
            size: value.partition_size,
            offset: value.partition_offset,
        }
    }
}

/// Decodes a descriptor whose leading length field has already been read as
/// `record_length`. `bytes` starts at that length field and needs to cover
/// only the fixed prefix; the variable tail is never looked at.
pub fn decode_descriptor(bytes: &[u8], record_length: u32) -> Result<PartitionDescriptor> {
    let raw = spec::PartitionRecord::from_bytes(bytes, record_length)?;
    Ok(PartitionDescriptor::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PacError;

    fn descriptor_bytes(name: &str, file_name: &str, size: u32, offset: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; MIN_DESCRIPTOR_SIZE];
        bytes[0..4].copy_from_slice(&(MIN_DESCRIPTOR_SIZE as u32).to_le_bytes());
        for (i, b) in name.bytes().enumerate() {
            bytes[4 + i * 2] = b;
        }
        for (i, b) in file_name.bytes().enumerate() {
            bytes[516 + i * 2] = b;
        }
        bytes[1540..1544].copy_from_slice(&size.to_le_bytes());
        bytes[1552..1556].copy_from_slice(&offset.to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_descriptor() {
        let bytes = descriptor_bytes("boot", "boot.img", 0x2000, 0x8000);
        let descriptor = decode_descriptor(&bytes, 1600).unwrap();
        assert_eq!(descriptor.record_length(), 1600);
        assert_eq!(descriptor.partition_name(), "boot");
        assert_eq!(descriptor.file_name(), "boot.img");
        assert_eq!(descriptor.file_name_bytes(), b"boot.img");
        assert_eq!(descriptor.size(), 0x2000);
        assert_eq!(descriptor.offset(), 0x8000);
        assert!(!descriptor.is_empty());
    }

    #[test]
    fn test_empty_partition() {
        let bytes = descriptor_bytes("FDL", "", 0, 0);
        let descriptor = decode_descriptor(&bytes, MIN_DESCRIPTOR_SIZE as u32).unwrap();
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.file_name(), "");
    }

    #[test]
    fn test_record_length_below_minimum() {
        let bytes = descriptor_bytes("boot", "boot.img", 1, 1);
        for len in [0, 4, MIN_DESCRIPTOR_SIZE as u32 - 1] {
            let result = decode_descriptor(&bytes, len);
            assert!(matches!(result, Err(PacError::MalformedDescriptor(_))));
        }
    }
}
