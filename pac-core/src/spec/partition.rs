use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{PacError, Result};

/// Fixed prefix of a partition descriptor. The record continues for
/// `length - SIZE` more bytes whose content is not interpreted.
#[derive(Debug, Clone)]
pub struct PartitionRecord {
    pub length: u32,
    pub partition_name: [u16; 256],
    pub file_name: [u16; 512],
    pub partition_size: u32,
    pub reserved1: [i32; 2],
    pub partition_offset: u32,
    pub reserved2: [i32; 3],
}

impl PartitionRecord {
    pub const SIZE: usize = 4 + 256 * 2 + 512 * 2 + 4 + 2 * 4 + 4 + 3 * 4;

    /// `bytes` starts at the length field and must cover the fixed prefix.
    /// `record_length` is the length already read for this record.
    pub fn from_bytes(bytes: &[u8], record_length: u32) -> Result<Self> {
        if (record_length as usize) < Self::SIZE {
            return Err(PacError::MalformedDescriptor(format!(
                "record length {} is below the minimum of {}",
                record_length,
                Self::SIZE
            )));
        }
        if bytes.len() < Self::SIZE {
            return Err(PacError::MalformedDescriptor(format!(
                "expected {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        let mut this = Self::from_reader(&mut Cursor::new(&bytes[..Self::SIZE]))?;
        this.length = record_length;
        Ok(this)
    }

    fn from_reader<R>(reader: &mut R) -> std::io::Result<Self>
    where
        R: Read,
    {
        let mut this = Self {
            length: reader.read_u32::<LittleEndian>()?,
            partition_name: [0; 256],
            file_name: [0; 512],
            partition_size: 0,
            reserved1: [0; 2],
            partition_offset: 0,
            reserved2: [0; 3],
        };
        reader.read_u16_into::<LittleEndian>(&mut this.partition_name)?;
        reader.read_u16_into::<LittleEndian>(&mut this.file_name)?;
        this.partition_size = reader.read_u32::<LittleEndian>()?;
        reader.read_i32_into::<LittleEndian>(&mut this.reserved1)?;
        this.partition_offset = reader.read_u32::<LittleEndian>()?;
        reader.read_i32_into::<LittleEndian>(&mut this.reserved2)?;

        Ok(this)
    }
}
