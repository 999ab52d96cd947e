use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{PacError, Result};

#[derive(Debug, Clone)]
pub struct Header {
    pub version: [u16; 24],
    pub size: u32,
    pub product_name: [u16; 256],
    pub firmware_name: [u16; 256],
    pub partition_count: i32,
    pub partition_list_offset: i32,
    pub reserved1: [i32; 5],
    pub product_alias: [u16; 50],
    pub reserved2: [u16; 6],
    pub reserved3: [u16; 2],
}

impl Header {
    pub const SIZE: usize = 24 * 2 + 4 + 256 * 2 + 256 * 2 + 4 + 4 + 5 * 4 + 50 * 2 + 6 * 2 + 2 * 2;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(PacError::MalformedHeader(format!(
                "expected {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        Ok(Self::from_reader(&mut Cursor::new(&bytes[..Self::SIZE]))?)
    }

    fn from_reader<R>(reader: &mut R) -> std::io::Result<Self>
    where
        R: Read,
    {
        let mut this = Self {
            version: [0; 24],
            size: 0,
            product_name: [0; 256],
            firmware_name: [0; 256],
            partition_count: 0,
            partition_list_offset: 0,
            reserved1: [0; 5],
            product_alias: [0; 50],
            reserved2: [0; 6],
            reserved3: [0; 2],
        };
        reader.read_u16_into::<LittleEndian>(&mut this.version)?;
        this.size = reader.read_u32::<LittleEndian>()?;
        reader.read_u16_into::<LittleEndian>(&mut this.product_name)?;
        reader.read_u16_into::<LittleEndian>(&mut this.firmware_name)?;
        this.partition_count = reader.read_i32::<LittleEndian>()?;
        this.partition_list_offset = reader.read_i32::<LittleEndian>()?;
        reader.read_i32_into::<LittleEndian>(&mut this.reserved1)?;
        reader.read_u16_into::<LittleEndian>(&mut this.product_alias)?;
        reader.read_u16_into::<LittleEndian>(&mut this.reserved2)?;
        reader.read_u16_into::<LittleEndian>(&mut this.reserved3)?;

        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_size() {
        assert_eq!(Header::SIZE, 1220);
    }

    #[test]
    fn test_field_offsets() {
        let mut bytes = vec![0u8; Header::SIZE];
        bytes[48..52].copy_from_slice(&0xDEADBEEFu32.to_le_bytes());
        bytes[52..54].copy_from_slice(&u16::from(b'P').to_le_bytes());
        bytes[564..566].copy_from_slice(&u16::from(b'F').to_le_bytes());
        bytes[1076..1080].copy_from_slice(&7i32.to_le_bytes());
        bytes[1080..1084].copy_from_slice(&0x1000i32.to_le_bytes());
        bytes[1218..1220].copy_from_slice(&0xA55Au16.to_le_bytes());

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.size, 0xDEADBEEF);
        assert_eq!(header.product_name[0], b'P' as u16);
        assert_eq!(header.firmware_name[0], b'F' as u16);
        assert_eq!(header.partition_count, 7);
        assert_eq!(header.partition_list_offset, 0x1000);
        assert_eq!(header.reserved3[1], 0xA55A);
    }

    #[test]
    fn test_short_buffer() {
        let bytes = vec![0u8; Header::SIZE - 1];
        assert!(matches!(Header::from_bytes(&bytes), Err(PacError::MalformedHeader(_))));
    }
}
