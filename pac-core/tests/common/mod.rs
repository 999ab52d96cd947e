#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use pac_core::pac::{HEADER_SIZE, MIN_DESCRIPTOR_SIZE};

pub struct FixturePartition {
    pub name: &'static str,
    pub file_name: Vec<u16>,
    pub payload: Vec<u8>,
    /// Extra bytes after the fixed descriptor prefix.
    pub tail: usize,
}

impl FixturePartition {
    pub fn new(name: &'static str, file_name: &'static str, payload: Vec<u8>) -> Self {
        Self {
            name,
            file_name: file_name.bytes().map(u16::from).collect(),
            payload,
            tail: 0,
        }
    }

    /// Raw name units, for names that are not plain ASCII.
    pub fn with_file_name_units(mut self, units: &[u16]) -> Self {
        self.file_name = units.to_vec();
        self
    }

    pub fn with_tail(mut self, tail: usize) -> Self {
        self.tail = tail;
        self
    }
}

/// Deterministic, non-repeating-looking payload bytes.
pub fn payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

fn write_text(buf: &mut Vec<u8>, text: &str, units: usize) {
    let encoded: Vec<u16> = text.bytes().map(u16::from).collect();
    write_units(buf, &encoded, units);
}

fn write_units(buf: &mut Vec<u8>, units: &[u16], capacity: usize) {
    let mut padded = units.to_vec();
    padded.resize(capacity, 0);
    for unit in padded {
        buf.write_u16::<LittleEndian>(unit).unwrap();
    }
}

/// Builds a PAC container: header, descriptor chain right after it, then
/// every payload separated by a small gap so payloads never sit next to the
/// chain or to each other.
pub fn build_pac(partitions: &[FixturePartition]) -> Vec<u8> {
    const GAP: usize = 7;

    let chain_len: usize = partitions.iter().map(|p| MIN_DESCRIPTOR_SIZE + p.tail).sum();
    let mut payload_offset = HEADER_SIZE + chain_len + GAP;
    let mut offsets = Vec::new();
    for p in partitions {
        offsets.push(payload_offset);
        payload_offset += p.payload.len() + GAP;
    }

    let mut buf = Vec::new();
    // header
    write_text(&mut buf, "BP_R1.0.0", 24);
    buf.write_u32::<LittleEndian>(0).unwrap();
    write_text(&mut buf, "SC9863A", 256);
    write_text(&mut buf, "ums9230_4h10_Natv", 256);
    buf.write_i32::<LittleEndian>(partitions.len() as i32).unwrap();
    buf.write_i32::<LittleEndian>(HEADER_SIZE as i32).unwrap();
    buf.resize(HEADER_SIZE, 0);

    for (p, offset) in partitions.iter().zip(&offsets) {
        let start = buf.len();
        buf.write_u32::<LittleEndian>((MIN_DESCRIPTOR_SIZE + p.tail) as u32).unwrap();
        write_text(&mut buf, p.name, 256);
        write_units(&mut buf, &p.file_name, 512);
        buf.write_u32::<LittleEndian>(p.payload.len() as u32).unwrap();
        buf.write_all(&[0; 8]).unwrap();
        let offset = if p.payload.is_empty() { 0 } else { *offset as u32 };
        buf.write_u32::<LittleEndian>(offset).unwrap();
        buf.write_all(&[0; 12]).unwrap();
        buf.resize(start + MIN_DESCRIPTOR_SIZE + p.tail, 0xEE);
    }

    for p in partitions {
        buf.extend_from_slice(&[0xAB; GAP]);
        buf.extend_from_slice(&p.payload);
    }

    buf
}

pub fn write_pac(dir: &Path, partitions: &[FixturePartition]) -> PathBuf {
    let path = dir.join("firmware.pac");
    std::fs::write(&path, build_pac(partitions)).unwrap();
    path
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
