use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{PacError, Result};
use crate::pac::{self, HEADER_SIZE, MIN_DESCRIPTOR_SIZE, PacArchive, PacHeader, PartitionDescriptor};

/// Emitted while the container is being parsed, before the whole chain is
/// known to be valid.
#[derive(Debug, Clone, Copy)]
pub enum ParseEvent<'e> {
    Header(&'e PacHeader),
    Partition {
        index: usize,
        partition: &'e PartitionDescriptor,
    },
}

/// Reads the fixed header from the start of `reader`.
pub fn read_header<R>(reader: &mut R) -> Result<PacHeader>
where
    R: Read + Seek,
{
    reader.seek(SeekFrom::Start(0))?;
    let mut buf = vec![0; HEADER_SIZE];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => PacError::MalformedHeader("unexpected end of input".to_string()),
        _ => PacError::IO(e),
    })?;

    pac::decode_header(&buf)
}

/// Walks the descriptor chain starting at `header.partition_list_offset()`.
///
/// Every record is located by the length of the one before it. A record's
/// length is validated before anything past its length field is read, and
/// the variable tail is skipped without being buffered.
pub fn read_partitions<R>(reader: &mut R, header: &PacHeader) -> Result<Vec<PartitionDescriptor>>
where
    R: Read + Seek,
{
    read_partitions_with(reader, header, |_| {})
}

/// Like [`read_partitions`], reporting each descriptor as soon as it decodes.
pub fn read_partitions_with<R, F>(
    reader: &mut R,
    header: &PacHeader,
    mut on_event: F,
) -> Result<Vec<PartitionDescriptor>>
where
    R: Read + Seek,
    F: FnMut(ParseEvent<'_>),
{
    let count = header.partition_count() as usize;
    let mut partitions = Vec::with_capacity(count);
    let mut offset = header.partition_list_offset();
    let mut buf = vec![0; MIN_DESCRIPTOR_SIZE];

    for index in 0..count {
        let truncated = move |e: io::Error| match e.kind() {
            io::ErrorKind::UnexpectedEof => PacError::TruncatedDescriptor { index, offset },
            _ => PacError::IO(e),
        };

        reader.seek(SeekFrom::Start(offset))?;
        reader.read_exact(&mut buf[..4]).map_err(truncated)?;
        let record_length = LittleEndian::read_u32(&buf[..4]);
        if (record_length as usize) < MIN_DESCRIPTOR_SIZE {
            return Err(PacError::MalformedDescriptor(format!(
                "#{} at offset {}: record length {} is below the minimum of {}",
                index, offset, record_length, MIN_DESCRIPTOR_SIZE
            )));
        }
        reader.read_exact(&mut buf[4..]).map_err(truncated)?;

        let tail = record_length as u64 - MIN_DESCRIPTOR_SIZE as u64;
        if tail > 0 {
            let skipped = io::copy(&mut reader.by_ref().take(tail), &mut io::sink())?;
            if skipped < tail {
                return Err(PacError::TruncatedDescriptor { index, offset });
            }
        }

        let partition = pac::decode_descriptor(&buf, record_length)?;
        tracing::debug!(
            index,
            offset,
            record_length,
            name = partition.partition_name(),
            file_name = partition.file_name(),
            size = partition.size(),
            "parsed partition descriptor"
        );
        on_event(ParseEvent::Partition {
            index,
            partition: &partition,
        });
        partitions.push(partition);
        offset += record_length as u64;
    }

    Ok(partitions)
}

pub fn read_archive<R>(reader: &mut R) -> Result<PacArchive>
where
    R: Read + Seek,
{
    read_archive_with(reader, |_| {})
}

pub fn read_archive_with<R, F>(reader: &mut R, mut on_event: F) -> Result<PacArchive>
where
    R: Read + Seek,
    F: FnMut(ParseEvent<'_>),
{
    let header = read_header(reader)?;
    on_event(ParseEvent::Header(&header));
    let partitions = read_partitions_with(reader, &header, on_event)?;

    Ok(PacArchive::new(header, partitions))
}
