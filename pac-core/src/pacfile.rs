use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{PacError, Result};
use crate::pac::{HEADER_SIZE, PacArchive, PacHeader, PartitionDescriptor};
use crate::read::{self, ParseEvent};

type ParseHandler<'a> = Box<dyn FnMut(ParseEvent<'_>) + 'a>;

#[derive(Default)]
pub struct PacFileBuilder<'a> {
    on_parse: Option<ParseHandler<'a>>,
}

impl<'a> PacFileBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after the header and after each descriptor is decoded, so
    /// callers see everything that parsed before a failure.
    pub fn on_parse<F>(mut self, on_parse: F) -> Self
    where
        F: FnMut(ParseEvent<'_>) + 'a,
    {
        self.on_parse = Some(Box::new(on_parse));
        self
    }

    pub fn open(self, path: impl AsRef<Path>) -> Result<PacFile> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PacError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata = file.metadata().map_err(|source| PacError::InputStat {
            path: path.to_path_buf(),
            source,
        })?;
        check_size(metadata.len())?;

        let mut reader = BufReader::new(file);
        let archive = self.parse(&mut reader)?;
        tracing::info!(
            path = %path.display(),
            firmware = archive.header().firmware_name(),
            partitions = archive.partitions().len(),
            "opened PAC file"
        );

        Ok(PacFile {
            path: Some(path.to_path_buf()),
            archive,
            reader,
        })
    }

    /// Parses a container from any seekable source.
    pub fn from_reader<R>(self, mut reader: R) -> Result<PacFile<R>>
    where
        R: Read + Seek,
    {
        let size = reader.seek(SeekFrom::End(0))?;
        check_size(size)?;
        let archive = self.parse(&mut reader)?;

        Ok(PacFile {
            path: None,
            archive,
            reader,
        })
    }

    fn parse<R>(self, reader: &mut R) -> Result<PacArchive>
    where
        R: Read + Seek,
    {
        match self.on_parse {
            Some(mut on_parse) => read::read_archive_with(reader, |event| on_parse(event)),
            None => read::read_archive(reader),
        }
    }
}

/// An opened PAC container: its parsed metadata plus the input handle the
/// payloads are streamed from.
pub struct PacFile<R = BufReader<File>> {
    path: Option<PathBuf>,
    archive: PacArchive,
    reader: R,
}

impl PacFile {
    pub fn builder<'a>() -> PacFileBuilder<'a> {
        PacFileBuilder::new()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        PacFileBuilder::new().open(path)
    }
}

impl<R> PacFile<R>
where
    R: Read + Seek,
{
    pub fn from_reader(reader: R) -> Result<Self> {
        PacFileBuilder::new().from_reader(reader)
    }
}

impl<R> PacFile<R> {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn archive(&self) -> &PacArchive {
        &self.archive
    }

    pub fn header(&self) -> &PacHeader {
        self.archive.header()
    }

    pub fn partitions(&self) -> &[PartitionDescriptor] {
        self.archive.partitions()
    }

    pub(crate) fn into_parts(self) -> (PacArchive, R) {
        (self.archive, self.reader)
    }
}

fn check_size(size: u64) -> Result<()> {
    if size < HEADER_SIZE as u64 {
        return Err(PacError::FileTooSmall {
            size,
            required: HEADER_SIZE,
        });
    }
    Ok(())
}
