use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{PacError, Result};
use crate::pac::PartitionDescriptor;
use crate::pacfile::PacFile;

pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

type EventHandler<'a> = Box<dyn FnMut(ExtractEvent) + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractEvent {
    Start {
        total: usize,
    },
    Skipped {
        index: usize,
        partition_name: String,
    },
    FileStart {
        index: usize,
        path: PathBuf,
        size: u64,
    },
    Progress {
        index: usize,
        copied: u64,
        size: u64,
        percent: u8,
    },
    FileDone {
        index: usize,
        path: PathBuf,
    },
    Finish {
        extracted: usize,
        skipped: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub extracted: usize,
    pub skipped: usize,
    pub bytes_written: u64,
}

/// Fails unless `path` names an existing directory.
pub fn validate_output_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Err(PacError::InvalidOutputDirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Sequential extractor. Partitions are written in descriptor order and the
/// first failure stops the run; outputs already written stay on disk.
pub struct PacExtractBuilder<'a, R> {
    pac: PacFile<R>,
    output_dir: PathBuf,
    buffer_size: usize,
    on_event: Option<EventHandler<'a>>,
}

impl<'a, R> PacExtractBuilder<'a, R>
where
    R: Read + Seek,
{
    pub fn new(pac: PacFile<R>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            pac,
            output_dir: output_dir.as_ref().to_path_buf(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            on_event: None,
        }
    }

    /// Copy chunk size. Only affects throughput and progress granularity.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn on_event<F>(mut self, on_event: F) -> Self
    where
        F: FnMut(ExtractEvent) + 'a,
    {
        self.on_event = Some(Box::new(on_event));
        self
    }

    pub fn run(mut self) -> Result<ExtractReport> {
        let (archive, mut reader) = self.pac.into_parts();
        let (_, partitions) = archive.into_parts();
        let mut report = ExtractReport::default();
        let mut buf = vec![0; self.buffer_size];

        emit(&mut self.on_event, ExtractEvent::Start { total: partitions.len() });

        // each descriptor is dropped as soon as its partition is handled
        for (index, partition) in partitions.into_iter().enumerate() {
            if partition.is_empty() {
                tracing::debug!(index, name = partition.partition_name(), "skipping empty partition");
                report.skipped += 1;
                emit(
                    &mut self.on_event,
                    ExtractEvent::Skipped {
                        index,
                        partition_name: partition.partition_name().to_string(),
                    },
                );
                continue;
            }

            let out_path = output_path(&self.output_dir, &partition)?;
            reader.seek(SeekFrom::Start(partition.offset() as u64))?;
            let mut file = create_output(&out_path)?;

            let size = partition.size() as u64;
            emit(
                &mut self.on_event,
                ExtractEvent::FileStart {
                    index,
                    path: out_path.clone(),
                    size,
                },
            );
            copy_payload(&mut reader, &mut file, &mut buf, &out_path, size, |copied| {
                emit(
                    &mut self.on_event,
                    ExtractEvent::Progress {
                        index,
                        copied,
                        size,
                        percent: percent(copied, size),
                    },
                );
            })?;
            drop(file);
            tracing::debug!(index, path = %out_path.display(), size, "extracted partition");

            report.extracted += 1;
            report.bytes_written += size;
            emit(&mut self.on_event, ExtractEvent::FileDone { index, path: out_path });
        }

        tracing::info!(
            extracted = report.extracted,
            skipped = report.skipped,
            bytes = report.bytes_written,
            "extraction finished"
        );
        emit(
            &mut self.on_event,
            ExtractEvent::Finish {
                extracted: report.extracted,
                skipped: report.skipped,
            },
        );

        Ok(report)
    }
}

impl<R> PacFile<R>
where
    R: Read + Seek,
{
    pub fn extractor<'a>(self, output_dir: impl AsRef<Path>) -> PacExtractBuilder<'a, R> {
        PacExtractBuilder::new(self, output_dir)
    }
}

fn emit(on_event: &mut Option<EventHandler<'_>>, event: ExtractEvent) {
    if let Some(on_event) = on_event {
        on_event(event);
    }
}

fn percent(copied: u64, size: u64) -> u8 {
    if size == 0 {
        return 100;
    }
    (copied as u128 * 100 / size as u128).min(100) as u8
}

/// Names are joined under `output_dir` byte-for-byte; anything that could
/// escape it, or that names no file at all, is refused.
fn output_path(output_dir: &Path, partition: &PartitionDescriptor) -> Result<PathBuf> {
    let raw = file_name_os(partition);
    let relative = Path::new(&raw);
    let mut components = relative.components();
    let escapes = components
        .clone()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    let names_file = components.any(|c| matches!(c, Component::Normal(_)));
    if escapes || !names_file {
        return Err(PacError::InvalidFileName(partition.file_name().to_string()));
    }

    Ok(output_dir.join(relative))
}

#[cfg(unix)]
fn file_name_os(partition: &PartitionDescriptor) -> OsString {
    use std::os::unix::ffi::OsStrExt;

    std::ffi::OsStr::from_bytes(partition.file_name_bytes()).to_os_string()
}

#[cfg(not(unix))]
fn file_name_os(partition: &PartitionDescriptor) -> OsString {
    OsString::from(partition.file_name())
}

fn create_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => PacError::OutputAlreadyExists(path.to_path_buf()),
            _ => PacError::OutputCreate {
                path: path.to_path_buf(),
                source,
            },
        })
}

fn copy_payload<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    buf: &mut [u8],
    path: &Path,
    size: u64,
    mut on_progress: F,
) -> Result<()>
where
    R: Read,
    W: Write,
    F: FnMut(u64),
{
    let mut copied = 0u64;
    while copied < size {
        let chunk = (size - copied).min(buf.len() as u64) as usize;
        reader.read_exact(&mut buf[..chunk]).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => PacError::TruncatedPayload {
                path: path.to_path_buf(),
                expected: size,
                copied,
            },
            _ => PacError::IO(e),
        })?;
        writer.write_all(&buf[..chunk]).map_err(|source| PacError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })?;
        copied += chunk as u64;
        on_progress(copied);
    }
    writer.flush().map_err(|source| PacError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Highest-level unpack API: validate the output directory, open the PAC
/// file, then extract everything.
pub struct UnpackBuilder<'a> {
    input: PathBuf,
    output_dir: PathBuf,
    buffer_size: usize,
    on_event: Option<EventHandler<'a>>,
}

impl<'a> UnpackBuilder<'a> {
    pub fn new(input: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output_dir: PathBuf::from("."),
            buffer_size: DEFAULT_BUFFER_SIZE,
            on_event: None,
        }
    }

    /// Defaults to the current directory.
    pub fn output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn on_event<F>(mut self, on_event: F) -> Self
    where
        F: FnMut(ExtractEvent) + 'a,
    {
        self.on_event = Some(Box::new(on_event));
        self
    }

    pub fn run(self) -> Result<ExtractReport> {
        validate_output_dir(&self.output_dir)?;

        let pac: PacFile<BufReader<File>> = PacFile::open(&self.input)?;
        let mut extractor = pac.extractor(&self.output_dir).buffer_size(self.buffer_size);
        if let Some(on_event) = self.on_event {
            extractor = extractor.on_event(on_event);
        }

        extractor.run()
    }
}
