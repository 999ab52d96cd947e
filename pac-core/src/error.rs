use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PacError>;

#[derive(Debug, thiserror::Error)]
pub enum PacError {
    #[error("Upstream IO Error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Output directory `{}` does not exist or is not a directory", .0.display())]
    InvalidOutputDirectory(PathBuf),
    #[error("Unable to open the firmware file `{}`: {source}", path.display())]
    InputOpen { path: PathBuf, source: std::io::Error },
    #[error("Unable to retrieve information for firmware file `{}`: {source}", path.display())]
    InputStat { path: PathBuf, source: std::io::Error },
    #[error("Firmware file is too small to be valid: {size} bytes, header needs {required}")]
    FileTooSmall { size: u64, required: usize },

    #[error("Malformed PAC header: {0}")]
    MalformedHeader(String),
    #[error("Malformed partition descriptor: {0}")]
    MalformedDescriptor(String),
    #[error("Truncated partition descriptor #{index} at offset {offset}")]
    TruncatedDescriptor { index: usize, offset: u64 },
    #[error("Invalid partition file name: {0:?}")]
    InvalidFileName(String),

    #[error("Output file `{}` already exists, extraction aborted", .0.display())]
    OutputAlreadyExists(PathBuf),
    #[error("Failed to create output file `{}`: {source}", path.display())]
    OutputCreate { path: PathBuf, source: std::io::Error },
    #[error("Truncated payload for `{}`: expected {expected} bytes, copied {copied}", path.display())]
    TruncatedPayload { path: PathBuf, expected: u64, copied: u64 },
    #[error("Failed to write partition data to `{}`: {source}", path.display())]
    WriteFailure { path: PathBuf, source: std::io::Error },
}
