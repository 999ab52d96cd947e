pub mod error;
pub mod extract;
pub mod pac;
pub mod pacfile;
pub mod read;

mod spec;

pub use error::{PacError, Result};
pub use extract::{ExtractEvent, ExtractReport, PacExtractBuilder, UnpackBuilder};
pub use pacfile::{PacFile, PacFileBuilder};
pub use read::ParseEvent;
