//! Raw on-disk layouts of the PAC container, kept field-for-field.

mod header;
mod partition;

pub use header::Header;
pub use partition::PartitionRecord;
