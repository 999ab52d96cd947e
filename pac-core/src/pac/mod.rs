mod header;
mod partition;
mod text;

use serde::Serialize;

pub use header::*;
pub use partition::*;
pub use text::*;

/// PAC container metadata: the header and its descriptor chain, in file order.
#[derive(Debug, Clone, Serialize)]
pub struct PacArchive {
    header: PacHeader,
    partitions: Vec<PartitionDescriptor>,
}

impl PacArchive {
    pub fn new(header: PacHeader, partitions: Vec<PartitionDescriptor>) -> Self {
        PacArchive { header, partitions }
    }

    pub fn header(&self) -> &PacHeader {
        &self.header
    }

    pub fn partitions(&self) -> &[PartitionDescriptor] {
        &self.partitions
    }

    pub fn into_parts(self) -> (PacHeader, Vec<PartitionDescriptor>) {
        (self.header, self.partitions)
    }
}
