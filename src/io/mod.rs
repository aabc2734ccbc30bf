//! Graph and partition file I/O.
//!
//! This module provides trait-based readers and writers for the METIS-style
//! adjacency-list interchange format, plus the flat per-vertex partition
//! file an external partitioner produces.

pub mod metis;
pub mod partition_file;

use crate::graph::{GraphSource, Relabeling};
use crate::partlab_error::PartLabError;
use std::io::{Read, Write};

pub use metis::{MetisDocument, MetisHeader, MetisReader, MetisWriter, MissingLines};
pub use partition_file::{
    PartitionReader, partition_file_path, read_partition_file, write_partition,
    write_partition_file,
};

/// Source label used in errors when reading from an in-memory buffer.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Trait for readers that decode a graph document.
pub trait GraphReader {
    /// Decoded document type.
    type Document;

    /// Parse a document from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Self::Document, PartLabError>;
}

/// Trait for writers that encode any [`GraphSource`].
pub trait GraphWriter {
    /// Write `graph`, returning the dense relabeling that was applied.
    fn write<W: Write, S: GraphSource>(
        &self,
        writer: W,
        graph: &S,
    ) -> Result<Relabeling<S::NodeId>, PartLabError>;
}
