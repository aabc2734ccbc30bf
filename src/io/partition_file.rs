//! Flat per-vertex partition files.
//!
//! Line `i` (ignoring blank lines) holds the non-negative partition id of
//! vertex `i`. This is what an external partitioner writes next to its input
//! as `<graph>.parts.<k>`.

use crate::io::MEMORY_SOURCE;
use crate::partitioning::PartitionAssignment;
use crate::partlab_error::PartLabError;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Reader validating the entry count against an expected vertex count.
#[derive(Debug, Clone)]
pub struct PartitionReader {
    pub source_name: String,
}

impl Default for PartitionReader {
    fn default() -> Self {
        Self {
            source_name: MEMORY_SOURCE.to_string(),
        }
    }
}

impl PartitionReader {
    pub fn named(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
        }
    }

    pub fn read_str(
        &self,
        text: &str,
        expected_n: usize,
    ) -> Result<PartitionAssignment, PartLabError> {
        let mut parts = Vec::with_capacity(expected_n);
        for (idx, line) in text.lines().enumerate() {
            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }
            let part = raw.parse::<usize>().map_err(|_| {
                PartLabError::format(
                    &self.source_name,
                    idx + 1,
                    format!("invalid partition id: `{raw}`"),
                )
            })?;
            parts.push(part);
        }
        if parts.len() != expected_n {
            return Err(PartLabError::PartitionCountMismatch {
                source_name: self.source_name.clone(),
                expected: expected_n,
                found: parts.len(),
            });
        }
        Ok(PartitionAssignment::new(parts))
    }

    pub fn read<R: Read>(
        &self,
        mut reader: R,
        expected_n: usize,
    ) -> Result<PartitionAssignment, PartLabError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        self.read_str(&contents, expected_n)
    }
}

/// Read the partition file at `path`, expecting `expected_n` entries.
pub fn read_partition_file(
    path: &Path,
    expected_n: usize,
) -> Result<PartitionAssignment, PartLabError> {
    let file = File::open(path)?;
    PartitionReader::named(path.display().to_string()).read(file, expected_n)
}

/// Write one partition id per line.
pub fn write_partition<W: Write>(
    writer: W,
    assignment: &PartitionAssignment,
) -> Result<(), PartLabError> {
    let mut out = BufWriter::new(writer);
    for part in assignment.as_slice() {
        writeln!(out, "{part}")?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_partition_file(
    path: &Path,
    assignment: &PartitionAssignment,
) -> Result<(), PartLabError> {
    write_partition(File::create(path)?, assignment)
}

/// `<graph>.parts.<k>`, the partitioner's output naming convention.
pub fn partition_file_path(graph_file: &Path, num_parts: usize) -> PathBuf {
    let mut name = graph_file.as_os_str().to_os_string();
    name.push(format!(".parts.{num_parts}"));
    PathBuf::from(name)
}
