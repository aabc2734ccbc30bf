//! PartLabError: Unified error type for partlab public APIs
//!
//! Codec and partition-file errors carry the identity of the input they came
//! from and, where it makes sense, the 1-based line number of the offending
//! line. A missing metric in partitioner output is *not* an error; it is
//! represented as `None` in the sweep records.

use thiserror::Error;

/// Unified error type for partlab operations.
#[derive(Debug, Error)]
pub enum PartLabError {
    /// Malformed header, adjacency line or partition line.
    #[error("format error in {source_name} at line {line}: {message}")]
    Format {
        source_name: String,
        line: usize,
        message: String,
    },
    /// The document declared more adjacency lines than it contains.
    #[error("truncated input {source_name}: expected {expected} adjacency lines, found {found}")]
    TruncatedInput {
        source_name: String,
        expected: usize,
        found: usize,
    },
    /// Partition file length differs from the graph's vertex count.
    #[error("partition count mismatch in {source_name}: expected {expected} entries, found {found}")]
    PartitionCountMismatch {
        source_name: String,
        expected: usize,
        found: usize,
    },
    /// The external partitioner could not be launched or exited abnormally.
    #[error("invocation of `{program}` failed: {message}")]
    Invocation { program: String, message: String },
    /// The external partitioner did not finish in time and was killed.
    #[error("invocation of `{program}` timed out after {seconds:.1}s")]
    Timeout { program: String, seconds: f64 },
    /// The sweep was cancelled before every grid point completed.
    #[error("sweep cancelled")]
    Cancelled,
    /// A graph violated the simple-graph invariants (self-loop, unknown endpoint).
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    /// A generator, grid or layout parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartLabError {
    pub(crate) fn format(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        PartLabError::Format {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}
