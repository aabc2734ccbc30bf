//! METIS-style adjacency-list interchange format.
//!
//! # Format
//! ```text
//! <n> <m> <format_tag>
//! <neighbors of vertex 1, ascending, space separated, possibly empty>
//! ...
//! <neighbors of vertex n>
//! ```
//! - Vertices are numbered `1..=n`; each undirected edge is listed from both
//!   endpoints, so the neighbor counts sum to `2m`.
//! - `format_tag` is an opaque compatibility marker, carried verbatim.
//! - Lines starting with `%` are comments and are skipped.
//!
//! # Limitations
//! - Vertex and edge weights are not interpreted; the tag is never inspected.
//! - The declared `m` is not enforced; a mismatch is only logged.

use crate::graph::{Graph, GraphSource, Relabeling, relabel};
use crate::io::{GraphReader, GraphWriter, MEMORY_SOURCE};
use crate::partlab_error::PartLabError;
use itertools::Itertools;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Format tag written when the caller does not choose one.
pub const DEFAULT_FORMAT_TAG: &str = "000";

/// Most trailing adjacency lines [`MissingLines::TreatAsEmpty`] will fill in.
pub const MAX_MISSING_LINES: usize = 1 << 20;

/// Parsed header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetisHeader {
    /// Declared vertex count `n`.
    pub vertices: usize,
    /// Declared undirected edge count `m`.
    pub edges: usize,
    /// Third header token, if present.
    pub format_tag: Option<String>,
}

/// A decoded interchange document.
#[derive(Debug, Clone)]
pub struct MetisDocument {
    pub header: MetisHeader,
    pub graph: Graph,
}

impl MetisDocument {
    /// Edge count as declared by the header (may differ from `graph.edge_count()`).
    pub fn declared_edges(&self) -> usize {
        self.header.edges
    }
}

/// How the reader treats a document with fewer adjacency lines than `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingLines {
    /// Fail with [`PartLabError::TruncatedInput`].
    #[default]
    Reject,
    /// Read missing trailing lines as isolated vertices.
    TreatAsEmpty,
}

/// Interchange-format reader.
#[derive(Debug, Clone)]
pub struct MetisReader {
    /// Name reported in errors (usually the file path).
    pub source_name: String,
    pub missing_lines: MissingLines,
}

impl Default for MetisReader {
    fn default() -> Self {
        Self {
            source_name: MEMORY_SOURCE.to_string(),
            missing_lines: MissingLines::Reject,
        }
    }
}

impl MetisReader {
    pub fn named(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    pub fn with_missing_lines(mut self, policy: MissingLines) -> Self {
        self.missing_lines = policy;
        self
    }

    /// Decode a document held in memory.
    pub fn read_str(&self, text: &str) -> Result<MetisDocument, PartLabError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim_start().starts_with('%'));

        let (header_no, header_line) = lines
            .next()
            .ok_or_else(|| PartLabError::format(&self.source_name, 1, "missing header line"))?;
        let header = self.parse_header(header_no, header_line)?;
        let n = header.vertices;

        // size checks happen against the lines actually present, before allocating
        let body: Vec<(usize, &str)> = lines.take(n).collect();
        let missing = n - body.len();
        let allowed = match self.missing_lines {
            MissingLines::Reject => 0,
            MissingLines::TreatAsEmpty => MAX_MISSING_LINES,
        };
        if missing > allowed {
            return Err(PartLabError::TruncatedInput {
                source_name: self.source_name.clone(),
                expected: n,
                found: body.len(),
            });
        }
        if missing > 0 {
            log::debug!(
                "{}: {missing} trailing adjacency lines missing, reading as empty",
                self.source_name
            );
        }

        let mut graph = Graph::with_vertices(n);
        for (vertex, &(line_no, line)) in (1..).zip(&body) {
            for token in line.split_whitespace() {
                let neighbor = self.parse_neighbor(line_no, token, n)?;
                if neighbor == vertex {
                    return Err(PartLabError::format(
                        &self.source_name,
                        line_no,
                        format!("vertex {vertex} lists itself as a neighbor"),
                    ));
                }
                graph.add_edge(vertex, neighbor)?;
            }
        }

        if graph.edge_count() != header.edges {
            log::warn!(
                "{}: header declares {} edges but {} were decoded",
                self.source_name,
                header.edges,
                graph.edge_count()
            );
        }
        Ok(MetisDocument { header, graph })
    }

    fn parse_header(&self, line_no: usize, line: &str) -> Result<MetisHeader, PartLabError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(PartLabError::format(
                &self.source_name,
                line_no,
                format!("header needs at least two tokens, found {}", tokens.len()),
            ));
        }
        let vertices = self.parse_count(line_no, tokens[0], "vertex count")?;
        let edges = self.parse_count(line_no, tokens[1], "edge count")?;
        Ok(MetisHeader {
            vertices,
            edges,
            format_tag: tokens.get(2).map(|t| t.to_string()),
        })
    }

    fn parse_count(&self, line_no: usize, raw: &str, what: &str) -> Result<usize, PartLabError> {
        let value = raw.parse::<i64>().map_err(|_| {
            PartLabError::format(&self.source_name, line_no, format!("invalid {what}: `{raw}`"))
        })?;
        usize::try_from(value).map_err(|_| {
            PartLabError::format(&self.source_name, line_no, format!("negative {what}: {value}"))
        })
    }

    fn parse_neighbor(&self, line_no: usize, raw: &str, n: usize) -> Result<usize, PartLabError> {
        let value = raw.parse::<i64>().map_err(|_| {
            PartLabError::format(
                &self.source_name,
                line_no,
                format!("adjacency line is not an integer list (token `{raw}`)"),
            )
        })?;
        match usize::try_from(value) {
            Ok(v) if v >= 1 && v <= n => Ok(v),
            _ => Err(PartLabError::format(
                &self.source_name,
                line_no,
                format!("neighbor id {value} outside 1..={n}"),
            )),
        }
    }
}

impl GraphReader for MetisReader {
    type Document = MetisDocument;

    fn read<R: Read>(&self, mut reader: R) -> Result<MetisDocument, PartLabError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        self.read_str(&contents)
    }
}

/// Interchange-format writer.
#[derive(Debug, Clone)]
pub struct MetisWriter {
    pub format_tag: String,
}

impl Default for MetisWriter {
    fn default() -> Self {
        Self {
            format_tag: DEFAULT_FORMAT_TAG.to_string(),
        }
    }
}

impl MetisWriter {
    pub fn with_tag(format_tag: impl Into<String>) -> Self {
        Self {
            format_tag: format_tag.into(),
        }
    }

    /// Encode an already-dense graph without building a relabeling.
    pub fn write_dense<W: Write>(&self, writer: W, graph: &Graph) -> Result<(), PartLabError> {
        let mut out = BufWriter::new(writer);
        writeln!(
            out,
            "{} {} {}",
            graph.vertex_count(),
            graph.edge_count(),
            self.format_tag
        )?;
        for v in graph.vertices() {
            writeln!(out, "{}", graph.neighbors(v).iter().join(" "))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Encode to a `String`.
    pub fn to_string<S: GraphSource>(&self, graph: &S) -> Result<String, PartLabError> {
        let mut buf = Vec::new();
        self.write(&mut buf, graph)?;
        String::from_utf8(buf).map_err(|e| PartLabError::InvalidGraph(e.to_string()))
    }
}

impl GraphWriter for MetisWriter {
    fn write<W: Write, S: GraphSource>(
        &self,
        writer: W,
        graph: &S,
    ) -> Result<Relabeling<S::NodeId>, PartLabError> {
        let (dense, relabeling) = relabel(graph)?;
        self.write_dense(writer, &dense)?;
        Ok(relabeling)
    }
}

/// Decode the interchange file at `path`.
pub fn read_graph_file(path: &Path) -> Result<MetisDocument, PartLabError> {
    let file = File::open(path)?;
    let doc = MetisReader::named(path.display().to_string()).read(file)?;
    log::debug!(
        "read {}: {} vertices, {} edges",
        path.display(),
        doc.graph.vertex_count(),
        doc.graph.edge_count()
    );
    Ok(doc)
}

/// Encode `graph` to `path`, returning the relabeling used.
pub fn write_graph_file<S: GraphSource>(
    path: &Path,
    graph: &S,
    writer: &MetisWriter,
) -> Result<Relabeling<S::NodeId>, PartLabError> {
    let file = File::create(path)?;
    let relabeling = writer.write(file, graph)?;
    log::info!("graph written to {} in METIS format", path.display());
    Ok(relabeling)
}
