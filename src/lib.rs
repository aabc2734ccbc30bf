#![cfg_attr(docsrs, feature(doc_cfg))]
//! # partlab
//!
//! partlab is the data and measurement plumbing around an external graph
//! partitioner. It writes graphs in the METIS-style adjacency-list format,
//! reads back the per-vertex partition file the partitioner produces, lays
//! the partitioned graph out so partitions sit side by side, and sweeps the
//! partitioner across a grid of tuning parameters, collecting the edge cut
//! and max cut it reports.
//!
//! ## Features
//! - Lossless adjacency-list codec with dense relabeling of arbitrary node ids
//! - Partition file reader validated against the graph's vertex count
//! - Seeded spring and stress embeddings plus per-partition x offsets
//! - Cut / internal edge classification and local quality metrics
//! - Parameter-sweep harness with an injectable invoker and a process-backed one
//! - Grid, power-law and small-world generators; an SVG renderer
//!
//! ## Determinism
//!
//! The spring layout and the random generators take an explicit `u64` seed (the
//! layout's lives in [`layout::LayoutConfig`], the generators' is a plain
//! argument) and draw from a `SmallRng` built from it, so the same seed
//! gives the same graph and the same picture. The stress layout and the
//! codecs use no randomness at all.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! partlab = "0.1"
//! # Optional features:
//! # features = ["parallel"]
//! ```

pub mod graph;
pub mod graph_generation;
pub mod io;
pub mod layout;
pub mod partitioning;
pub mod partlab_error;
pub mod render;
pub mod sweep;

pub use partlab_error::PartLabError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::graph::{Graph, GraphSource, LabeledGraph, Relabeling};
    pub use crate::io::metis::{read_graph_file, write_graph_file};
    pub use crate::io::{
        GraphReader, GraphWriter, MetisReader, MetisWriter, PartitionReader, read_partition_file,
    };
    pub use crate::layout::{
        EdgeClass, Layout, LayoutConfig, LayoutMethod, Point2, classify_edges, cluster_layout,
        compose_layout,
    };
    pub use crate::partitioning::PartitionAssignment;
    pub use crate::partlab_error::PartLabError;
    pub use crate::render::{Renderer, Scene, SvgRenderer};
    pub use crate::sweep::{
        CancelToken, FailurePolicy, GridPoint, Invoke, ParameterAxis, ParameterGrid,
        ProcessInvoker, SweepConfig, SweepRecord, extract_metrics, run_grid,
    };
}
