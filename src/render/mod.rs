//! Rendering collaborator interface.
//!
//! A [`Scene`] bundles everything a backend needs to draw one partition
//! visualization; layout and classification happen before it is built.

pub mod svg;

pub use svg::SvgRenderer;

use crate::graph::Graph;
use crate::layout::{EdgeClass, Layout, classify_edges};
use crate::partitioning::{PartitionAssignment, PartitionId};
use crate::partlab_error::PartLabError;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Scene {
    pub title: String,
    pub positions: Layout,
    /// Partition id per vertex, used for colour.
    pub groups: BTreeMap<usize, PartitionId>,
    pub edges: BTreeMap<(usize, usize), EdgeClass>,
}

impl Scene {
    /// Assemble a scene for `graph` partitioned by `assignment`.
    pub fn build(
        title: impl Into<String>,
        graph: &Graph,
        assignment: &PartitionAssignment,
        positions: Layout,
    ) -> Result<Self, PartLabError> {
        let edges = classify_edges(graph, assignment)?;
        let groups = graph
            .vertices()
            .filter_map(|v| assignment.part_of(v).map(|p| (v, p)))
            .collect();
        Ok(Self {
            title: title.into(),
            positions,
            groups,
            edges,
        })
    }
}

/// Produces an image file from a scene.
pub trait Renderer {
    fn render(&self, scene: &Scene, path: &Path) -> Result<(), PartLabError>;
}
