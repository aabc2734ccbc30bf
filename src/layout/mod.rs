//! Partition-aware 2-D layouts.
//!
//! A layout is composed in two steps: a base embedding of the whole graph
//! ([`base_layout`]), then a translation of every partition along the x axis
//! ([`cluster_layout`]) so partitions appear side by side in id order while
//! each keeps its internal shape. [`classify_edges`] tags every edge as cut or
//! internal for the renderer.
//!
//! ## Determinism
//!
//! The spring embedding draws its starting positions from a `SmallRng` seeded
//! from [`LayoutConfig::seed`]; the stress embedding starts from a circle and
//! uses no randomness. Equal inputs always give equal coordinates.

pub mod spring;
pub mod stress;

pub use spring::SpringLayout;
pub use stress::StressLayout;

use crate::graph::Graph;
use crate::partitioning::{PartitionAssignment, PartitionId};
use crate::partlab_error::PartLabError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 2-D coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertex (1-based) to coordinate.
pub type Layout = BTreeMap<usize, Point2>;

/// Base embedding algorithm.
pub trait Embedding {
    fn embed(&self, graph: &Graph) -> Layout;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMethod {
    /// Fruchterman–Reingold force-directed embedding.
    #[default]
    Spring,
    /// Shortest-path stress majorization.
    Stress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub method: LayoutMethod,
    pub seed: u64,
    pub iterations: usize,
    /// Range spanned by the per-partition x offsets.
    pub offset_range: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            method: LayoutMethod::Spring,
            seed: 42,
            iterations: 50,
            offset_range: (-1.0, 1.0),
        }
    }
}

/// Base embedding of `graph` according to `cfg`.
pub fn base_layout(graph: &Graph, cfg: &LayoutConfig) -> Layout {
    match cfg.method {
        LayoutMethod::Spring => SpringLayout {
            seed: cfg.seed,
            iterations: cfg.iterations,
        }
        .embed(graph),
        LayoutMethod::Stress => StressLayout {
            iterations: cfg.iterations.max(1) * 6,
            ..StressLayout::default()
        }
        .embed(graph),
    }
}

/// Offset of partition `part` among `k` evenly spaced offsets from `range.0`
/// to `range.1`, inclusive. A single partition sits at `range.0`.
pub fn cluster_offset(part: PartitionId, k: usize, range: (f64, f64)) -> f64 {
    let (lo, hi) = range;
    if k <= 1 {
        return lo;
    }
    let step = (hi - lo) / (k - 1) as f64;
    lo + step * part as f64
}

/// Shift every vertex of partition `p` by `cluster_offset(p, k, range)` along x.
///
/// With `k = max(assignment) + 1`, partitions end up ordered left to right
/// by id. Offsets are computed per vertex, so sparse ids need no table.
/// Y coordinates are untouched.
pub fn cluster_layout(
    base: &Layout,
    assignment: &PartitionAssignment,
    range: (f64, f64),
) -> Result<Layout, PartLabError> {
    if range.1 <= range.0 {
        return Err(PartLabError::InvalidParameter(format!(
            "offset range ({}, {}) must be increasing",
            range.0, range.1
        )));
    }
    if assignment.len() != base.len() {
        return Err(PartLabError::PartitionCountMismatch {
            source_name: "assignment".into(),
            expected: base.len(),
            found: assignment.len(),
        });
    }
    let k = assignment.num_parts()?;
    base.iter()
        .map(|(&vertex, p)| {
            let part = assignment.part_of(vertex).ok_or_else(|| {
                PartLabError::InvalidGraph(format!("layout vertex {vertex} has no partition"))
            })?;
            Ok((vertex, Point2::new(p.x + cluster_offset(part, k, range), p.y)))
        })
        .collect()
}

/// Base embedding followed by the partition offset.
pub fn compose_layout(
    graph: &Graph,
    assignment: &PartitionAssignment,
    cfg: &LayoutConfig,
) -> Result<Layout, PartLabError> {
    assignment.ensure_covers(graph)?;
    let base = base_layout(graph, cfg);
    cluster_layout(&base, assignment, cfg.offset_range)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    /// Endpoints in different partitions.
    Cut,
    Internal,
}

/// Classify every edge `(u, v)`, `u < v`, of `graph`.
pub fn classify_edges(
    graph: &Graph,
    assignment: &PartitionAssignment,
) -> Result<BTreeMap<(usize, usize), EdgeClass>, PartLabError> {
    assignment.ensure_covers(graph)?;
    Ok(graph
        .edges()
        .map(|(u, v)| {
            let class = if assignment.part_of(u) != assignment.part_of(v) {
                EdgeClass::Cut
            } else {
                EdgeClass::Internal
            };
            ((u, v), class)
        })
        .collect())
}

/// Translate and scale `pos` so it is centred on the origin with the largest
/// absolute coordinate equal to 1.
pub(crate) fn rescale(pos: &mut [[f64; 2]]) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    let mut lim = 0.0f64;
    for p in pos.iter_mut() {
        p[0] -= cx;
        p[1] -= cy;
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= lim;
            p[1] /= lim;
        }
    }
}

pub(crate) fn to_layout(pos: &[[f64; 2]]) -> Layout {
    pos.iter()
        .enumerate()
        .map(|(i, p)| (i + 1, Point2::new(p[0], p[1])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_triangles() -> Graph {
        Graph::from_edges(6, [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)]).unwrap()
    }

    #[test]
    fn offsets_are_linspace() {
        assert_eq!(cluster_offset(0, 1, (-1.0, 1.0)), -1.0);
        let expected = [-1.0, -0.5, 0.0, 0.5, 1.0];
        for (p, b) in expected.into_iter().enumerate() {
            assert_abs_diff_eq!(cluster_offset(p, 5, (-1.0, 1.0)), b, epsilon = 1e-12);
        }
    }

    #[test]
    fn sparse_and_extreme_ids() {
        let base: Layout = [(1, Point2::new(0.0, 0.0)), (2, Point2::new(0.0, 0.5))].into();
        let far: PartitionAssignment = vec![0, 1_000_000_000_000].into();
        let moved = cluster_layout(&base, &far, (-1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(moved[&1].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(moved[&2].x, 1.0, epsilon = 1e-9);

        let overflow: PartitionAssignment = vec![0, usize::MAX].into();
        assert!(matches!(
            cluster_layout(&base, &overflow, (-1.0, 1.0)),
            Err(PartLabError::InvalidParameter(_))
        ));
    }

    #[test]
    fn cluster_layout_shifts_x_only() {
        let g = two_triangles();
        let a: PartitionAssignment = vec![0, 0, 0, 1, 1, 1].into();
        let base = base_layout(&g, &LayoutConfig::default());
        let shifted = cluster_layout(&base, &a, (-1.0, 1.0)).unwrap();
        for v in g.vertices() {
            let expected_dx = if v <= 3 { -1.0 } else { 1.0 };
            assert_abs_diff_eq!(shifted[&v].x - base[&v].x, expected_dx, epsilon = 1e-12);
            assert_eq!(shifted[&v].y, base[&v].y);
        }
    }

    #[test]
    fn cluster_layout_rejects_length_mismatch() {
        let g = two_triangles();
        let base = base_layout(&g, &LayoutConfig::default());
        let short: PartitionAssignment = vec![0, 1].into();
        assert!(matches!(
            cluster_layout(&base, &short, (-1.0, 1.0)),
            Err(PartLabError::PartitionCountMismatch { expected: 6, found: 2, .. })
        ));
        let full: PartitionAssignment = vec![0; 6].into();
        assert!(cluster_layout(&base, &full, (1.0, 1.0)).is_err());
    }

    #[test]
    fn classification_marks_bridge_as_cut() {
        let g = two_triangles();
        let a: PartitionAssignment = vec![0, 0, 0, 1, 1, 1].into();
        let classes = classify_edges(&g, &a).unwrap();
        assert_eq!(classes.len(), g.edge_count());
        assert_eq!(classes[&(3, 4)], EdgeClass::Cut);
        assert_eq!(
            classes.values().filter(|c| **c == EdgeClass::Internal).count(),
            6
        );
    }

    #[test]
    fn base_layout_is_deterministic_and_normalized() {
        let g = two_triangles();
        for method in [LayoutMethod::Spring, LayoutMethod::Stress] {
            let cfg = LayoutConfig {
                method,
                ..LayoutConfig::default()
            };
            let a = base_layout(&g, &cfg);
            let b = base_layout(&g, &cfg);
            assert_eq!(a, b);
            assert_eq!(a.len(), 6);
            let lim = a
                .values()
                .map(|p| p.x.abs().max(p.y.abs()))
                .fold(0.0f64, f64::max);
            assert_abs_diff_eq!(lim, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn trivial_graphs_embed() {
        assert!(base_layout(&Graph::default(), &LayoutConfig::default()).is_empty());
        let one = base_layout(&Graph::with_vertices(1), &LayoutConfig::default());
        assert_eq!(one[&1], Point2::new(0.0, 0.0));
    }
}
