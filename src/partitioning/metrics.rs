//! Partitioning metrics utilities.
//!
//! This module evaluates a partition assignment against the graph it was
//! computed for: edge cut, per-part cut and the resulting max cut, and the
//! load imbalance. The figures mirror what external partitioners report, so
//! a sweep's parsed numbers can be cross-checked locally.

use super::{PartitionAssignment, PartitionId};
use crate::graph::Graph;
use crate::partlab_error::PartLabError;
use num_traits::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

/// Computes the edge cut of a partitioning (O(E)).
///
/// The edge cut is the number of edges whose endpoints lie in different parts.
/// `assignment` must cover every vertex of `g`.
pub fn edge_cut(g: &Graph, assignment: &PartitionAssignment) -> usize {
    g.edges()
        .filter(|&(u, v)| assignment.part_of(u) != assignment.part_of(v))
        .count()
}

/// Number of cut edges incident to each part (O(E)).
///
/// Every cut edge counts once for each of its two parts. Parts without cut
/// edges are absent.
pub fn cut_per_part(g: &Graph, assignment: &PartitionAssignment) -> BTreeMap<PartitionId, usize> {
    let mut cuts = BTreeMap::new();
    for (u, v) in g.edges() {
        if let (Some(pu), Some(pv)) = (assignment.part_of(u), assignment.part_of(v)) {
            if pu != pv {
                *cuts.entry(pu).or_insert(0) += 1;
                *cuts.entry(pv).or_insert(0) += 1;
            }
        }
    }
    cuts
}

/// Largest per-part cut.
pub fn max_cut(g: &Graph, assignment: &PartitionAssignment) -> usize {
    cut_per_part(g, assignment).into_values().max().unwrap_or(0)
}

/// Compute imbalance after passing part loads.
///
/// Maximum relative deviation of any part above the ideal `total / num_parts`.
pub fn imbalance_from_part_loads(part_loads: &[usize]) -> f64 {
    imbalance_over_parts(part_loads.iter().copied(), part_loads.len())
}

/// Like [`imbalance_from_part_loads`], for `num_parts` parts of which only
/// the non-empty ones are listed in `loads`.
pub fn imbalance_over_parts(loads: impl Iterator<Item = usize> + Clone, num_parts: usize) -> f64 {
    if num_parts == 0 {
        return 0.0;
    }
    let total: usize = loads.clone().sum();
    let ideal = total.to_f64().unwrap_or(0.0) / num_parts.to_f64().unwrap_or(1.0);
    if ideal == 0.0 {
        return 0.0;
    }
    loads
        .map(|load| (load.to_f64().unwrap_or(0.0) - ideal) / ideal)
        .fold(0.0f64, f64::max)
}

/// Summary of a partition's quality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionQuality {
    pub num_parts: usize,
    pub edge_cut: usize,
    pub max_cut: usize,
    /// Vertex count per occupied partition id.
    pub part_sizes: BTreeMap<PartitionId, usize>,
    pub imbalance: f64,
}

/// Evaluate `assignment` on `g` with unit vertex weights.
pub fn evaluate(
    g: &Graph,
    assignment: &PartitionAssignment,
) -> Result<PartitionQuality, PartLabError> {
    assignment.ensure_covers(g)?;
    let num_parts = assignment.num_parts()?;
    let part_sizes = assignment.part_sizes();
    Ok(PartitionQuality {
        num_parts,
        edge_cut: edge_cut(g, assignment),
        max_cut: max_cut(g, assignment),
        imbalance: imbalance_over_parts(part_sizes.values().copied(), num_parts),
        part_sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    fn cycle4() -> Graph {
        Graph::from_edges(4, [(1, 2), (2, 3), (3, 4), (4, 1)]).unwrap()
    }

    #[test]
    fn edge_cut_cycle() {
        let g = cycle4();
        assert_eq!(edge_cut(&g, &vec![0, 0, 0, 0].into()), 0);
        assert_eq!(edge_cut(&g, &vec![0, 0, 1, 1].into()), 2);
        assert_eq!(edge_cut(&g, &vec![0, 1, 0, 1].into()), 4);
    }

    #[test]
    fn max_cut_path() {
        // Path: 1-2-3-4, parts 0 | 1 | 2 2
        let g = Graph::from_edges(4, [(1, 2), (2, 3), (3, 4)]).unwrap();
        let a: PartitionAssignment = vec![0, 1, 2, 2].into();
        let cuts: Vec<_> = cut_per_part(&g, &a).into_iter().collect();
        assert_eq!(cuts, vec![(0, 1), (1, 2), (2, 1)]);
        assert_eq!(max_cut(&g, &a), 2);
    }

    #[test]
    fn imbalance_of_uneven_parts() {
        assert_ulps_eq!(imbalance_from_part_loads(&[3, 1]), 0.5);
        assert_ulps_eq!(imbalance_from_part_loads(&[2, 2]), 0.0);
        assert_ulps_eq!(imbalance_from_part_loads(&[]), 0.0);
    }

    #[test]
    fn evaluate_rejects_short_assignment() {
        let g = cycle4();
        assert!(evaluate(&g, &vec![0, 1].into()).is_err());
        let q = evaluate(&g, &vec![0, 0, 1, 1].into()).unwrap();
        assert_eq!(q.edge_cut, 2);
        assert_eq!(q.max_cut, 2);
        assert_eq!(q.part_sizes.values().copied().collect::<Vec<_>>(), vec![2, 2]);
    }

    #[test]
    fn evaluate_handles_sparse_ids() {
        let g = cycle4();
        let q = evaluate(&g, &vec![0, 0, 1_000_000_000_000, 1_000_000_000_000].into()).unwrap();
        assert_eq!(q.num_parts, 1_000_000_000_001);
        assert_eq!(q.edge_cut, 2);
        assert_eq!(q.max_cut, 2);
        assert_eq!(q.part_sizes.len(), 2);
        // empty parts count toward the ideal load
        assert!(q.imbalance > 1.0);
        assert!(matches!(
            evaluate(&g, &vec![0, 0, 1, usize::MAX].into()),
            Err(PartLabError::InvalidParameter(_))
        ));
    }
}
