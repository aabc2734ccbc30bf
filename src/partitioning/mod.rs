//! Partition assignments returned by an external partitioner.
//!
//! Partitioning itself happens outside this crate; this module only holds
//! the per-vertex assignment and quality metrics computed from it.

pub mod metrics;

pub use self::metrics::*;

use crate::graph::Graph;
use crate::partlab_error::PartLabError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type PartitionId = usize;

/// Per-vertex partition ids; index `i` holds the id of vertex `i + 1`.
///
/// Ids need not be contiguous. The partition count is `max + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAssignment(Vec<PartitionId>);

impl PartitionAssignment {
    pub fn new(parts: Vec<PartitionId>) -> Self {
        Self(parts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PartitionId] {
        &self.0
    }

    /// Partition of the 1-based `vertex`.
    #[inline]
    pub fn part_of(&self, vertex: usize) -> Option<PartitionId> {
        vertex.checked_sub(1).and_then(|i| self.0.get(i).copied())
    }

    /// `max(id) + 1`, or 0 for an empty assignment.
    ///
    /// Fails only when the largest id is `usize::MAX`.
    pub fn num_parts(&self) -> Result<usize, PartLabError> {
        match self.0.iter().max() {
            None => Ok(0),
            Some(&m) => m.checked_add(1).ok_or_else(|| {
                PartLabError::InvalidParameter(format!("partition id {m} leaves no room for a count"))
            }),
        }
    }

    /// Vertex count per partition id that occurs; sparse ids cost nothing.
    pub fn part_sizes(&self) -> BTreeMap<PartitionId, usize> {
        let mut sizes = BTreeMap::new();
        for &p in &self.0 {
            *sizes.entry(p).or_insert(0) += 1;
        }
        sizes
    }

    /// Fail unless there is exactly one entry per vertex of `graph`.
    pub fn ensure_covers(&self, graph: &Graph) -> Result<(), PartLabError> {
        if self.len() != graph.vertex_count() {
            return Err(PartLabError::PartitionCountMismatch {
                source_name: "assignment".into(),
                expected: graph.vertex_count(),
                found: self.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<PartitionId>> for PartitionAssignment {
    fn from(parts: Vec<PartitionId>) -> Self {
        Self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_parts_uses_max_id() {
        assert_eq!(PartitionAssignment::new(vec![]).num_parts().unwrap(), 0);
        assert_eq!(PartitionAssignment::new(vec![0, 0]).num_parts().unwrap(), 1);
        assert_eq!(PartitionAssignment::new(vec![2, 5, 2]).num_parts().unwrap(), 6);
        assert!(matches!(
            PartitionAssignment::new(vec![0, usize::MAX]).num_parts(),
            Err(PartLabError::InvalidParameter(_))
        ));
    }

    #[test]
    fn part_of_is_one_based() {
        let a = PartitionAssignment::new(vec![4, 1]);
        assert_eq!(a.part_of(0), None);
        assert_eq!(a.part_of(1), Some(4));
        assert_eq!(a.part_of(2), Some(1));
        assert_eq!(a.part_of(3), None);
    }

    #[test]
    fn part_sizes_skip_unused_ids() {
        let a = PartitionAssignment::new(vec![0, 2, 2, 1_000_000_000_000]);
        let sizes: Vec<_> = a.part_sizes().into_iter().collect();
        assert_eq!(sizes, vec![(0, 1), (2, 2), (1_000_000_000_000, 1)]);
    }

    #[test]
    fn ensure_covers_checks_length() {
        let g = Graph::with_vertices(3);
        assert!(PartitionAssignment::new(vec![0, 1, 0]).ensure_covers(&g).is_ok());
        assert!(matches!(
            PartitionAssignment::new(vec![0]).ensure_covers(&g),
            Err(PartLabError::PartitionCountMismatch { expected: 3, found: 1, .. })
        ));
    }
}
