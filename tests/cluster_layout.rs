use approx::assert_relative_eq;
use partlab::graph::Graph;
use partlab::layout::{
    EdgeClass, Layout, LayoutConfig, LayoutMethod, Point2, base_layout, classify_edges,
    cluster_layout, cluster_offset, compose_layout,
};
use partlab::partitioning::{PartitionAssignment, edge_cut};
use proptest::prelude::*;

fn layout_and_parts() -> impl Strategy<Value = (Layout, PartitionAssignment)> {
    (1usize..25, 1usize..6).prop_flat_map(|(n, k)| {
        (
            prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), n),
            prop::collection::vec(0..k, n),
        )
            .prop_map(|(coords, parts)| {
                let base: Layout = coords
                    .into_iter()
                    .enumerate()
                    .map(|(i, (x, y))| (i + 1, Point2::new(x, y)))
                    .collect();
                (base, PartitionAssignment::new(parts))
            })
    })
}

proptest! {
    #[test]
    fn partitions_shift_as_rigid_blocks((base, parts) in layout_and_parts()) {
        let moved = cluster_layout(&base, &parts, (-1.0, 1.0)).unwrap();
        let k = parts.num_parts().unwrap();
        for (v, p) in &base {
            let q = moved[v];
            let part = parts.part_of(*v).unwrap();
            prop_assert!((q.x - p.x - cluster_offset(part, k, (-1.0, 1.0))).abs() < 1e-9);
            prop_assert_eq!(q.y, p.y);
        }
    }

    #[test]
    fn higher_partitions_sit_further_right((base, parts) in layout_and_parts()) {
        // same base point for everyone isolates the offset
        let flat: Layout = base.keys().map(|&v| (v, Point2::new(0.25, 0.0))).collect();
        let moved = cluster_layout(&flat, &parts, (-2.0, 3.0)).unwrap();
        for (u, pu) in &moved {
            for (v, pv) in &moved {
                let (a, b) = (parts.part_of(*u).unwrap(), parts.part_of(*v).unwrap());
                if a < b {
                    prop_assert!(pu.x < pv.x);
                }
            }
        }
    }
}

#[test]
fn offsets_span_the_range() {
    let o: Vec<f64> = (0..5).map(|p| cluster_offset(p, 5, (-1.0, 1.0))).collect();
    assert_relative_eq!(o[0], -1.0);
    assert_relative_eq!(o[2], 0.0);
    assert_relative_eq!(o[4], 1.0);
    assert!(o.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(cluster_offset(0, 1, (-1.0, 1.0)), -1.0);
}

#[test]
fn classification_is_total_and_matches_edge_cut() {
    let g = Graph::from_edges(6, [(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 1), (1, 4)]).unwrap();
    let a = PartitionAssignment::new(vec![0, 0, 0, 1, 1, 1]);
    let classes = classify_edges(&g, &a).unwrap();
    assert_eq!(classes.len(), g.edge_count());
    let cut = classes.values().filter(|c| **c == EdgeClass::Cut).count();
    assert_eq!(cut, edge_cut(&g, &a));
    assert_eq!(classes[&(1, 4)], EdgeClass::Cut);
    assert_eq!(classes[&(1, 2)], EdgeClass::Internal);
}

#[test]
fn composed_layout_is_reproducible_for_both_methods() {
    let g = Graph::from_edges(8, (1..8).map(|v| (v, v + 1))).unwrap();
    let a = PartitionAssignment::new(vec![0, 0, 0, 0, 1, 1, 1, 1]);
    for method in [LayoutMethod::Spring, LayoutMethod::Stress] {
        let cfg = LayoutConfig {
            method,
            ..LayoutConfig::default()
        };
        let first = compose_layout(&g, &a, &cfg).unwrap();
        let second = compose_layout(&g, &a, &cfg).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);

        let base = base_layout(&g, &cfg);
        assert_relative_eq!(first[&1].x - base[&1].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(first[&8].x - base[&8].x, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn short_assignment_is_rejected() {
    let g = Graph::from_edges(3, [(1, 2), (2, 3)]).unwrap();
    let a = PartitionAssignment::new(vec![0, 1]);
    assert!(compose_layout(&g, &a, &LayoutConfig::default()).is_err());
    assert!(classify_edges(&g, &a).is_err());
}
