//! Distance-preserving embedding by stress majorization.
//!
//! Target distances are hop counts; pairs in different components are held
//! one hop beyond the graph's largest finite distance. Each sweep moves one
//! vertex at a time to the weighted (1/d²) average of the positions its
//! neighbors in distance space would put it at.

use super::{Embedding, Layout, rescale, to_layout};
use crate::graph::Graph;
use std::collections::VecDeque;
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct StressLayout {
    pub iterations: usize,
    /// Stop once no vertex moves further than this in one sweep.
    pub tolerance: f64,
}

impl Default for StressLayout {
    fn default() -> Self {
        Self {
            iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// All-pairs hop distances (`usize::MAX` for unreachable pairs).
fn hop_distances(graph: &Graph) -> Vec<Vec<usize>> {
    let n = graph.vertex_count();
    let mut dist = vec![vec![usize::MAX; n]; n];
    let mut queue = VecDeque::new();
    for s in 0..n {
        dist[s][s] = 0;
        queue.push_back(s);
        while let Some(u) = queue.pop_front() {
            let du = dist[s][u];
            for &v in graph.neighbors(u + 1) {
                if dist[s][v - 1] == usize::MAX {
                    dist[s][v - 1] = du + 1;
                    queue.push_back(v - 1);
                }
            }
        }
    }
    dist
}

impl Embedding for StressLayout {
    fn embed(&self, graph: &Graph) -> Layout {
        let n = graph.vertex_count();
        if n <= 1 {
            return to_layout(&vec![[0.0, 0.0]; n]);
        }

        let hops = hop_distances(graph);
        let longest = hops
            .iter()
            .flatten()
            .copied()
            .filter(|&d| d != usize::MAX)
            .max()
            .unwrap_or(0);
        let target = |i: usize, j: usize| -> f64 {
            match hops[i][j] {
                usize::MAX => (longest + 1) as f64,
                d => d as f64,
            }
        };

        let mut pos: Vec<[f64; 2]> = (0..n)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / n as f64;
                [theta.cos(), theta.sin()]
            })
            .collect();

        for _ in 0..self.iterations {
            let mut max_move = 0.0f64;
            for i in 0..n {
                let (mut sx, mut sy, mut wsum) = (0.0, 0.0, 0.0);
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let d = target(i, j);
                    let w = 1.0 / (d * d);
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let len = dx.hypot(dy).max(1e-9);
                    sx += w * (pos[j][0] + d * dx / len);
                    sy += w * (pos[j][1] + d * dy / len);
                    wsum += w;
                }
                let next = [sx / wsum, sy / wsum];
                max_move = max_move.max((next[0] - pos[i][0]).hypot(next[1] - pos[i][1]));
                pos[i] = next;
            }
            if max_move < self.tolerance {
                break;
            }
        }

        rescale(&mut pos);
        to_layout(&pos)
    }
}
