//! Fruchterman–Reingold force-directed embedding.

use super::{Embedding, Layout, rescale, to_layout};
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Force-directed layout with a seeded random start and linear cooling.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
        }
    }
}

const MIN_DISTANCE: f64 = 0.01;

impl Embedding for SpringLayout {
    fn embed(&self, graph: &Graph) -> Layout {
        let n = graph.vertex_count();
        if n <= 1 {
            return to_layout(&vec![[0.0, 0.0]; n]);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut pos: Vec<[f64; 2]> = (0..n)
            .map(|_| [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
            .collect();

        // optimal pairwise distance for the unit square
        let k = (1.0 / n as f64).sqrt();
        let mut temperature = 0.1;
        let cooling = temperature / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let mut disp = vec![[0.0f64; 2]; n];

            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let dist = dx.hypot(dy).max(MIN_DISTANCE);
                    let f = k * k / dist;
                    let (fx, fy) = (dx / dist * f, dy / dist * f);
                    disp[i][0] += fx;
                    disp[i][1] += fy;
                    disp[j][0] -= fx;
                    disp[j][1] -= fy;
                }
            }

            for (u, v) in graph.edges() {
                let (i, j) = (u - 1, v - 1);
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let f = dist * dist / k;
                let (fx, fy) = (dx / dist * f, dy / dist * f);
                disp[i][0] -= fx;
                disp[i][1] -= fy;
                disp[j][0] += fx;
                disp[j][1] += fy;
            }

            for (p, d) in pos.iter_mut().zip(&disp) {
                let len = d[0].hypot(d[1]);
                if len > 0.0 {
                    let scale = len.min(temperature) / len;
                    p[0] += d[0] * scale;
                    p[1] += d[1] * scale;
                }
            }
            temperature -= cooling;
        }

        rescale(&mut pos);
        to_layout(&pos)
    }
}
