//! Synthetic test graphs.
//!
//! All generators are deterministic for a given seed. Identifiers follow the
//! natural shape of each family (lattice coordinates for grids and small
//! worlds), and the encoder relabels them densely on write.

use crate::graph::{Graph, LabeledGraph};
use crate::partlab_error::PartLabError;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

fn invalid(message: impl Into<String>) -> PartLabError {
    PartLabError::InvalidParameter(message.into())
}

/// `size × size` 4-neighbour lattice with `(row, col)` node ids, row-major.
pub fn grid_2d(size: usize) -> LabeledGraph<(usize, usize)> {
    let mut g = LabeledGraph::new();
    for i in 0..size {
        for j in 0..size {
            g.add_node((i, j));
        }
    }
    for i in 0..size {
        for j in 0..size {
            if i + 1 < size {
                g.add_edge((i, j), (i + 1, j));
            }
            if j + 1 < size {
                g.add_edge((i, j), (i, j + 1));
            }
        }
    }
    g
}

/// Pick `m` distinct entries of `pool`, weighted by multiplicity.
fn random_subset(pool: &[usize], m: usize, rng: &mut SmallRng) -> Vec<usize> {
    let mut picked = Vec::with_capacity(m);
    while picked.len() < m {
        if let Some(&x) = pool.choose(rng) {
            if !picked.contains(&x) {
                picked.push(x);
            }
        } else {
            break;
        }
    }
    picked
}

/// Holme–Kim power-law graph with tunable clustering.
///
/// Each new vertex attaches `m` edges by preferential attachment; after
/// each attachment, with probability `p` the next edge closes a triangle
/// with a neighbor of the previous target instead.
pub fn powerlaw_cluster(n: usize, m: usize, p: f64, seed: u64) -> Result<Graph, PartLabError> {
    if m < 1 || m > n {
        return Err(invalid(format!("powerlaw_cluster needs 1 <= m <= n, got m={m}, n={n}")));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(invalid(format!("triangle probability {p} outside [0, 1]")));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = Graph::with_vertices(n);
    // 0-based ids below; vertex v is stored as v + 1
    let mut repeated: Vec<usize> = (0..m).collect();

    for source in m..n {
        let mut targets = random_subset(&repeated, m, &mut rng);
        let Some(mut target) = targets.pop() else {
            break;
        };
        g.add_edge(source + 1, target + 1)?;
        repeated.push(target);
        let mut count = 1;
        while count < m {
            if rng.gen_bool(p) {
                let closing: Vec<usize> = g
                    .neighbors(target + 1)
                    .iter()
                    .map(|&v| v - 1)
                    .filter(|&v| v != source && !g.has_edge(source + 1, v + 1))
                    .collect();
                if let Some(&nbr) = closing.choose(&mut rng) {
                    g.add_edge(source + 1, nbr + 1)?;
                    repeated.push(nbr);
                    count += 1;
                    continue;
                }
            }
            let Some(next) = targets.pop() else {
                break;
            };
            target = next;
            g.add_edge(source + 1, target + 1)?;
            repeated.push(target);
            count += 1;
        }
        repeated.extend(std::iter::repeat_n(source, m));
    }
    Ok(g)
}

/// Kleinberg navigable small world on an `n^dim` lattice.
///
/// Lattice points within Manhattan distance `p` are joined; each point then
/// adds `q` long-range links to other points chosen with probability
/// proportional to `d^-r`. The result is undirected.
pub fn navigable_small_world(
    n: usize,
    p: usize,
    q: usize,
    r: f64,
    dim: usize,
    seed: u64,
) -> Result<LabeledGraph<Vec<usize>>, PartLabError> {
    if n < 1 || p < 1 || dim < 1 {
        return Err(invalid("navigable_small_world needs n, p and dim >= 1"));
    }
    if !(r.is_finite() && r >= 0.0) {
        return Err(invalid(format!("exponent r must be finite and >= 0, got {r}")));
    }
    let total = u32::try_from(dim)
        .ok()
        .and_then(|d| n.checked_pow(d))
        .ok_or_else(|| invalid("lattice size overflows"))?;

    let points: Vec<Vec<usize>> = (0..total)
        .map(|mut idx| {
            let mut coord = vec![0; dim];
            for c in coord.iter_mut().rev() {
                *c = idx % n;
                idx /= n;
            }
            coord
        })
        .collect();

    let mut g = LabeledGraph::new();
    for pt in &points {
        g.add_node(pt.clone());
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    for (i, a) in points.iter().enumerate() {
        let mut cdf = Vec::with_capacity(points.len());
        let mut others = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        for (j, b) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let d: usize = a.iter().zip(b).map(|(x, y)| x.abs_diff(*y)).sum();
            if d <= p {
                g.add_edge(a.clone(), b.clone());
            }
            acc += (d as f64).powf(-r);
            cdf.push(acc);
            others.push(j);
        }
        if others.is_empty() {
            continue;
        }
        for _ in 0..q {
            let x = rng.gen_range(0.0..acc);
            let k = cdf.partition_point(|&c| c <= x).min(others.len() - 1);
            g.add_edge(a.clone(), points[others[k]].clone());
        }
    }
    Ok(g)
}
