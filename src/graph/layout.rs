//! Fruchterman-Reingold force-directed layout.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::graph::KnowledgeGraph;

/// A node position, roughly within `[-1, 1]` on both axes.
pub type Point = (f64, f64);

const MIN_DISTANCE: f64 = 0.01;
const CONVERGENCE_THRESHOLD: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Optimal distance between nodes
    pub k: f64,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: 1.5,
            iterations: 50,
            seed: 42,
        }
    }
}

/// Positions for every node of `graph`, indexed like [KnowledgeGraph::nodes].
///
/// Edge direction is ignored. The same config always yields the same layout. The result is centered on the origin and
/// scaled so that the largest coordinate is 1; a single node sits at the origin.
pub fn spring_layout(graph: &KnowledgeGraph, config: &LayoutConfig) -> Vec<Point> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.0, 0.0)],
        _ => {}
    }

    let mut adjacent = vec![vec![false; n]; n];
    for edge in graph.edges() {
        adjacent[edge.source][edge.target] = true;
        adjacent[edge.target][edge.source] = true;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions: Vec<Point> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    let k = config.k;
    let mut temperature = 0.1 * span(&positions);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let displacements: Vec<Point> = (0..n)
            .map(|i| {
                let mut disp = (0.0, 0.0);
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = positions[i].0 - positions[j].0;
                    let dy = positions[i].1 - positions[j].1;
                    let distance = dx.hypot(dy).max(MIN_DISTANCE);
                    let attraction = if adjacent[i][j] { distance / k } else { 0.0 };
                    let force = k * k / (distance * distance) - attraction;
                    disp.0 += dx * force;
                    disp.1 += dy * force;
                }
                disp
            })
            .collect();

        let mut total_move = 0.0;
        for (position, disp) in positions.iter_mut().zip(&displacements) {
            let length = disp.0.hypot(disp.1).max(MIN_DISTANCE);
            let step = (disp.0 * temperature / length, disp.1 * temperature / length);
            position.0 += step.0;
            position.1 += step.1;
            total_move += step.0.hypot(step.1);
        }
        temperature -= cooling;
        if total_move / (n as f64) < CONVERGENCE_THRESHOLD {
            break;
        }
    }

    rescale(&mut positions);
    positions
}

/// Largest extent of the points along either axis.
fn span(positions: &[Point]) -> f64 {
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for &(x, y) in positions {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (max_x - min_x).max(max_y - min_y)
}

/// Center on the origin and scale into `[-1, 1]`.
fn rescale(positions: &mut [Point]) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.1).sum::<f64>() / n;
    let mut lim: f64 = 0.0;
    for p in positions.iter_mut() {
        p.0 -= mean_x;
        p.1 -= mean_y;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }
    if lim > 0.0 {
        for p in positions.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
}
