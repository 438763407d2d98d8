//! Force-directed spring layout
//!
//! Fruchterman-Reingold with a linear cooling schedule. Initial placement is
//! seeded, so a given node set always lays out the same way. Output is
//! normalized to the unit square.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Iteration count used by the dashboard
pub const DEFAULT_ITERATIONS: usize = 50;

/// Fixed seed for initial placement
const LAYOUT_SEED: u64 = 42;

/// A 2D layout coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Lay out `node_count` nodes connected by `edges` (index pairs)
///
/// Positions come back in node order, each coordinate within [-1, 1].
pub fn spring_layout(node_count: usize, edges: &[(usize, usize)], iterations: usize) -> Vec<Point> {
    if node_count == 0 {
        return Vec::new();
    }
    if node_count == 1 {
        return vec![Point { x: 0.0, y: 0.0 }];
    }

    let mut rng = StdRng::seed_from_u64(LAYOUT_SEED);
    let mut pos: Vec<Point> = (0..node_count)
        .map(|_| Point {
            x: rng.random_range(-0.5..0.5),
            y: rng.random_range(-0.5..0.5),
        })
        .collect();

    // Ideal pairwise distance for a unit-area canvas
    let k = (1.0 / node_count as f32).sqrt();
    let mut temperature = 0.1f32;
    let cooling = temperature / iterations.max(1) as f32;

    for _ in 0..iterations {
        let mut disp = vec![Point { x: 0.0, y: 0.0 }; node_count];

        // Repulsion between every pair
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].x += fx;
                disp[i].y += fy;
                disp[j].x -= fx;
                disp[j].y -= fy;
            }
        }

        // Attraction along edges
        for &(a, b) in edges {
            if a >= node_count || b >= node_count || a == b {
                continue;
            }
            let dx = pos[a].x - pos[b].x;
            let dy = pos[a].y - pos[b].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[a].x -= fx;
            disp[a].y -= fy;
            disp[b].x += fx;
            disp[b].y += fy;
        }

        // Apply displacements, capped by the current temperature
        for i in 0..node_count {
            let len = (disp[i].x * disp[i].x + disp[i].y * disp[i].y)
                .sqrt()
                .max(1e-6);
            let capped = len.min(temperature);
            pos[i].x += disp[i].x / len * capped;
            pos[i].y += disp[i].y / len * capped;
        }

        temperature = (temperature - cooling).max(1e-3);
    }

    normalize(&mut pos);
    pos
}

/// Center positions on the origin and scale them into [-1, 1]
fn normalize(pos: &mut [Point]) {
    let n = pos.len() as f32;
    let cx = pos.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = pos.iter().map(|p| p.y).sum::<f32>() / n;

    let mut max_abs = 1e-6f32;
    for p in pos.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        max_abs = max_abs.max(p.x.abs()).max(p.y.abs());
    }

    for p in pos.iter_mut() {
        p.x /= max_abs;
        p.y /= max_abs;
    }
}
