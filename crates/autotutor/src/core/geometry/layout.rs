//! Deterministic 2D coordinates for depiction.
//!
//! Each connected fragment is laid out by stress majorization against ideal
//! graph distances: ring members target regular-polygon chords, everything
//! else targets the span of a 120° zig-zag chain. Several seeded random
//! starts are relaxed and the lowest-stress result is kept. Fragments are
//! then aligned on their principal axis and placed side by side.

use super::forcefield::topological_distances;
use crate::core::models::molecule::Molecule;
use crate::core::perception::rings::RingInfo;
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const FRAGMENT_GAP: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub seed: u64,
    pub restarts: u32,
    pub iterations: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 6,
            iterations: 300,
        }
    }
}

/// Computes one 2D point per atom, in units of the ideal bond length.
pub fn compute_layout(mol: &Molecule, options: &LayoutOptions) -> Vec<Point2<f64>> {
    let n = mol.atom_count();
    let mut positions = vec![Point2::origin(); n];
    if n == 0 {
        return positions;
    }
    let rings = RingInfo::perceive(mol);
    let (labels, count) = mol.component_labels();

    let mut cursor = 0.0;
    for component in 0..count {
        let members: Vec<usize> = (0..n).filter(|&i| labels[i] == component).collect();
        let mut local = layout_fragment(mol, &rings, &members, options);
        align_principal_axis(&mut local);

        let min_x = local.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = local.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let mid_y = {
            let lo = local.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
            let hi = local.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
            (lo + hi) / 2.0
        };
        let shift = Vector2::new(cursor - min_x, -mid_y);
        for (&atom, p) in members.iter().zip(&local) {
            positions[atom] = p + shift;
        }
        cursor += (max_x - min_x) + FRAGMENT_GAP;
    }
    positions
}

/// Ideal 2D distance between two atoms of one fragment.
fn ideal_distance(rings: &RingInfo, hops: usize, a: usize, b: usize) -> f64 {
    if let Some(ring) = rings.smallest_ring_with(a, b) {
        let size = ring.len();
        let pa = ring.iter().position(|&x| x == a).unwrap_or(0);
        let pb = ring.iter().position(|&x| x == b).unwrap_or(0);
        let diff = pa.abs_diff(pb);
        let k = diff.min(size - diff) as f64;
        let n = size as f64;
        return (PI * k / n).sin() / (PI / n).sin();
    }
    zigzag_span(hops)
}

/// Distance spanned by `hops` unit bonds of a planar zig-zag chain.
fn zigzag_span(hops: usize) -> f64 {
    let k = hops as f64;
    let along = k * 3f64.sqrt() / 2.0;
    if hops % 2 == 0 {
        along
    } else {
        (along * along + 0.25).sqrt()
    }
}

fn layout_fragment(
    mol: &Molecule,
    rings: &RingInfo,
    members: &[usize],
    options: &LayoutOptions,
) -> Vec<Point2<f64>> {
    let m = members.len();
    if m == 1 {
        return vec![Point2::origin()];
    }

    let mut target = vec![vec![0.0; m]; m];
    for (i, &a) in members.iter().enumerate() {
        let hops = topological_distances(mol, a);
        for (j, &b) in members.iter().enumerate() {
            if i != j {
                target[i][j] = ideal_distance(rings, hops[b], a, b);
            }
        }
    }

    let spread = (m as f64).sqrt() * 1.5;
    let mut best: Option<(f64, Vec<Point2<f64>>)> = None;
    for restart in 0..options.restarts.max(1) {
        let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(restart as u64));
        let mut pos: Vec<Point2<f64>> = (0..m)
            .map(|_| Point2::new(rng.gen_range(-spread..spread), rng.gen_range(-spread..spread)))
            .collect();
        for _ in 0..options.iterations {
            majorize_step(&mut pos, &target);
        }
        let s = stress(&pos, &target);
        if best.as_ref().is_none_or(|(bs, _)| s < *bs) {
            best = Some((s, pos));
        }
    }
    best.map(|(_, pos)| pos).unwrap_or_default()
}

/// One sweep of localized stress majorization with weights `d^-2`.
fn majorize_step(pos: &mut [Point2<f64>], target: &[Vec<f64>]) {
    let m = pos.len();
    for i in 0..m {
        let mut num = Vector2::zeros();
        let mut den = 0.0;
        for j in 0..m {
            if i == j {
                continue;
            }
            let d = target[i][j];
            let w = 1.0 / (d * d);
            let delta = pos[i] - pos[j];
            let dist = delta.norm();
            let pull = if dist > 1e-9 { delta * (d / dist) } else { Vector2::new(d, 0.0) };
            num += (pos[j].coords + pull) * w;
            den += w;
        }
        if den > 0.0 {
            pos[i] = Point2::from(num / den);
        }
    }
}

fn stress(pos: &[Point2<f64>], target: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    for i in 0..pos.len() {
        for j in (i + 1)..pos.len() {
            let d = target[i][j];
            let diff = (pos[i] - pos[j]).norm() - d;
            total += diff * diff / (d * d);
        }
    }
    total
}

/// Rotates points about their centroid so the major axis lies along x.
fn align_principal_axis(pos: &mut [Point2<f64>]) {
    if pos.len() < 2 {
        return;
    }
    let centroid = pos.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords) / pos.len() as f64;
    let (mut cxx, mut cyy, mut cxy) = (0.0, 0.0, 0.0);
    for p in pos.iter() {
        let d = p.coords - centroid;
        cxx += d.x * d.x;
        cyy += d.y * d.y;
        cxy += d.x * d.y;
    }
    let angle = 0.5 * (2.0 * cxy).atan2(cxx - cyy);
    let (sin, cos) = (-angle).sin_cos();
    for p in pos.iter_mut() {
        let d = p.coords - centroid;
        *p = Point2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
    }
}
