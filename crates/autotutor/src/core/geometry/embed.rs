//! 3D conformer generation by distance geometry.
//!
//! Each attempt derives pairwise distance bounds from the force field
//! targets, samples a random distance matrix within them, embeds it through
//! the metric matrix eigendecomposition, and relaxes the result with the
//! force field. Attempts are seeded deterministically from the base seed.
//!
//! Distance bounds cannot tell a structure from its mirror image, so an
//! embedding whose chiral centers mostly come out inverted is reflected
//! before relaxation, and an attempt is only accepted once every chiral
//! center and marked double bond has the written configuration.

use super::forcefield::{ForceField, signed_volume, topological_distances};
use crate::core::models::molecule::Molecule;
use nalgebra::{DMatrix, Point3, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, trace};

const GRADIENT_TOLERANCE: f64 = 1e-2;
const MAX_ACCEPTED_BOND_DEVIATION: f64 = 0.25;
/// Largest accepted 1-3 distance error, about 20 degrees at a carbon center.
const MAX_ACCEPTED_ANGLE_DEVIATION: f64 = 0.35;
const MIN_ATOM_SEPARATION: f64 = 0.5;
const FRAGMENT_SLACK: f64 = 5.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbedError {
    #[error("Cannot embed an empty molecule")]
    EmptyMolecule,
    #[error("No conformer converged after {attempts} attempts (best bond deviation {best_deviation:.3} Å)")]
    NoConvergence { attempts: u32, best_deviation: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedOptions {
    pub seed: u64,
    pub max_attempts: u32,
    pub max_iterations: u32,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            max_attempts: 10,
            max_iterations: 2000,
        }
    }
}

/// An explicit-hydrogen molecule together with one set of 3D coordinates.
#[derive(Debug, Clone)]
pub struct Conformer {
    pub molecule: Molecule,
    pub positions: Vec<Point3<f64>>,
    pub energy: f64,
}

/// Builds a single 3D conformer for a heavy-atom graph.
///
/// Implicit hydrogens are made explicit first; the returned conformer's
/// molecule keeps the heavy-atom indices of `mol` and appends hydrogens.
///
/// # Errors
///
/// Returns [`EmbedError::NoConvergence`] when no attempt converges with
/// every bond length and bond angle within tolerance and every stereo
/// constraint satisfied.
pub fn embed_conformer(mol: &Molecule, options: &EmbedOptions) -> Result<Conformer, EmbedError> {
    if mol.is_empty() {
        return Err(EmbedError::EmptyMolecule);
    }
    let explicit = mol.with_explicit_hydrogens();
    let ff = ForceField::build(&explicit);
    let (lower, upper) = distance_bounds(&explicit, &ff);
    let mut best_deviation = f64::INFINITY;

    for attempt in 0..options.max_attempts {
        let seed = options.seed.wrapping_add(attempt as u64);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = random_embedding(&lower, &upper, &mut rng);
        if mostly_inverted(&ff, &positions) {
            for p in positions.iter_mut() {
                p.x = -p.x;
            }
        }
        let result = ff.minimize(&mut positions, options.max_iterations, GRADIENT_TOLERANCE);
        let deviation = ff.max_bond_deviation(&positions);
        let angle_deviation = ff.max_angle_deviation(&positions);
        let stereo_ok = ff.stereo_satisfied(&positions);
        best_deviation = best_deviation.min(deviation);
        trace!(
            attempt,
            seed,
            energy = result.energy,
            iterations = result.iterations,
            deviation,
            angle_deviation,
            stereo_ok,
            "Embedding attempt finished"
        );

        if result.converged
            && deviation <= MAX_ACCEPTED_BOND_DEVIATION
            && angle_deviation <= MAX_ACCEPTED_ANGLE_DEVIATION
            && stereo_ok
            && min_separation(&positions) >= MIN_ATOM_SEPARATION
        {
            center(&mut positions);
            debug!(attempt, energy = result.energy, "Conformer accepted");
            return Ok(Conformer {
                molecule: explicit,
                positions,
                energy: result.energy,
            });
        }
    }

    Err(EmbedError::NoConvergence {
        attempts: options.max_attempts,
        best_deviation,
    })
}

/// Lower and upper distance bounds for every atom pair. Bonded and 1-3 pairs
/// are pinned near their targets; upper bounds elsewhere come from shortest
/// paths over the pinned pairs.
fn distance_bounds(mol: &Molecule, ff: &ForceField) -> (DMatrix<f64>, DMatrix<f64>) {
    let n = mol.atom_count();
    let mut lower = DMatrix::<f64>::zeros(n, n);
    let mut upper = DMatrix::<f64>::from_element(n, n, f64::INFINITY);
    for i in 0..n {
        upper[(i, i)] = 0.0;
    }
    let mut pin = |i: usize, j: usize, target: f64, slack: f64| {
        lower[(i, j)] = target - slack;
        lower[(j, i)] = target - slack;
        upper[(i, j)] = target + slack;
        upper[(j, i)] = target + slack;
    };
    for t in &ff.cis_trans {
        pin(t.distance.i, t.distance.j, t.distance.target, 0.1);
    }
    for t in &ff.angles {
        pin(t.i, t.j, t.target, 0.04);
    }
    for t in &ff.bonds {
        pin(t.i, t.j, t.target, 0.01);
    }

    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = upper[(i, k)] + upper[(k, j)];
                if through < upper[(i, j)] {
                    upper[(i, j)] = through;
                }
            }
        }
    }

    for i in 0..n {
        let hops = topological_distances(mol, i);
        for j in 0..n {
            if i == j || hops[j] <= 2 {
                continue;
            }
            let vdw = mol.atom(i).element.vdw_radius() + mol.atom(j).element.vdw_radius();
            let floor = 0.7 * vdw;
            if upper[(i, j)].is_infinite() {
                lower[(i, j)] = vdw;
                upper[(i, j)] = vdw + FRAGMENT_SLACK;
            } else {
                lower[(i, j)] = floor.min(upper[(i, j)]);
            }
        }
    }
    (lower, upper)
}

fn random_embedding(lower: &DMatrix<f64>, upper: &DMatrix<f64>, rng: &mut StdRng) -> Vec<Point3<f64>> {
    let n = lower.nrows();
    if n == 1 {
        return vec![Point3::origin()];
    }

    let mut d2 = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (lo, hi) = (lower[(i, j)], upper[(i, j)]);
            let d = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            d2[(i, j)] = d * d;
            d2[(j, i)] = d * d;
        }
    }

    let total: f64 = d2.iter().sum::<f64>() / 2.0;
    let nf = n as f64;
    let d0: Vec<f64> = (0..n)
        .map(|i| d2.row(i).sum() / nf - total / (nf * nf))
        .collect();
    let metric = DMatrix::from_fn(n, n, |i, j| 0.5 * (d0[i] + d0[j] - d2[(i, j)]));
    let eigen = SymmetricEigen::new(metric);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    (0..n)
        .map(|i| {
            let mut coords = [0.0; 3];
            for (axis, coord) in coords.iter_mut().enumerate() {
                let k = order.get(axis).copied();
                *coord = match k {
                    Some(k) if eigen.eigenvalues[k] > 1e-6 => {
                        eigen.eigenvalues[k].sqrt() * eigen.eigenvectors[(i, k)]
                    }
                    _ => rng.gen_range(-0.25..0.25),
                };
            }
            Point3::new(coords[0], coords[1], coords[2])
        })
        .collect()
}

/// Whether more chiral centers have the wrong handedness than the right one.
fn mostly_inverted(ff: &ForceField, positions: &[Point3<f64>]) -> bool {
    let wrong = ff
        .chiral
        .iter()
        .filter(|t| {
            let [c, n1, n2, n3] = t.atoms;
            t.sign * signed_volume(positions[c], positions[n1], positions[n2], positions[n3]) < 0.0
        })
        .count();
    2 * wrong > ff.chiral.len()
}

fn min_separation(positions: &[Point3<f64>]) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            min = min.min((positions[i] - positions[j]).norm());
        }
    }
    min
}

fn center(positions: &mut [Point3<f64>]) {
    if positions.is_empty() {
        return;
    }
    let centroid = positions.iter().fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords)
        / positions.len() as f64;
    for p in positions.iter_mut() {
        *p -= centroid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::forcefield::dihedral;
    use crate::core::smiles::parse_smiles;

    fn embed(smiles: &str) -> Conformer {
        let mol = parse_smiles(smiles).unwrap();
        embed_conformer(&mol, &EmbedOptions::default()).unwrap()
    }

    fn dist(c: &Conformer, i: usize, j: usize) -> f64 {
        (c.positions[i] - c.positions[j]).norm()
    }

    #[test]
    fn ethanol_conformer_has_hydrogens_and_sane_bonds() {
        let c = embed("CCO");
        assert_eq!(c.molecule.atom_count(), 9);
        assert_eq!(c.positions.len(), 9);
        assert!((dist(&c, 0, 1) - 1.52).abs() < 0.1);
        assert!((dist(&c, 1, 2) - 1.42).abs() < 0.1);
    }

    #[test]
    fn alkyne_is_nearly_linear() {
        let c = embed("CC#C");
        let a = c.positions[0] - c.positions[1];
        let b = c.positions[2] - c.positions[1];
        let angle = a.angle(&b).to_degrees();
        assert!(angle > 165.0, "angle was {}", angle);
    }

    #[test]
    fn benzene_ring_is_flat() {
        let c = embed("c1ccccc1");
        let p = &c.positions;
        let normal = (p[1] - p[0]).cross(&(p[2] - p[0])).normalize();
        for atom in 3..6 {
            assert!((p[atom] - p[0]).dot(&normal).abs() < 0.1);
        }
    }

    #[test]
    fn same_seed_gives_identical_coordinates() {
        let a = embed("CC(C)CBr");
        let b = embed("CC(C)CBr");
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn single_atoms_and_fragments_embed() {
        let c = embed("[Na+].[Cl-]");
        assert_eq!(c.positions.len(), 2);
        assert!(dist(&c, 0, 1) > 1.0);
        assert_eq!(embed("C").positions.len(), 5);
    }

    fn chiral_volume(c: &Conformer, center: usize) -> f64 {
        let t = &c.molecule.tetrahedral_centers()[0];
        assert_eq!(t.center, center);
        let [n1, n2, n3, _] = t.neighbor_atoms().unwrap();
        let p = &c.positions;
        signed_volume(p[center], p[n1], p[n2], p[n3])
    }

    #[test]
    fn double_bond_marks_set_the_torsion() {
        let trans = embed("C/C=C/C");
        let cis = embed("C/C=C\\C");
        let torsion = |c: &Conformer| {
            let p = &c.positions;
            dihedral(p[0], p[1], p[2], p[3])
        };
        assert!(torsion(&trans).abs() > 150.0, "trans torsion {}", torsion(&trans));
        assert!(torsion(&cis).abs() < 30.0, "cis torsion {}", torsion(&cis));
        assert!(dist(&trans, 0, 3) > dist(&cis, 0, 3) + 0.5);
    }

    #[test]
    fn enantiomers_embed_with_opposite_handedness() {
        let s = embed("C[C@@H](O)C(=O)O");
        let r = embed("C[C@H](O)C(=O)O");
        let (vs, vr) = (chiral_volume(&s, 1), chiral_volume(&r, 1));
        assert!(vs < -0.5, "@@ volume {}", vs);
        assert!(vr > 0.5, "@ volume {}", vr);
    }

    #[test]
    fn every_center_keeps_its_handedness_in_a_ring() {
        // Two centers with opposite marks in one ring.
        let c = embed("C[C@H]1CC[C@@H](C)CC1");
        let ff = ForceField::build(&c.molecule);
        assert_eq!(ff.chiral.len(), 2);
        assert!(ff.stereo_satisfied(&c.positions));
    }

    #[test]
    fn accepted_conformers_keep_bond_angles() {
        for smiles in ["C1CCC2CCCCC2C1", "CC(C)(C)c1ccc(O)cc1", "C1CC1C(=O)N"] {
            let c = embed(smiles);
            let ff = ForceField::build(&c.molecule);
            assert!(
                ff.max_angle_deviation(&c.positions) <= MAX_ACCEPTED_ANGLE_DEVIATION,
                "{}",
                smiles
            );
        }
    }

    #[test]
    fn empty_molecule_is_rejected() {
        assert!(matches!(
            embed_conformer(&Molecule::new(), &EmbedOptions::default()),
            Err(EmbedError::EmptyMolecule)
        ));
    }
}
