use super::potentials::{angle_to_distance, dihedral_to_distance, harmonic, soft_repulsion};
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::stereo::DoubleBondConfig;
use crate::core::models::topology::BondOrder;
use crate::core::perception::rings::RingInfo;
use nalgebra::{Point3, Vector3};
use std::collections::VecDeque;

const BOND_K: f64 = 200.0;
const ANGLE_K: f64 = 60.0;
const PLANARITY_K: f64 = 20.0;
const REPULSION_K: f64 = 10.0;
const CHIRAL_K: f64 = 20.0;
/// Share of the ideal tetrahedral volume below which a center is pushed
/// back toward its required handedness.
const CHIRAL_VOLUME_FRACTION: f64 = 0.5;
/// Triple product of three unit vectors from a tetrahedral center.
const TETRAHEDRAL_UNIT_VOLUME: f64 = 0.7698;
const BOND_SCALE_DOUBLE: f64 = 0.87;
const BOND_SCALE_TRIPLE: f64 = 0.78;
const BOND_SCALE_AROMATIC: f64 = 0.92;
const NONBONDED_SCALE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
}

impl Hybridization {
    pub fn ideal_angle(self) -> f64 {
        match self {
            Self::Sp => 180.0,
            Self::Sp2 => 120.0,
            Self::Sp3 => 109.47,
        }
    }
}

/// Hybridization inferred from Kekulé bond orders.
pub fn hybridization(mol: &Molecule, idx: usize) -> Hybridization {
    let atom = mol.atom(idx);
    let (mut doubles, mut triples) = (0, 0);
    for (_, b) in mol.neighbor_bonds(idx) {
        match mol.bond(b).order {
            BondOrder::Double | BondOrder::Aromatic => doubles += 1,
            BondOrder::Triple => triples += 1,
            BondOrder::Single => {}
        }
    }
    let hypervalent = matches!(atom.element, Element::S | Element::P | Element::Se)
        && mol.degree(idx) >= 3;
    if hypervalent {
        Hybridization::Sp3
    } else if triples > 0 || doubles >= 2 {
        Hybridization::Sp
    } else if doubles == 1 || atom.aromatic {
        Hybridization::Sp2
    } else {
        Hybridization::Sp3
    }
}

/// Ideal bond length from covalent radii, shortened for multiple and
/// aromatic bonds.
pub fn bond_length(mol: &Molecule, bond: usize) -> f64 {
    let b = mol.bond(bond);
    let (a1, a2) = (mol.atom(b.atom1), mol.atom(b.atom2));
    let base = a1.element.covalent_radius() + a2.element.covalent_radius();
    if a1.aromatic && a2.aromatic {
        return base * BOND_SCALE_AROMATIC;
    }
    match b.order {
        BondOrder::Single => base,
        BondOrder::Double | BondOrder::Aromatic => base * BOND_SCALE_DOUBLE,
        BondOrder::Triple => base * BOND_SCALE_TRIPLE,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceTerm {
    pub i: usize,
    pub j: usize,
    pub target: f64,
    pub k: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RepulsionTerm {
    pub i: usize,
    pub j: usize,
    pub min_dist: f64,
}

/// Keeps four atoms coplanar by penalizing their signed volume.
#[derive(Debug, Clone, Copy)]
pub struct PlanarityTerm {
    pub atoms: [usize; 4],
}

/// Holds a tetrahedral center on one side of the plane of its first three
/// neighbors. `sign` is the required sign of the volume spanned by
/// `n1 - c`, `n2 - c` and `n3 - c`; only volumes short of `min_volume` in
/// that direction are penalized.
#[derive(Debug, Clone, Copy)]
pub struct ChiralTerm {
    pub atoms: [usize; 4],
    pub sign: f64,
    pub min_volume: f64,
}

/// Fixes the 1-4 distance across a double bond to its cis or trans value.
#[derive(Debug, Clone, Copy)]
pub struct CisTransTerm {
    pub atoms: [usize; 4],
    pub config: DoubleBondConfig,
    pub distance: DistanceTerm,
}

/// A minimal geometry force field over an explicit-hydrogen molecule.
///
/// Bonds and 1-3 distances are harmonic; sp2 centers and double bonds carry
/// planarity terms; all pairs three or more bonds apart (and atoms in
/// different fragments) repel softly below a scaled van der Waals contact.
/// Stereo centers and marked double bonds add chiral volume walls and cis or
/// trans 1-4 distances.
#[derive(Debug, Clone, Default)]
pub struct ForceField {
    pub bonds: Vec<DistanceTerm>,
    pub angles: Vec<DistanceTerm>,
    pub planarity: Vec<PlanarityTerm>,
    pub repulsion: Vec<RepulsionTerm>,
    pub chiral: Vec<ChiralTerm>,
    pub cis_trans: Vec<CisTransTerm>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeResult {
    pub energy: f64,
    pub iterations: u32,
    pub converged: bool,
}

impl ForceField {
    pub fn build(mol: &Molecule) -> Self {
        let n = mol.atom_count();
        let rings = RingInfo::perceive(mol);
        let hybrid: Vec<Hybridization> = (0..n).map(|i| hybridization(mol, i)).collect();
        let mut ff = ForceField::default();

        let lengths: Vec<f64> = (0..mol.bond_count()).map(|b| bond_length(mol, b)).collect();
        for (b, bond) in mol.bonds().iter().enumerate() {
            ff.bonds.push(DistanceTerm {
                i: bond.atom1,
                j: bond.atom2,
                target: lengths[b],
                k: BOND_K,
            });
        }

        for center in 0..n {
            let neighbors: Vec<(usize, usize)> = mol.neighbor_bonds(center).collect();
            if neighbors.len() > 4 {
                continue;
            }
            for x in 0..neighbors.len() {
                for y in (x + 1)..neighbors.len() {
                    let (a, ba) = neighbors[x];
                    let (c, bc) = neighbors[y];
                    if mol.bond_between(a, c).is_some() {
                        continue;
                    }
                    let angle = ring_angle(&rings, a, center, c, hybrid[center])
                        .unwrap_or_else(|| hybrid[center].ideal_angle());
                    ff.angles.push(DistanceTerm {
                        i: a,
                        j: c,
                        target: angle_to_distance(lengths[ba], lengths[bc], angle),
                        k: ANGLE_K,
                    });
                }
            }
            if hybrid[center] == Hybridization::Sp2 && neighbors.len() == 3 {
                ff.planarity.push(PlanarityTerm {
                    atoms: [center, neighbors[0].0, neighbors[1].0, neighbors[2].0],
                });
            }
        }

        for bond in mol.bonds() {
            if bond.order != BondOrder::Double {
                continue;
            }
            for x in mol.neighbors(bond.atom1).filter(|&x| x != bond.atom2) {
                for y in mol.neighbors(bond.atom2).filter(|&y| y != bond.atom1) {
                    ff.planarity.push(PlanarityTerm {
                        atoms: [x, bond.atom1, bond.atom2, y],
                    });
                }
            }
        }

        let length_between = |a: usize, b: usize| mol.bond_between(a, b).map(|bond| lengths[bond]);

        for center in mol.tetrahedral_centers() {
            let Some([n1, n2, n3, _]) = center.neighbor_atoms() else {
                continue;
            };
            let c = center.center;
            let (Some(l1), Some(l2), Some(l3)) =
                (length_between(c, n1), length_between(c, n2), length_between(c, n3))
            else {
                continue;
            };
            if center.volume_sign() == 0.0 {
                continue;
            }
            ff.chiral.push(ChiralTerm {
                atoms: [c, n1, n2, n3],
                sign: center.volume_sign(),
                min_volume: CHIRAL_VOLUME_FRACTION * TETRAHEDRAL_UNIT_VOLUME * l1 * l2 * l3,
            });
        }

        for stereo in mol.double_bond_stereo() {
            let [r1, a, b, r2] = stereo.atoms;
            let (Some(l1), Some(l2), Some(l3)) =
                (length_between(r1, a), length_between(a, b), length_between(b, r2))
            else {
                continue;
            };
            let dihedral = match stereo.config {
                DoubleBondConfig::Cis => 0.0,
                DoubleBondConfig::Trans => 180.0,
            };
            let target = dihedral_to_distance(
                l1,
                l2,
                l3,
                hybrid[a].ideal_angle(),
                hybrid[b].ideal_angle(),
                dihedral,
            );
            ff.cis_trans.push(CisTransTerm {
                atoms: stereo.atoms,
                config: stereo.config,
                distance: DistanceTerm {
                    i: r1,
                    j: r2,
                    target,
                    k: ANGLE_K,
                },
            });
        }

        for i in 0..n {
            let hops = topological_distances(mol, i);
            for j in (i + 1)..n {
                if hops[j] < 3 {
                    continue;
                }
                let vdw = mol.atom(i).element.vdw_radius() + mol.atom(j).element.vdw_radius();
                let scale = if hops[j] == usize::MAX { 1.0 } else { NONBONDED_SCALE };
                ff.repulsion.push(RepulsionTerm {
                    i,
                    j,
                    min_dist: vdw * scale,
                });
            }
        }
        ff
    }

    /// Total energy; accumulates the Cartesian gradient into `grad`.
    pub fn energy_and_gradient(&self, pos: &[Point3<f64>], grad: &mut [Vector3<f64>]) -> f64 {
        grad.iter_mut().for_each(|g| *g = Vector3::zeros());
        let mut energy = 0.0;

        let stereo_distances = self.cis_trans.iter().map(|t| &t.distance);
        for term in self.bonds.iter().chain(&self.angles).chain(stereo_distances) {
            let d = pos[term.i] - pos[term.j];
            let dist = d.norm().max(1e-9);
            let (e, de) = harmonic(dist, term.target, term.k);
            energy += e;
            let g = d * (de / dist);
            grad[term.i] += g;
            grad[term.j] -= g;
        }

        for term in &self.repulsion {
            let d = pos[term.i] - pos[term.j];
            let dist = d.norm().max(1e-9);
            let (e, de) = soft_repulsion(dist, term.min_dist, REPULSION_K);
            if e == 0.0 {
                continue;
            }
            energy += e;
            let g = d * (de / dist);
            grad[term.i] += g;
            grad[term.j] -= g;
        }

        for term in &self.planarity {
            let [x, a, b, y] = term.atoms;
            let u = pos[a] - pos[x];
            let v = pos[b] - pos[x];
            let w = pos[y] - pos[x];
            let volume = u.dot(&v.cross(&w));
            let (e, de) = harmonic(volume, 0.0, PLANARITY_K);
            energy += e;
            let da = v.cross(&w) * de;
            let db = w.cross(&u) * de;
            let dy = u.cross(&v) * de;
            grad[a] += da;
            grad[b] += db;
            grad[y] += dy;
            grad[x] -= da + db + dy;
        }

        for term in &self.chiral {
            let [c, n1, n2, n3] = term.atoms;
            let u = pos[n1] - pos[c];
            let v = pos[n2] - pos[c];
            let w = pos[n3] - pos[c];
            let signed = term.sign * u.dot(&v.cross(&w));
            let (e, de) = soft_repulsion(signed, term.min_volume, CHIRAL_K);
            if e == 0.0 {
                continue;
            }
            energy += e;
            let de = de * term.sign;
            let d1 = v.cross(&w) * de;
            let d2 = w.cross(&u) * de;
            let d3 = u.cross(&v) * de;
            grad[n1] += d1;
            grad[n2] += d2;
            grad[n3] += d3;
            grad[c] -= d1 + d2 + d3;
        }

        energy
    }

    pub fn energy(&self, pos: &[Point3<f64>]) -> f64 {
        let mut scratch = vec![Vector3::zeros(); pos.len()];
        self.energy_and_gradient(pos, &mut scratch)
    }

    /// Polak-Ribiere conjugate gradient with a backtracking line search.
    pub fn minimize(&self, pos: &mut [Point3<f64>], max_iterations: u32, grad_tolerance: f64) -> MinimizeResult {
        let n = pos.len();
        let mut grad = vec![Vector3::zeros(); n];
        let mut energy = self.energy_and_gradient(pos, &mut grad);
        let mut direction: Vec<Vector3<f64>> = grad.iter().map(|g| -g).collect();
        let mut trial = pos.to_vec();
        let mut trial_grad = vec![Vector3::zeros(); n];

        for iteration in 0..max_iterations {
            let rms = rms_norm(&grad);
            if rms < grad_tolerance {
                return MinimizeResult {
                    energy,
                    iterations: iteration,
                    converged: true,
                };
            }

            let mut slope: f64 = direction.iter().zip(&grad).map(|(d, g)| d.dot(g)).sum();
            if slope >= 0.0 {
                direction.iter_mut().zip(&grad).for_each(|(d, g)| *d = -g);
                slope = -grad.iter().map(|g| g.norm_squared()).sum::<f64>();
            }

            let max_move = direction.iter().map(|d| d.norm()).fold(0.0, f64::max);
            let mut alpha = if max_move > 0.3 { 0.3 / max_move } else { 1.0 };
            let mut accepted = None;
            for _ in 0..30 {
                for i in 0..n {
                    trial[i] = pos[i] + direction[i] * alpha;
                }
                let trial_energy = self.energy_and_gradient(&trial, &mut trial_grad);
                if trial_energy <= energy + 1e-4 * alpha * slope {
                    accepted = Some(trial_energy);
                    break;
                }
                alpha *= 0.5;
            }

            let Some(new_energy) = accepted else {
                return MinimizeResult {
                    energy,
                    iterations: iteration,
                    converged: rms < grad_tolerance * 10.0,
                };
            };

            pos.copy_from_slice(&trial);
            let old_norm: f64 = grad.iter().map(|g| g.norm_squared()).sum();
            let beta = if old_norm > 0.0 {
                let num: f64 = trial_grad
                    .iter()
                    .zip(&grad)
                    .map(|(gn, go)| gn.dot(&(gn - go)))
                    .sum();
                (num / old_norm).max(0.0)
            } else {
                0.0
            };
            for i in 0..n {
                direction[i] = -trial_grad[i] + direction[i] * beta;
            }
            grad.copy_from_slice(&trial_grad);

            let delta = (energy - new_energy).abs();
            energy = new_energy;
            if delta < 1e-12 * (1.0 + energy.abs()) {
                return MinimizeResult {
                    energy,
                    iterations: iteration + 1,
                    converged: true,
                };
            }
        }

        MinimizeResult {
            energy,
            iterations: max_iterations,
            converged: rms_norm(&grad) < grad_tolerance,
        }
    }

    /// Whether every chiral center and marked double bond has the required
    /// handedness or side.
    pub fn stereo_satisfied(&self, pos: &[Point3<f64>]) -> bool {
        let centers_ok = self.chiral.iter().all(|t| {
            let [c, n1, n2, n3] = t.atoms;
            t.sign * signed_volume(pos[c], pos[n1], pos[n2], pos[n3]) > 0.0
        });
        let bonds_ok = self.cis_trans.iter().all(|t| {
            let [r1, a, b, r2] = t.atoms;
            let torsion = dihedral(pos[r1], pos[a], pos[b], pos[r2]).abs();
            match t.config {
                DoubleBondConfig::Cis => torsion < 90.0,
                DoubleBondConfig::Trans => torsion > 90.0,
            }
        });
        centers_ok && bonds_ok
    }

    /// Largest absolute deviation of any 1-3 distance from its target.
    pub fn max_angle_deviation(&self, pos: &[Point3<f64>]) -> f64 {
        self.angles
            .iter()
            .map(|t| ((pos[t.i] - pos[t.j]).norm() - t.target).abs())
            .fold(0.0, f64::max)
    }

    /// Largest absolute deviation of any bond from its ideal length.
    pub fn max_bond_deviation(&self, pos: &[Point3<f64>]) -> f64 {
        self.bonds
            .iter()
            .map(|t| ((pos[t.i] - pos[t.j]).norm() - t.target).abs())
            .fold(0.0, f64::max)
    }
}

fn rms_norm(grad: &[Vector3<f64>]) -> f64 {
    if grad.is_empty() {
        return 0.0;
    }
    (grad.iter().map(|g| g.norm_squared()).sum::<f64>() / (3 * grad.len()) as f64).sqrt()
}

/// `(a - c) · ((b - c) × (d - c))`.
pub fn signed_volume(c: Point3<f64>, a: Point3<f64>, b: Point3<f64>, d: Point3<f64>) -> f64 {
    (a - c).dot(&(b - c).cross(&(d - c)))
}

/// Torsion angle `p0-p1-p2-p3` in degrees, in `(-180, 180]`.
pub fn dihedral(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, p3: Point3<f64>) -> f64 {
    let b0 = p1 - p0;
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let n1 = b0.cross(&b1);
    let n2 = b1.cross(&b2);
    let m = n1.cross(&b1.normalize());
    let x = n1.dot(&n2);
    let y = m.dot(&n2);
    y.atan2(x).to_degrees()
}

/// Interior angle for `a-center-c` when all three atoms sit consecutively in
/// a small ring.
fn ring_angle(rings: &RingInfo, a: usize, center: usize, c: usize, hybrid: Hybridization) -> Option<f64> {
    let ring = rings.rings().iter().find(|ring| {
        let len = ring.len();
        ring.iter().enumerate().any(|(k, &atom)| {
            let prev = ring[(k + len - 1) % len];
            let next = ring[(k + 1) % len];
            atom == center && ((prev == a && next == c) || (prev == c && next == a))
        })
    })?;
    match (ring.len(), hybrid) {
        (3, _) => Some(60.0),
        (4, _) => Some(90.0),
        (5, Hybridization::Sp3) => Some(105.0),
        (5, _) => Some(108.0),
        _ => None,
    }
}

/// Bond-count distance from `start` to every atom; `usize::MAX` when the
/// atom lies in another fragment.
pub fn topological_distances(mol: &Molecule, start: usize) -> Vec<usize> {
    let mut dist = vec![usize::MAX; mol.atom_count()];
    let mut queue = VecDeque::new();
    dist[start] = 0;
    queue.push_back(start);
    while let Some(u) = queue.pop_front() {
        for v in mol.neighbors(u) {
            if dist[v] == usize::MAX {
                dist[v] = dist[u] + 1;
                queue.push_back(v);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::parse_smiles;

    #[test]
    fn hybridization_follows_bond_orders() {
        let mol = parse_smiles("C=CC#N").unwrap();
        assert_eq!(hybridization(&mol, 0), Hybridization::Sp2);
        assert_eq!(hybridization(&mol, 2), Hybridization::Sp);
        let sulfone = parse_smiles("CS(=O)(=O)C").unwrap();
        assert_eq!(hybridization(&sulfone, 1), Hybridization::Sp3);
        let ethane = parse_smiles("CC").unwrap();
        assert_eq!(hybridization(&ethane, 0), Hybridization::Sp3);
    }

    #[test]
    fn multiple_bonds_are_shorter() {
        let mol = parse_smiles("CC=CC#C").unwrap();
        let single = bond_length(&mol, 0);
        let double = bond_length(&mol, 1);
        let triple = bond_length(&mol, 3);
        assert!((single - 1.52).abs() < 1e-9);
        assert!(double < single);
        assert!(triple < double);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let mol = parse_smiles("C=CO").unwrap().with_explicit_hydrogens();
        let ff = ForceField::build(&mol);
        let mut pos: Vec<Point3<f64>> = (0..mol.atom_count())
            .map(|i| {
                let t = i as f64;
                Point3::new(t.cos() * 1.3 + 0.1 * t, t.sin() * 1.1, 0.3 * (t * 0.7).sin())
            })
            .collect();
        let mut grad = vec![Vector3::zeros(); pos.len()];
        ff.energy_and_gradient(&pos, &mut grad);
        let h = 1e-6;
        for atom in [0, 2, 4] {
            for axis in 0..3 {
                let orig = pos[atom][axis];
                pos[atom][axis] = orig + h;
                let plus = ff.energy(&pos);
                pos[atom][axis] = orig - h;
                let minus = ff.energy(&pos);
                pos[atom][axis] = orig;
                let numeric = (plus - minus) / (2.0 * h);
                assert!(
                    (numeric - grad[atom][axis]).abs() < 1e-3 * (1.0 + numeric.abs()),
                    "atom {} axis {}: {} vs {}",
                    atom,
                    axis,
                    numeric,
                    grad[atom][axis]
                );
            }
        }
    }

    #[test]
    fn stereo_terms_have_consistent_gradients() {
        let mol = parse_smiles("F/C=C/[C@@H](Cl)Br").unwrap().with_explicit_hydrogens();
        let ff = ForceField::build(&mol);
        assert_eq!(ff.chiral.len(), 1);
        assert_eq!(ff.cis_trans.len(), 1);
        // A nearly flat start keeps the chiral volume inside its wall.
        let mut pos: Vec<Point3<f64>> = (0..mol.atom_count())
            .map(|i| {
                let t = i as f64;
                Point3::new(1.4 * t.cos() + 0.2 * t, 1.2 * t.sin(), 0.05 * t)
            })
            .collect();
        let mut grad = vec![Vector3::zeros(); pos.len()];
        ff.energy_and_gradient(&pos, &mut grad);
        let h = 1e-6;
        for atom in [0, 3, 4, 8] {
            for axis in 0..3 {
                let orig = pos[atom][axis];
                pos[atom][axis] = orig + h;
                let plus = ff.energy(&pos);
                pos[atom][axis] = orig - h;
                let minus = ff.energy(&pos);
                pos[atom][axis] = orig;
                let numeric = (plus - minus) / (2.0 * h);
                assert!(
                    (numeric - grad[atom][axis]).abs() < 1e-3 * (1.0 + numeric.abs()),
                    "atom {} axis {}: {} vs {}",
                    atom,
                    axis,
                    numeric,
                    grad[atom][axis]
                );
            }
        }
    }

    #[test]
    fn dihedral_and_volume_signs() {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let cis = dihedral(p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0));
        let trans = dihedral(p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, -1.0, 0.0));
        let right = dihedral(p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 1.0));
        assert!(cis.abs() < 1e-9);
        assert!((trans.abs() - 180.0).abs() < 1e-9);
        assert!((right.abs() - 90.0).abs() < 1e-9);

        let o = p(0.0, 0.0, 0.0);
        let v = signed_volume(o, p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0));
        let mirrored = signed_volume(o, p(-1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0));
        assert_eq!(v, 1.0);
        assert_eq!(mirrored, -1.0);
    }

    #[test]
    fn minimize_relaxes_a_stretched_bond() {
        let mol = parse_smiles("[H][H]").unwrap();
        let ff = ForceField::build(&mol);
        let mut pos = vec![Point3::origin(), Point3::new(1.5, 0.0, 0.0)];
        let result = ff.minimize(&mut pos, 200, 1e-6);
        assert!(result.converged);
        assert!(ff.max_bond_deviation(&pos) < 1e-3);
    }

    #[test]
    fn topological_distances_mark_other_fragments() {
        let mol = parse_smiles("CCO.O").unwrap();
        let d = topological_distances(&mol, 0);
        assert_eq!(d[..3], [0, 1, 2]);
        assert_eq!(d[3], usize::MAX);
    }
}
