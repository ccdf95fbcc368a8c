use super::atom::Atom;
use super::element::Element;
use super::stereo::{DoubleBondStereo, StereoNeighbor, TetrahedralCenter};
use super::topology::{Bond, BondOrder};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom index {0} is out of range")]
    AtomOutOfRange(usize),
    #[error("An atom cannot be bonded to itself (atom {0})")]
    SelfBond(usize),
    #[error("Atoms {0} and {1} are already bonded")]
    DuplicateBond(usize, usize),
}

/// An undirected structural graph: atoms as nodes, bonds as edges.
///
/// Atom and bond indices are stable for the lifetime of the value; atoms are
/// only ever appended. The adjacency list is maintained alongside the bond
/// list so neighbor queries are constant time per neighbor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
    tetrahedral: Vec<TetrahedralCenter>,
    double_bonds: Vec<DoubleBondStereo>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond between two existing atoms and returns its index.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range, the atoms are identical, or the
    /// pair is already bonded.
    pub fn add_bond(
        &mut self,
        atom1: usize,
        atom2: usize,
        order: BondOrder,
    ) -> Result<usize, MoleculeError> {
        for idx in [atom1, atom2] {
            if idx >= self.atoms.len() {
                return Err(MoleculeError::AtomOutOfRange(idx));
            }
        }
        if atom1 == atom2 {
            return Err(MoleculeError::SelfBond(atom1));
        }
        if self.bond_between(atom1, atom2).is_some() {
            return Err(MoleculeError::DuplicateBond(atom1, atom2));
        }
        let bond_idx = self.bonds.len();
        self.bonds.push(Bond::new(atom1, atom2, order));
        self.adjacency[atom1].push((atom2, bond_idx));
        self.adjacency[atom2].push((atom1, bond_idx));
        Ok(bond_idx)
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn atom_mut(&mut self, idx: usize) -> &mut Atom {
        &mut self.atoms[idx]
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bond(&self, idx: usize) -> &Bond {
        &self.bonds[idx]
    }

    pub fn bond_mut(&mut self, idx: usize) -> &mut Bond {
        &mut self.bonds[idx]
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[idx].iter().map(|&(n, _)| n)
    }

    /// Iterates `(neighbor, bond index)` pairs of an atom.
    pub fn neighbor_bonds(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency[idx].iter().copied()
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    pub fn bond_between(&self, atom1: usize, atom2: usize) -> Option<usize> {
        self.adjacency
            .get(atom1)?
            .iter()
            .find(|&&(n, _)| n == atom2)
            .map(|&(_, b)| b)
    }

    pub fn add_tetrahedral_center(&mut self, center: TetrahedralCenter) {
        self.tetrahedral.push(center);
    }

    pub fn tetrahedral_centers(&self) -> &[TetrahedralCenter] {
        &self.tetrahedral
    }

    pub fn add_double_bond_stereo(&mut self, stereo: DoubleBondStereo) {
        self.double_bonds.push(stereo);
    }

    pub fn double_bond_stereo(&self) -> &[DoubleBondStereo] {
        &self.double_bonds
    }

    /// Sum of the valence contributions of all bonds at an atom.
    pub fn bond_valence_sum(&self, idx: usize) -> u8 {
        self.adjacency[idx]
            .iter()
            .map(|&(_, b)| self.bonds[b].order.valence())
            .sum()
    }

    /// Total valence: bond contributions plus implicit hydrogens.
    pub fn total_valence(&self, idx: usize) -> u8 {
        self.bond_valence_sum(idx) + self.atoms[idx].implicit_hydrogens
    }

    /// Implicit plus explicit (graph node) hydrogens attached to an atom.
    pub fn total_hydrogens(&self, idx: usize) -> u32 {
        let explicit = self
            .neighbors(idx)
            .filter(|&n| self.atoms[n].is_hydrogen())
            .count() as u32;
        self.atoms[idx].implicit_hydrogens as u32 + explicit
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    pub fn net_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    pub fn has_aromatic_bonds(&self) -> bool {
        self.bonds.iter().any(|b| b.order == BondOrder::Aromatic)
    }

    /// Labels every atom with the index of its connected component.
    pub fn component_labels(&self) -> (Vec<usize>, usize) {
        let mut labels = vec![usize::MAX; self.atoms.len()];
        let mut count = 0;
        for start in 0..self.atoms.len() {
            if labels[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![start];
            labels[start] = count;
            while let Some(v) = stack.pop() {
                for w in self.neighbors(v) {
                    if labels[w] == usize::MAX {
                        labels[w] = count;
                        stack.push(w);
                    }
                }
            }
            count += 1;
        }
        (labels, count)
    }

    pub fn component_count(&self) -> usize {
        self.component_labels().1
    }

    /// Number of independent rings (cyclomatic number, equal to the SSSR size).
    pub fn ring_count(&self) -> usize {
        (self.bonds.len() + self.component_count()).saturating_sub(self.atoms.len())
    }

    /// Returns a copy in which every implicit hydrogen is an explicit atom.
    ///
    /// Existing atoms keep their indices; new hydrogens are appended in the
    /// order of their parent atoms. A stereo center's implicit hydrogen
    /// becomes the first hydrogen appended for it.
    pub fn with_explicit_hydrogens(&self) -> Molecule {
        let mut expanded = self.clone();
        for parent in 0..self.atoms.len() {
            let count = expanded.atoms[parent].implicit_hydrogens;
            expanded.atoms[parent].implicit_hydrogens = 0;
            for k in 0..count {
                let h = expanded.add_atom(Atom::new(Element::H));
                // Both indices were just validated by construction.
                let _ = expanded.add_bond(parent, h, BondOrder::Single);
                if k == 0 {
                    for center in expanded.tetrahedral.iter_mut().filter(|c| c.center == parent) {
                        for n in center.neighbors.iter_mut() {
                            if *n == StereoNeighbor::ImplicitHydrogen {
                                *n = StereoNeighbor::Atom(h);
                            }
                        }
                    }
                }
            }
        }
        expanded
    }

    /// Returns the heavy-atom subgraph with explicit hydrogens folded back
    /// into implicit counts, plus a map from old to new indices.
    pub fn without_explicit_hydrogens(&self) -> (Molecule, Vec<Option<usize>>) {
        let mut stripped = Molecule::new();
        let mut map = vec![None; self.atoms.len()];
        for (idx, atom) in self.atoms.iter().enumerate() {
            let keep = !atom.is_hydrogen()
                || atom.isotope != 0
                || self.degree(idx) != 1
                || self.neighbors(idx).any(|n| self.atoms[n].is_hydrogen());
            if keep {
                map[idx] = Some(stripped.add_atom(atom.clone()));
            }
        }
        for bond in &self.bonds {
            match (map[bond.atom1], map[bond.atom2]) {
                (Some(a), Some(b)) => {
                    let _ = stripped.add_bond(a, b, bond.order);
                }
                (Some(a), None) => stripped.atoms[a].implicit_hydrogens += 1,
                (None, Some(b)) => stripped.atoms[b].implicit_hydrogens += 1,
                (None, None) => {}
            }
        }
        for center in &self.tetrahedral {
            let Some(new_center) = map[center.center] else {
                continue;
            };
            let mut neighbors = center.neighbors;
            for n in neighbors.iter_mut() {
                if let StereoNeighbor::Atom(a) = *n {
                    *n = map[a].map_or(StereoNeighbor::ImplicitHydrogen, StereoNeighbor::Atom);
                }
            }
            let implicit = neighbors
                .iter()
                .filter(|n| **n == StereoNeighbor::ImplicitHydrogen)
                .count();
            if implicit <= 1 {
                stripped.tetrahedral.push(TetrahedralCenter {
                    center: new_center,
                    neighbors,
                    chirality: center.chirality,
                });
            }
        }
        for stereo in &self.double_bonds {
            let mut atoms = [0; 4];
            let mapped = atoms
                .iter_mut()
                .zip(stereo.atoms)
                .all(|(slot, a)| map[a].map(|m| *slot = m).is_some());
            if mapped {
                stripped.double_bonds.push(DoubleBondStereo {
                    atoms,
                    config: stereo.config,
                });
            }
        }
        (stripped, map)
    }
}
