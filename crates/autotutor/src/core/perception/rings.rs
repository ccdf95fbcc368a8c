use crate::core::models::molecule::Molecule;
use std::collections::{BTreeSet, VecDeque};

/// Ring perception over a structural graph.
///
/// Every ring bond contributes the shortest cycle passing through it, which
/// yields the relevant small rings used by layout and depiction. Each ring
/// is stored as an ordered atom path.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    rings: Vec<Vec<usize>>,
    ring_bond: Vec<bool>,
}

impl RingInfo {
    pub fn perceive(mol: &Molecule) -> Self {
        let mut rings: Vec<Vec<usize>> = Vec::new();
        let mut seen: BTreeSet<Vec<usize>> = BTreeSet::new();
        let mut ring_bond = vec![false; mol.bond_count()];

        for (b, bond) in mol.bonds().iter().enumerate() {
            let Some(path) = shortest_path_avoiding(mol, bond.atom2, bond.atom1, b) else {
                continue;
            };
            ring_bond[b] = true;
            let mut key = path.clone();
            key.sort_unstable();
            if seen.insert(key) {
                rings.push(path);
            }
        }
        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Self { rings, ring_bond }
    }

    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.ring_bond.get(bond).copied().unwrap_or(false)
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.rings.iter().any(|r| r.contains(&atom))
    }

    /// Smallest ring that contains both atoms of a bond.
    pub fn smallest_ring_with(&self, atom1: usize, atom2: usize) -> Option<&[usize]> {
        self.rings
            .iter()
            .find(|r| r.contains(&atom1) && r.contains(&atom2))
            .map(Vec::as_slice)
    }
}

/// Breadth-first path from `from` to `to` that does not use `skip_bond`.
/// The returned path starts at `from` and ends at `to`.
fn shortest_path_avoiding(
    mol: &Molecule,
    from: usize,
    to: usize,
    skip_bond: usize,
) -> Option<Vec<usize>> {
    let mut prev = vec![usize::MAX; mol.atom_count()];
    let mut queue = VecDeque::new();
    prev[from] = from;
    queue.push_back(from);
    while let Some(u) = queue.pop_front() {
        if u == to {
            let mut path = vec![to];
            let mut cur = to;
            while cur != from {
                cur = prev[cur];
                path.push(cur);
            }
            path.reverse();
            return Some(path);
        }
        for (v, b) in mol.neighbor_bonds(u) {
            if b == skip_bond || prev[v] != usize::MAX {
                continue;
            }
            prev[v] = u;
            queue.push_back(v);
        }
    }
    None
}
