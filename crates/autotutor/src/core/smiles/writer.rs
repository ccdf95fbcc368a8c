use crate::core::models::atom::{Atom, Chirality};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::perception::valence::default_hydrogen_count;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Writes a Kekulé SMILES string for a structural graph.
///
/// Components are written in order of their lowest atom index, separated by
/// `.`. Atoms that cannot be expressed in the organic subset (charges,
/// isotopes, unusual hydrogen counts) are written as bracket atoms.
pub fn write_smiles(mol: &Molecule) -> String {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut children: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut ring_bonds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ring_seen: BTreeSet<usize> = BTreeSet::new();
    let mut roots = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        roots.push(start);
        plan(mol, start, None, &mut visited, &mut children, &mut ring_bonds, &mut ring_seen);
    }

    let mut out = String::new();
    let mut digits = RingDigits::default();
    for (i, &root) in roots.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        emit(mol, root, &children, &ring_bonds, &mut digits, &mut out);
    }
    out
}

fn plan(
    mol: &Molecule,
    atom: usize,
    parent_bond: Option<usize>,
    visited: &mut [bool],
    children: &mut [Vec<(usize, usize)>],
    ring_bonds: &mut [Vec<usize>],
    ring_seen: &mut BTreeSet<usize>,
) {
    visited[atom] = true;
    for (neighbor, bond) in mol.neighbor_bonds(atom) {
        if Some(bond) == parent_bond {
            continue;
        }
        if visited[neighbor] {
            if ring_seen.insert(bond) {
                ring_bonds[neighbor].push(bond);
                ring_bonds[atom].push(bond);
            }
            continue;
        }
        children[atom].push((neighbor, bond));
        plan(mol, neighbor, Some(bond), visited, children, ring_bonds, ring_seen);
    }
}

#[derive(Default)]
struct RingDigits {
    open: Vec<(usize, u16)>,
}

impl RingDigits {
    fn take_or_open(&mut self, bond: usize) -> (u16, bool) {
        if let Some(pos) = self.open.iter().position(|&(b, _)| b == bond) {
            let (_, digit) = self.open.remove(pos);
            return (digit, false);
        }
        let mut digit = 1;
        while self.open.iter().any(|&(_, d)| d == digit) {
            digit += 1;
        }
        self.open.push((bond, digit));
        (digit, true)
    }
}

fn emit(
    mol: &Molecule,
    atom: usize,
    children: &[Vec<(usize, usize)>],
    ring_bonds: &[Vec<usize>],
    digits: &mut RingDigits,
    out: &mut String,
) {
    write_atom(mol, atom, out);
    for &bond in &ring_bonds[atom] {
        let (digit, opening) = digits.take_or_open(bond);
        if !opening {
            out.push_str(bond_symbol(mol.bond(bond).order));
        }
        if digit < 10 {
            let _ = write!(out, "{}", digit);
        } else {
            let _ = write!(out, "%{:02}", digit);
        }
    }
    let kids = &children[atom];
    for (i, &(child, bond)) in kids.iter().enumerate() {
        let branch = i + 1 < kids.len();
        if branch {
            out.push('(');
        }
        out.push_str(bond_symbol(mol.bond(bond).order));
        emit(mol, child, children, ring_bonds, digits, out);
        if branch {
            out.push(')');
        }
    }
}

fn bond_symbol(order: BondOrder) -> &'static str {
    match order {
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic => ":",
    }
}

fn write_atom(mol: &Molecule, idx: usize, out: &mut String) {
    let atom = mol.atom(idx);
    if can_write_bare(mol, idx, atom) {
        out.push_str(atom.element.symbol());
        return;
    }
    out.push('[');
    if atom.isotope > 0 {
        let _ = write!(out, "{}", atom.isotope);
    }
    out.push_str(atom.element.symbol());
    match atom.chirality {
        Chirality::None => {}
        Chirality::CounterClockwise => out.push('@'),
        Chirality::Clockwise => out.push_str("@@"),
    }
    match atom.implicit_hydrogens {
        0 => {}
        1 => out.push('H'),
        h => {
            let _ = write!(out, "H{}", h);
        }
    }
    match atom.formal_charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => {
            let _ = write!(out, "+{}", c);
        }
        c => {
            let _ = write!(out, "-{}", -c);
        }
    }
    out.push(']');
}

fn can_write_bare(mol: &Molecule, idx: usize, atom: &Atom) -> bool {
    atom.element.is_organic_subset()
        && atom.formal_charge == 0
        && atom.isotope == 0
        && atom.chirality == Chirality::None
        && default_hydrogen_count(mol, idx) == Some(atom.implicit_hydrogens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::parse_smiles;

    fn rewrite(smiles: &str) -> String {
        write_smiles(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn writes_chains_and_branches() {
        assert_eq!(rewrite("CCO"), "CCO");
        assert_eq!(rewrite("CC(=O)O"), "CC(=O)O");
        assert_eq!(rewrite("C=CC(C)C(Br)CC#C"), "C=CC(C)C(Br)CC#C");
    }

    #[test]
    fn writes_ring_closures() {
        assert_eq!(rewrite("C1CCCCC1"), "C1CCCCC1");
    }

    #[test]
    fn writes_bracket_atoms_for_charges_and_components() {
        assert_eq!(rewrite("[Na+].[Cl-]"), "[Na+].[Cl-]");
        assert_eq!(rewrite("C[N+](C)(C)C"), "C[N+](C)(C)C");
        assert_eq!(rewrite("[CH3]"), "[CH3]");
    }

    #[test]
    fn written_smiles_reads_back_to_the_same_formula() {
        use crate::core::models::formula::MolecularFormula;
        for smiles in ["c1ccccc1", "c1ccc2[nH]ccc2c1", "OC(=O)c1ccccc1O", "C1CC2CCC1C2"] {
            let original = parse_smiles(smiles).unwrap();
            let reread = parse_smiles(&write_smiles(&original)).unwrap();
            assert_eq!(
                MolecularFormula::from_molecule(&original),
                MolecularFormula::from_molecule(&reread),
                "{}",
                smiles
            );
            assert_eq!(original.ring_count(), reread.ring_count());
        }
    }
}
