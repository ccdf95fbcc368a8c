use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Atom {atom} ({element}) has valence {valence}, allowed at most {max_allowed}")]
pub struct ValenceError {
    pub atom: usize,
    pub element: Element,
    pub valence: u8,
    pub max_allowed: u8,
}

/// Fills in implicit hydrogen counts for atoms whose count was not fixed by
/// the input notation.
///
/// The count brings the atom up to the smallest allowed valence that is not
/// below its bond-order sum. Aromatic atoms keep one valence in reserve for
/// the pi system, which kekulization later turns into a double bond.
pub fn assign_implicit_hydrogens(mol: &mut Molecule) {
    for idx in 0..mol.atom_count() {
        let atom = mol.atom(idx);
        if atom.hydrogens_fixed {
            continue;
        }
        let allowed = atom.element.valences_with_charge(atom.formal_charge);
        let bond_sum = mol.bond_valence_sum(idx);
        let mut hydrogens = allowed
            .iter()
            .copied()
            .find(|&v| v >= bond_sum)
            .map_or(0, |target| target - bond_sum);
        if atom.aromatic && hydrogens > 0 {
            hydrogens -= 1;
        }
        mol.atom_mut(idx).implicit_hydrogens = hydrogens;
    }
}

/// Number of implicit hydrogens an unbracketed atom would receive with its
/// current (non-aromatic) bonds.
pub fn default_hydrogen_count(mol: &Molecule, idx: usize) -> Option<u8> {
    let atom = mol.atom(idx);
    let bond_sum = mol.bond_valence_sum(idx);
    atom.element
        .default_valences()
        .iter()
        .copied()
        .find(|&v| v >= bond_sum)
        .map(|target| target - bond_sum)
}

/// Rejects atoms whose total valence exceeds the largest valence allowed for
/// their element and charge. Elements without a valence model are skipped.
///
/// Valences below the allowed set are tolerated; they describe radicals or
/// explicitly under-saturated bracket atoms.
pub fn check_valences(mol: &Molecule) -> Result<(), ValenceError> {
    for (idx, atom) in mol.atoms().iter().enumerate() {
        let allowed = atom.element.valences_with_charge(atom.formal_charge);
        let Some(&max_allowed) = allowed.iter().max() else {
            continue;
        };
        let valence = mol.total_valence(idx);
        if valence > max_allowed {
            return Err(ValenceError {
                atom: idx,
                element: atom.element,
                valence,
                max_allowed,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::BondOrder;

    #[test]
    fn fills_hydrogens_to_smallest_valence() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        let s = mol.add_atom(Atom::new(Element::S));
        mol.add_bond(c, o, BondOrder::Double).unwrap();
        mol.add_bond(c, s, BondOrder::Single).unwrap();
        assign_implicit_hydrogens(&mut mol);
        assert_eq!(mol.atom(c).implicit_hydrogens, 1);
        assert_eq!(mol.atom(o).implicit_hydrogens, 0);
        assert_eq!(mol.atom(s).implicit_hydrogens, 1);
    }

    #[test]
    fn fixed_counts_are_left_alone() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C).with_hydrogens(2));
        assign_implicit_hydrogens(&mut mol);
        assert_eq!(mol.atom(0).implicit_hydrogens, 2);
    }

    #[test]
    fn aromatic_atoms_reserve_one_valence() {
        let mut mol = Molecule::new();
        let mut c = Atom::new(Element::C);
        c.aromatic = true;
        let a = mol.add_atom(c.clone());
        let b = mol.add_atom(c);
        mol.add_bond(a, b, BondOrder::Aromatic).unwrap();
        assign_implicit_hydrogens(&mut mol);
        assert_eq!(mol.atom(a).implicit_hydrogens, 2);
    }

    #[test]
    fn pentavalent_carbon_is_rejected() {
        let mut mol = Molecule::new();
        let center = mol.add_atom(Atom::new(Element::C));
        for _ in 0..5 {
            let n = mol.add_atom(Atom::new(Element::C));
            mol.add_bond(center, n, BondOrder::Single).unwrap();
        }
        assign_implicit_hydrogens(&mut mol);
        let err = check_valences(&mol).unwrap_err();
        assert_eq!(err.atom, center);
        assert_eq!(err.valence, 5);
        assert_eq!(err.max_allowed, 4);
    }

    #[test]
    fn ammonium_is_accepted() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::N).with_charge(1).with_hydrogens(4));
        assert!(check_valences(&mol).is_ok());
    }
}
