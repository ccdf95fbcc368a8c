use super::element::Element;

/// Tetrahedral chirality tag as written in a SMILES bracket atom.
///
/// The neighbor order the tag refers to lives on the molecule as a
/// [`TetrahedralCenter`](super::stereo::TetrahedralCenter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// `@` in SMILES.
    CounterClockwise,
    /// `@@` in SMILES.
    Clockwise,
}

/// A single atom of a structural graph.
///
/// Hydrogens are usually implicit (`implicit_hydrogens`); they only become
/// explicit atoms when a 3D conformer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number, or 0 for natural abundance.
    pub isotope: u16,
    /// Number of attached hydrogens that are not present as graph nodes.
    pub implicit_hydrogens: u8,
    /// Whether the atom was written as part of an aromatic system.
    pub aromatic: bool,
    /// Chirality tag carried over from the input notation.
    pub chirality: Chirality,
    /// Whether the hydrogen count was fixed by the input (bracket atom or InChI layer).
    pub hydrogens_fixed: bool,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom without hydrogens.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: 0,
            implicit_hydrogens: 0,
            aromatic: false,
            chirality: Chirality::None,
            hydrogens_fixed: false,
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.implicit_hydrogens = count;
        self.hydrogens_fixed = true;
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_is_neutral_and_bare() {
        let atom = Atom::new(Element::N);
        assert_eq!(atom.element, Element::N);
        assert_eq!(atom.formal_charge, 0);
        assert_eq!(atom.isotope, 0);
        assert_eq!(atom.implicit_hydrogens, 0);
        assert!(!atom.aromatic);
        assert_eq!(atom.chirality, Chirality::None);
        assert!(!atom.hydrogens_fixed);
    }

    #[test]
    fn builder_methods_set_charge_and_fixed_hydrogens() {
        let atom = Atom::new(Element::N).with_charge(1).with_hydrogens(4);
        assert_eq!(atom.formal_charge, 1);
        assert_eq!(atom.implicit_hydrogens, 4);
        assert!(atom.hydrogens_fixed);
    }

    #[test]
    fn is_hydrogen_only_for_hydrogen() {
        assert!(Atom::new(Element::H).is_hydrogen());
        assert!(!Atom::new(Element::He).is_hydrogen());
    }
}
