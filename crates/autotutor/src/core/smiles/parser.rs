use super::error::SmilesError;
use super::tokenizer::{AtomToken, BondToken, Token, tokenize};
use crate::core::models::atom::{Atom, Chirality};
use crate::core::models::molecule::Molecule;
use crate::core::models::stereo::{
    DoubleBondConfig, DoubleBondStereo, StereoNeighbor, TetrahedralCenter,
};
use crate::core::models::topology::BondOrder;
use crate::core::perception::{kekulize, valence};
use std::collections::BTreeMap;

struct OpenRing {
    atom: usize,
    bond: Option<BondToken>,
    pos: usize,
    /// Neighbor slot reserved on `atom` until the ring closes.
    slot: usize,
}

/// Stereo marks gathered while the graph is built.
#[derive(Default)]
struct StereoMarks {
    /// Neighbors of each atom in written order; `None` is a ring bond that
    /// has not closed yet.
    order: Vec<Vec<Option<StereoNeighbor>>>,
    /// `/` and `\` bonds as `(written before, written after, symbol)`.
    directed: Vec<(usize, usize, BondToken)>,
}

impl StereoMarks {
    fn link(&mut self, from: usize, to: usize, bond: Option<BondToken>) {
        self.order[from].push(Some(StereoNeighbor::Atom(to)));
        self.order[to].push(Some(StereoNeighbor::Atom(from)));
        self.mark(from, to, bond);
    }

    fn mark(&mut self, from: usize, to: usize, bond: Option<BondToken>) {
        if let Some(dir @ (BondToken::Up | BondToken::Down)) = bond {
            self.directed.push((from, to, dir));
        }
    }

    /// The substituent of `center` (other than `partner`) carrying a
    /// directional bond, and whether it sits on the `/` side when read
    /// outward from `center`.
    fn direction_from(&self, center: usize, partner: usize) -> Option<(usize, bool)> {
        self.directed.iter().find_map(|&(from, to, dir)| {
            if from == center && to != partner {
                Some((to, dir == BondToken::Up))
            } else if to == center && from != partner {
                Some((from, dir == BondToken::Down))
            } else {
                None
            }
        })
    }

    fn apply(&self, mol: &mut Molecule) {
        for (idx, order) in self.order.iter().enumerate() {
            if mol.atom(idx).chirality == Chirality::None || order.len() != 4 {
                continue;
            }
            let mut neighbors = [StereoNeighbor::ImplicitHydrogen; 4];
            let complete = neighbors
                .iter_mut()
                .zip(order)
                .all(|(slot, n)| n.map(|n| *slot = n).is_some());
            if complete {
                mol.add_tetrahedral_center(TetrahedralCenter {
                    center: idx,
                    neighbors,
                    chirality: mol.atom(idx).chirality,
                });
            }
        }

        let double_bonds: Vec<(usize, usize)> = mol
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .filter(|b| !mol.atom(b.atom1).aromatic && !mol.atom(b.atom2).aromatic)
            .map(|b| (b.atom1, b.atom2))
            .collect();
        for (begin, end) in double_bonds {
            let (Some((ref1, up1)), Some((ref2, up2))) = (
                self.direction_from(begin, end),
                self.direction_from(end, begin),
            ) else {
                continue;
            };
            if ref1 == ref2 {
                continue;
            }
            let config = if up1 == up2 {
                DoubleBondConfig::Cis
            } else {
                DoubleBondConfig::Trans
            };
            mol.add_double_bond_stereo(DoubleBondStereo {
                atoms: [ref1, begin, end, ref2],
                config,
            });
        }
    }
}

/// Reads a SMILES string into a Kekulé-form structural graph with implicit
/// hydrogens assigned and valences checked.
pub fn parse_smiles(input: &str) -> Result<Molecule, SmilesError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenize(input)?;
    let (mut mol, stereo) = build_graph(&tokens)?;
    valence::assign_implicit_hydrogens(&mut mol);
    kekulize::kekulize(&mut mol)?;
    valence::check_valences(&mol)?;
    stereo.apply(&mut mol);
    Ok(mol)
}

fn build_graph(tokens: &[Token]) -> Result<(Molecule, StereoMarks), SmilesError> {
    let mut mol = Molecule::new();
    let mut stereo = StereoMarks::default();
    let mut prev: Option<usize> = None;
    let mut pending: Option<(BondToken, usize)> = None;
    let mut branches: Vec<(Option<usize>, usize)> = Vec::new();
    let mut rings: BTreeMap<u16, OpenRing> = BTreeMap::new();
    let mut last_was_open = false;

    for token in tokens {
        let opening = matches!(token, Token::OpenBranch(_));
        match token {
            Token::Atom(atom_token) => {
                let idx = mol.add_atom(atom_from_token(atom_token));
                stereo.order.push(Vec::new());
                if let Some(p) = prev {
                    let bond = pending.map(|(b, _)| b);
                    let order = resolve_order(bond, &mol, p, idx);
                    // The atom was just added, so the pair cannot already be bonded.
                    let _ = mol.add_bond(p, idx, order);
                    stereo.link(p, idx, bond);
                } else if let Some((_, pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos });
                }
                if atom_token.chirality != Chirality::None && atom_token.hydrogens == Some(1) {
                    stereo.order[idx].push(Some(StereoNeighbor::ImplicitHydrogen));
                }
                pending = None;
                prev = Some(idx);
            }
            Token::Bond { bond, pos } => {
                if prev.is_none() || pending.is_some() {
                    return Err(SmilesError::DanglingBond { pos: *pos });
                }
                pending = Some((*bond, *pos));
            }
            Token::RingClosure { digit, pos } => {
                let Some(current) = prev else {
                    return Err(SmilesError::InvalidRingBond { digit: *digit, pos: *pos });
                };
                let bond = pending.take().map(|(b, _)| b);
                match rings.remove(digit) {
                    Some(open) => {
                        if open.atom == current {
                            return Err(SmilesError::InvalidRingBond { digit: *digit, pos: *pos });
                        }
                        let chosen = match (open.bond, bond) {
                            (Some(a), Some(b)) if a != b && !is_directional_pair(a, b) => {
                                return Err(SmilesError::RingBondConflict { digit: *digit });
                            }
                            (a, b) => a.or(b),
                        };
                        let order = resolve_order(chosen, &mol, open.atom, current);
                        mol.add_bond(open.atom, current, order).map_err(|_| {
                            SmilesError::InvalidRingBond { digit: *digit, pos: open.pos }
                        })?;
                        stereo.order[open.atom][open.slot] = Some(StereoNeighbor::Atom(current));
                        stereo.order[current].push(Some(StereoNeighbor::Atom(open.atom)));
                        stereo.mark(open.atom, current, open.bond);
                        stereo.mark(current, open.atom, bond);
                    }
                    None => {
                        let slot = stereo.order[current].len();
                        stereo.order[current].push(None);
                        rings.insert(
                            *digit,
                            OpenRing {
                                atom: current,
                                bond,
                                pos: *pos,
                                slot,
                            },
                        );
                    }
                }
            }
            Token::OpenBranch(pos) => {
                if prev.is_none() || last_was_open {
                    return Err(SmilesError::UnmatchedParen { pos: *pos });
                }
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                branches.push((prev, *pos));
            }
            Token::CloseBranch(pos) => {
                if last_was_open {
                    return Err(SmilesError::UnmatchedParen { pos: *pos });
                }
                if let Some((_, bond_pos)) = pending {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                let (restored, _) = branches
                    .pop()
                    .ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                prev = restored;
            }
            Token::Dot(pos) => {
                if pending.is_some() || prev.is_none() {
                    return Err(SmilesError::UnexpectedChar { pos: *pos, ch: '.' });
                }
                prev = None;
            }
        }
        last_was_open = opening;
    }

    if let Some((_, pos)) = pending {
        return Err(SmilesError::DanglingBond { pos });
    }
    if let Some(&(_, pos)) = branches.last() {
        return Err(SmilesError::UnmatchedParen { pos });
    }
    if let Some((&digit, _)) = rings.iter().next() {
        return Err(SmilesError::UnclosedRing { digit });
    }
    if mol.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    Ok((mol, stereo))
}

fn atom_from_token(token: &AtomToken) -> Atom {
    let mut atom = Atom::new(token.element).with_charge(token.charge);
    atom.isotope = token.isotope;
    atom.aromatic = token.aromatic;
    atom.chirality = token.chirality;
    if let Some(h) = token.hydrogens {
        atom = atom.with_hydrogens(h);
    }
    atom
}

fn is_directional_pair(a: BondToken, b: BondToken) -> bool {
    matches!(
        (a, b),
        (BondToken::Up | BondToken::Down, BondToken::Up | BondToken::Down)
    )
}

fn resolve_order(bond: Option<BondToken>, mol: &Molecule, a: usize, b: usize) -> BondOrder {
    match bond {
        Some(BondToken::Single | BondToken::Up | BondToken::Down) => BondOrder::Single,
        Some(BondToken::Double) => BondOrder::Double,
        Some(BondToken::Triple) => BondOrder::Triple,
        Some(BondToken::Aromatic) => BondOrder::Aromatic,
        None if mol.atom(a).aromatic && mol.atom(b).aromatic => BondOrder::Aromatic,
        None => BondOrder::Single,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;

    fn count_order(mol: &Molecule, order: BondOrder) -> usize {
        mol.bonds().iter().filter(|b| b.order == order).count()
    }

    #[test]
    fn ethanol_has_expected_hydrogens() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.atom(0).implicit_hydrogens, 3);
        assert_eq!(mol.atom(1).implicit_hydrogens, 2);
        assert_eq!(mol.atom(2).implicit_hydrogens, 1);
    }

    #[test]
    fn branches_and_explicit_bonds() {
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.bond(mol.bond_between(1, 2).unwrap()).order, BondOrder::Double);
        assert_eq!(mol.bond(mol.bond_between(1, 3).unwrap()).order, BondOrder::Single);
        assert_eq!(mol.atom(3).implicit_hydrogens, 1);
    }

    #[test]
    fn enyne_from_teaching_example() {
        let mol = parse_smiles("C=CC(C)C(Br)CC#C").unwrap();
        assert_eq!(mol.heavy_atom_count(), 9);
        assert_eq!(count_order(&mol, BondOrder::Double), 1);
        assert_eq!(count_order(&mol, BondOrder::Triple), 1);
        let hydrogens: u32 = (0..mol.atom_count()).map(|i| mol.total_hydrogens(i)).sum();
        assert_eq!(hydrogens, 11);
    }

    #[test]
    fn aromatic_rings_are_kekulized() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(count_order(&mol, BondOrder::Double), 3);
        assert!(!mol.has_aromatic_bonds());
        assert!(mol.atoms().iter().all(|a| a.implicit_hydrogens == 1));

        let pyridine = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(pyridine.atom(3).element, Element::N);
        assert_eq!(pyridine.atom(3).implicit_hydrogens, 0);

        let indole = parse_smiles("c1ccc2[nH]ccc2c1").unwrap();
        assert_eq!(count_order(&indole, BondOrder::Double), 4);
    }

    #[test]
    fn ring_closures_with_percent_and_bond_symbols() {
        let mol = parse_smiles("C%10CCCCC%10").unwrap();
        assert_eq!(mol.ring_count(), 1);
        let cyclohexene = parse_smiles("C1CCCCC=1").unwrap();
        assert_eq!(count_order(&cyclohexene, BondOrder::Double), 1);
    }

    #[test]
    fn disconnected_salt_keeps_charges() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.component_count(), 2);
        assert_eq!(mol.net_charge(), 0);
        assert_eq!(mol.atom(1).implicit_hydrogens, 0);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert_eq!(parse_smiles("   "), Err(SmilesError::EmptyInput));
        assert!(matches!(parse_smiles("C(((("), Err(SmilesError::UnmatchedParen { .. })));
        assert!(matches!(parse_smiles("CC)"), Err(SmilesError::UnmatchedParen { pos: 2 })));
        assert!(matches!(parse_smiles("C1CC"), Err(SmilesError::UnclosedRing { digit: 1 })));
        assert!(matches!(parse_smiles("CC="), Err(SmilesError::DanglingBond { pos: 2 })));
        assert!(matches!(parse_smiles("C=1CCC#1"), Err(SmilesError::RingBondConflict { digit: 1 })));
        assert!(matches!(parse_smiles("C11"), Err(SmilesError::InvalidRingBond { digit: 1, .. })));
    }

    #[test]
    fn chiral_centers_record_written_neighbor_order() {
        let mol = parse_smiles("C[C@@H](O)C(=O)O").unwrap();
        let centers = mol.tetrahedral_centers();
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].center, 1);
        assert_eq!(centers[0].chirality, Chirality::Clockwise);
        assert_eq!(
            centers[0].neighbors,
            [
                StereoNeighbor::Atom(0),
                StereoNeighbor::ImplicitHydrogen,
                StereoNeighbor::Atom(2),
                StereoNeighbor::Atom(3),
            ]
        );

        let leading_h = parse_smiles("[C@H](F)(Cl)Br").unwrap();
        assert_eq!(
            leading_h.tetrahedral_centers()[0].neighbors[0],
            StereoNeighbor::ImplicitHydrogen
        );
    }

    #[test]
    fn ring_bond_neighbors_keep_the_position_of_their_digit() {
        // The ring digit on atom 1 comes before its branch and chain atoms.
        let mol = parse_smiles("F[C@]1(Cl)CCO1").unwrap();
        assert_eq!(
            mol.tetrahedral_centers()[0].neighbors,
            [
                StereoNeighbor::Atom(0),
                StereoNeighbor::Atom(5),
                StereoNeighbor::Atom(2),
                StereoNeighbor::Atom(3),
            ]
        );
    }

    #[test]
    fn directional_bonds_set_double_bond_configuration() {
        let trans = parse_smiles("C/C=C/C").unwrap();
        assert_eq!(
            trans.double_bond_stereo(),
            &[DoubleBondStereo {
                atoms: [0, 1, 2, 3],
                config: DoubleBondConfig::Trans,
            }]
        );
        let cis = parse_smiles("C/C=C\\C").unwrap();
        assert_eq!(cis.double_bond_stereo()[0].config, DoubleBondConfig::Cis);

        let branched = parse_smiles("C(\\F)=C/F").unwrap();
        assert_eq!(branched.double_bond_stereo()[0].config, DoubleBondConfig::Trans);
        assert_eq!(branched.double_bond_stereo()[0].atoms, [1, 0, 2, 3]);

        assert!(parse_smiles("CC=CC").unwrap().double_bond_stereo().is_empty());
        assert!(parse_smiles("CC(C)=CC").unwrap().double_bond_stereo().is_empty());
    }

    #[test]
    fn chemically_invalid_inputs_are_rejected() {
        assert!(matches!(
            parse_smiles("C(C)(C)(C)(C)C"),
            Err(SmilesError::Valence(_))
        ));
        assert!(matches!(
            parse_smiles("c1cccc1"),
            Err(SmilesError::Kekulize(_))
        ));
    }
}
