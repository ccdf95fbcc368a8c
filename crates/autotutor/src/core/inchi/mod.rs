//! InChI reading.
//!
//! Standard (`InChI=1S/`) and non-standard (`InChI=1/`) identifiers are read
//! layer by layer: formula, connections `/c`, hydrogens `/h`, charge `/q`
//! and protonation `/p`. Stereo, isotope and fixed-H layers are accepted and
//! skipped. InChI carries no bond orders, so they are reconstructed per
//! component after mobile hydrogens and charges have been placed.

pub mod layers;

use self::layers::{FormulaComponent, HydrogenLayer, MobileGroup};
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use crate::core::perception::bond_orders::{BondOrderError, assign_bond_orders};
use thiserror::Error;
use tracing::debug;

const BOND_ORDER_BUDGET: usize = 100_000;
const MAX_TAUTOMER_TRIALS: usize = 512;
const MAX_CHARGE_PLACEMENTS: usize = 256;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InchiError {
    #[error("InChI must start with 'InChI=1S/' or 'InChI=1/'")]
    MissingPrefix,
    #[error("Invalid InChI formula component '{0}'")]
    InvalidFormula(String),
    #[error("Invalid /{layer} layer: {detail}")]
    InvalidLayer { layer: char, detail: String },
    #[error("Atom {atom} in the /{layer} layer does not exist in component {component}")]
    AtomOutOfRange {
        layer: char,
        atom: usize,
        component: usize,
    },
    #[error("Invalid connection in component {component}: {source}")]
    Connection {
        component: usize,
        #[source]
        source: MoleculeError,
    },
    #[error("Could not assign bond orders to component {component}: {source}")]
    BondOrders {
        component: usize,
        #[source]
        source: BondOrderError,
    },
}

#[derive(Debug, Clone, Default)]
struct ComponentSpec {
    heavy_atoms: Vec<Element>,
    bonds: Vec<(usize, usize)>,
    hydrogens: HydrogenLayer,
    charge: i32,
}

/// Reads an InChI string into a Kekulé-form structural graph.
///
/// Components are concatenated in the order of the formula layer.
pub fn parse_inchi(input: &str) -> Result<Molecule, InchiError> {
    let input = input.trim();
    let body = input
        .strip_prefix("InChI=1S/")
        .or_else(|| input.strip_prefix("InChI=1/"))
        .ok_or(InchiError::MissingPrefix)?;

    let mut layer_iter = body.split('/');
    let formula_text = layer_iter.next().unwrap_or_default();
    if formula_text.is_empty() {
        return Err(InchiError::InvalidFormula(String::new()));
    }
    let formula = layers::parse_formula(formula_text)?;
    let mut specs: Vec<ComponentSpec> = formula
        .iter()
        .map(|FormulaComponent { heavy_atoms, .. }| ComponentSpec {
            heavy_atoms: heavy_atoms.clone(),
            ..Default::default()
        })
        .collect();
    let mut protons = 0;

    for layer in layer_iter {
        let mut chars = layer.chars();
        let Some(tag) = chars.next() else {
            continue;
        };
        let rest = chars.as_str();
        match tag {
            'c' => {
                for (k, text) in layers::split_components('c', rest)?.iter().enumerate() {
                    let spec = component_mut(&mut specs, 'c', k)?;
                    spec.bonds = layers::parse_connections(text)?;
                }
            }
            'h' => {
                for (k, text) in layers::split_components('h', rest)?.iter().enumerate() {
                    let spec = component_mut(&mut specs, 'h', k)?;
                    spec.hydrogens = layers::parse_hydrogens(text)?;
                }
            }
            'q' => {
                for (k, text) in layers::split_components('q', rest)?.iter().enumerate() {
                    let spec = component_mut(&mut specs, 'q', k)?;
                    spec.charge = layers::parse_signed('q', text)?;
                }
            }
            'p' => protons = layers::parse_signed('p', rest)?,
            // Fixed-H and reconnected layers restate the structure; the main
            // layers are enough to build it.
            'f' | 'r' => break,
            _ => debug!(layer = %tag, "Skipping InChI layer"),
        }
    }

    apply_protonation(&mut specs, protons);

    let mut mol = Molecule::new();
    for (k, spec) in specs.iter().enumerate() {
        let component = resolve_component(k, spec)?;
        append(&mut mol, &component);
    }
    Ok(mol)
}

fn component_mut(
    specs: &mut [ComponentSpec],
    layer: char,
    k: usize,
) -> Result<&mut ComponentSpec, InchiError> {
    let count = specs.len();
    specs.get_mut(k).ok_or_else(|| InchiError::InvalidLayer {
        layer,
        detail: format!("component {} given but formula has {}", k + 1, count),
    })
}

/// Applies the `/p` layer: removed protons come off mobile groups first,
/// then off heteroatoms; added protons become a mobile hydrogen over the
/// heteroatoms of the first component that has any.
fn apply_protonation(specs: &mut [ComponentSpec], protons: i32) {
    if protons < 0 {
        for _ in 0..protons.unsigned_abs() {
            if !remove_proton(specs) {
                break;
            }
        }
    } else if protons > 0 {
        for spec in specs.iter_mut() {
            let sites: Vec<usize> = spec
                .heavy_atoms
                .iter()
                .enumerate()
                .filter(|(_, e)| matches!(e, Element::N | Element::O | Element::S | Element::P))
                .map(|(i, _)| i + 1)
                .collect();
            if sites.is_empty() {
                continue;
            }
            for _ in 0..protons {
                spec.hydrogens.mobile.push(MobileGroup {
                    count: 1,
                    atoms: sites.clone(),
                });
            }
            spec.charge += protons;
            return;
        }
    }
}

fn remove_proton(specs: &mut [ComponentSpec]) -> bool {
    for spec in specs.iter_mut() {
        if let Some(group) = spec.hydrogens.mobile.iter_mut().find(|g| g.count > 0) {
            group.count -= 1;
            spec.charge -= 1;
            return true;
        }
    }
    let rank = |e: Element| match e {
        Element::O => 0,
        Element::S => 1,
        Element::N => 2,
        e if e.is_halogen() => 3,
        Element::C => 5,
        _ => 4,
    };
    let mut best: Option<(u8, usize, usize)> = None;
    for (k, spec) in specs.iter().enumerate() {
        for (slot, &(atom, count)) in spec.hydrogens.fixed.iter().enumerate() {
            let Some(&element) = spec.heavy_atoms.get(atom.wrapping_sub(1)) else {
                continue;
            };
            if count == 0 {
                continue;
            }
            let r = rank(element);
            if best.is_none_or(|(br, _, _)| r < br) {
                best = Some((r, k, slot));
            }
        }
    }
    match best {
        Some((_, k, slot)) => {
            specs[k].hydrogens.fixed[slot].1 -= 1;
            specs[k].charge -= 1;
            true
        }
        None => false,
    }
}

fn resolve_component(k: usize, spec: &ComponentSpec) -> Result<Molecule, InchiError> {
    let n = spec.heavy_atoms.len();
    let check = |layer: char, atom: usize| -> Result<usize, InchiError> {
        if atom == 0 || atom > n {
            Err(InchiError::AtomOutOfRange {
                layer,
                atom,
                component: k + 1,
            })
        } else {
            Ok(atom - 1)
        }
    };

    let mut base = Molecule::new();
    for &element in &spec.heavy_atoms {
        base.add_atom(Atom::new(element).with_hydrogens(0));
    }
    for &(a, b) in &spec.bonds {
        let (a, b) = (check('c', a)?, check('c', b)?);
        if base.bond_between(a, b).is_some() {
            continue;
        }
        base.add_bond(a, b, BondOrder::Single)
            .map_err(|source| InchiError::Connection {
                component: k + 1,
                source,
            })?;
    }
    for &(atom, count) in &spec.hydrogens.fixed {
        let idx = check('h', atom)?;
        base.atom_mut(idx).implicit_hydrogens += count;
    }
    let mut groups = Vec::with_capacity(spec.hydrogens.mobile.len());
    for group in &spec.hydrogens.mobile {
        let atoms = group
            .atoms
            .iter()
            .map(|&a| check('h', a))
            .collect::<Result<Vec<_>, _>>()?;
        groups.push((group.count, atoms));
    }

    let mut last_error = BondOrderError::Unsatisfiable(Vec::new());
    for distribution in mobile_distributions(&groups) {
        let mut tautomer = base.clone();
        for (atom, extra) in distribution {
            tautomer.atom_mut(atom).implicit_hydrogens += extra;
        }
        for placement in charge_placements(&tautomer, spec.charge) {
            let mut candidate = tautomer.clone();
            for &(atom, delta) in &placement {
                candidate.atom_mut(atom).formal_charge += delta;
            }
            match assign_bond_orders(&mut candidate, BOND_ORDER_BUDGET) {
                Ok(()) => return Ok(candidate),
                Err(err) => last_error = err,
            }
        }
    }
    Err(InchiError::BondOrders {
        component: k + 1,
        source: last_error,
    })
}

/// Enumerates ways to hand out mobile hydrogens, at most one per atom per
/// group where possible, capped at a fixed number of trials.
fn mobile_distributions(groups: &[(u8, Vec<usize>)]) -> Vec<Vec<(usize, u8)>> {
    let mut results: Vec<Vec<(usize, u8)>> = vec![Vec::new()];
    for (count, atoms) in groups {
        let mut per_group = Vec::new();
        spread(*count, atoms, 0, &mut Vec::new(), &mut per_group);
        per_group.sort_by_key(|d: &Vec<(usize, u8)>| d.iter().map(|&(_, c)| c).max().unwrap_or(0));
        let mut next = Vec::new();
        'outer: for prefix in &results {
            for choice in &per_group {
                if next.len() >= MAX_TAUTOMER_TRIALS {
                    break 'outer;
                }
                let mut combined = prefix.clone();
                combined.extend(choice.iter().copied());
                next.push(combined);
            }
        }
        results = next;
    }
    results
}

fn spread(
    remaining: u8,
    atoms: &[usize],
    from: usize,
    current: &mut Vec<(usize, u8)>,
    out: &mut Vec<Vec<(usize, u8)>>,
) {
    if out.len() >= MAX_TAUTOMER_TRIALS {
        return;
    }
    if remaining == 0 {
        out.push(current.clone());
        return;
    }
    for i in from..atoms.len() {
        for take in (1..=remaining).rev() {
            current.push((atoms[i], take));
            spread(remaining - take, atoms, i + 1, current, out);
            current.pop();
        }
    }
}

/// Candidate atoms for each unit of a component's net charge, preferring
/// ions without a valence model, then electronegative atoms for anions and
/// pnictogens for cations.
fn charge_placements(mol: &Molecule, charge: i32) -> Vec<Vec<(usize, i8)>> {
    if charge == 0 {
        return vec![Vec::new()];
    }
    let sign: i8 = if charge > 0 { 1 } else { -1 };
    let units = charge.unsigned_abs() as usize;

    let rank = |e: Element| -> u8 {
        if e.default_valences().is_empty() {
            return 0;
        }
        let order: &[Element] = if sign < 0 {
            &[Element::O, Element::S, Element::N, Element::C]
        } else {
            &[Element::N, Element::P, Element::S, Element::O, Element::C]
        };
        order
            .iter()
            .position(|&x| x == e)
            .map_or(order.len() as u8 + 1, |p| p as u8 + 1)
    };
    let mut candidates: Vec<usize> = (0..mol.atom_count()).collect();
    candidates.sort_by_key(|&i| (rank(mol.atom(i).element), i));

    // Ions without a valence model may carry several units at once.
    if units > 1 {
        if let Some(&ion) = candidates
            .iter()
            .find(|&&i| mol.atom(i).element.default_valences().is_empty())
        {
            if mol.atom_count() == 1 {
                return vec![vec![(ion, sign * units as i8)]];
            }
        }
    }

    let mut out = Vec::new();
    choose(&candidates, units, 0, &mut Vec::new(), &mut |picked: &[usize]| {
        out.push(picked.iter().map(|&i| (i, sign)).collect());
        out.len() < MAX_CHARGE_PLACEMENTS
    });
    out
}

fn choose(
    items: &[usize],
    k: usize,
    from: usize,
    current: &mut Vec<usize>,
    emit: &mut dyn FnMut(&[usize]) -> bool,
) -> bool {
    if current.len() == k {
        return emit(current);
    }
    for i in from..items.len() {
        current.push(items[i]);
        let keep_going = choose(items, k, i + 1, current, emit);
        current.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

fn append(target: &mut Molecule, component: &Molecule) {
    let offset = target.atom_count();
    for atom in component.atoms() {
        target.add_atom(atom.clone());
    }
    for bond in component.bonds() {
        let _ = target.add_bond(bond.atom1 + offset, bond.atom2 + offset, bond.order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::formula::MolecularFormula;

    fn formula_of(inchi: &str) -> String {
        MolecularFormula::from_molecule(&parse_inchi(inchi).unwrap()).hill_notation()
    }

    #[test]
    fn ethanol_reads_with_hydrogens() {
        let mol = parse_inchi("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.atom(2).element, Element::O);
        assert_eq!(mol.atom(2).implicit_hydrogens, 1);
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Single));
    }

    #[test]
    fn benzene_bond_orders_are_reconstructed() {
        let mol = parse_inchi("InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H").unwrap();
        assert_eq!(mol.ring_count(), 1);
        let doubles = mol
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 3);
    }

    #[test]
    fn acetic_acid_mobile_hydrogen_is_placed() {
        let mol = parse_inchi("InChI=1S/C2H4O2/c1-2(3)4/h1H3,(H,3,4)").unwrap();
        assert_eq!(formula_of("InChI=1S/C2H4O2/c1-2(3)4/h1H3,(H,3,4)"), "C2H4O2");
        let doubles = mol
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 1);
    }

    #[test]
    fn protonation_layer_adjusts_charge() {
        assert_eq!(
            formula_of("InChI=1S/C2H4O2/c1-2(3)4/h1H3,(H,3,4)/p-1"),
            "C2H3O2-"
        );
        assert_eq!(formula_of("InChI=1S/H3N/h1H3/p+1"), "H4N+");
    }

    #[test]
    fn salts_and_charge_layer() {
        assert_eq!(formula_of("InChI=1S/ClH.Na/h1H;/q;+1/p-1"), "ClNa");
        let mol = parse_inchi("InChI=1S/ClH.Na/h1H;/q;+1/p-1").unwrap();
        assert_eq!(mol.component_count(), 2);
        assert_eq!(mol.net_charge(), 0);
    }

    #[test]
    fn stereo_layers_are_ignored() {
        let mol = parse_inchi(
            "InChI=1S/C4H8/c1-3-4-2/h3-4H,1-2H3/b4-3+",
        )
        .unwrap();
        let doubles = mol
            .bonds()
            .iter()
            .filter(|b| b.order == BondOrder::Double)
            .count();
        assert_eq!(doubles, 1);
    }

    #[test]
    fn malformed_identifiers_are_rejected() {
        assert_eq!(parse_inchi("C2H6O"), Err(InchiError::MissingPrefix));
        assert!(matches!(
            parse_inchi("InChI=1S/C2H6O/c1-2-9"),
            Err(InchiError::AtomOutOfRange { layer: 'c', atom: 9, .. })
        ));
        assert!(matches!(
            parse_inchi("InChI=1S/C2H6O/c1-2-3/h1-2H4"),
            Err(InchiError::BondOrders { .. })
        ));
    }
}
