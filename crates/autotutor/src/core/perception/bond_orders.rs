use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BondOrderError {
    #[error("No bond order assignment satisfies the valences of atoms {0:?}")]
    Unsatisfiable(Vec<usize>),
    #[error("Bond order search exceeded {0} steps")]
    SearchExhausted(usize),
}

/// Raises bond orders of a connectivity-only graph until every atom reaches
/// an allowed valence for its element and charge.
///
/// Hydrogen counts must already be fixed. The search walks unsatisfied atoms
/// in index order and tries each incident bond that both partners can still
/// accommodate, backtracking on dead ends.
///
/// # Errors
///
/// Fails when no assignment exists or when more than `budget` trial steps are
/// needed to decide.
pub fn assign_bond_orders(mol: &mut Molecule, budget: usize) -> Result<(), BondOrderError> {
    let n = mol.atom_count();
    let allowed: Vec<Vec<u8>> = mol
        .atoms()
        .iter()
        .map(|a| a.element.valences_with_charge(a.formal_charge))
        .collect();
    let mut used: Vec<u8> = (0..n).map(|i| mol.total_valence(i)).collect();
    let mut orders: Vec<u8> = mol.bonds().iter().map(|b| b.order.valence()).collect();

    let mut search = Search {
        mol: &*mol,
        allowed: &allowed,
        steps: 0,
        budget,
    };
    match search.solve(&mut used, &mut orders) {
        Some(true) => {}
        Some(false) => {
            let stuck = (0..n)
                .filter(|&i| !is_satisfied(&allowed[i], mol.total_valence(i)))
                .collect();
            return Err(BondOrderError::Unsatisfiable(stuck));
        }
        None => return Err(BondOrderError::SearchExhausted(budget)),
    }

    for (b, &order) in orders.iter().enumerate() {
        if let Some(order) = BondOrder::from_valence(order) {
            mol.bond_mut(b).order = order;
        }
    }
    Ok(())
}

fn is_satisfied(allowed: &[u8], used: u8) -> bool {
    allowed.is_empty() || allowed.contains(&used)
}

fn can_grow(allowed: &[u8], used: u8) -> bool {
    allowed.iter().any(|&v| v > used)
}

struct Search<'a> {
    mol: &'a Molecule,
    allowed: &'a [Vec<u8>],
    steps: usize,
    budget: usize,
}

impl Search<'_> {
    fn solve(&mut self, used: &mut [u8], orders: &mut [u8]) -> Option<bool> {
        let Some(u) = (0..used.len()).find(|&i| !is_satisfied(&self.allowed[i], used[i])) else {
            return Some(true);
        };
        if !can_grow(&self.allowed[u], used[u]) {
            return Some(false);
        }
        for (v, b) in self.mol.neighbor_bonds(u) {
            if orders[b] >= 3 || !can_grow(&self.allowed[v], used[v]) || self.allowed[v].is_empty() {
                continue;
            }
            self.steps += 1;
            if self.steps > self.budget {
                return None;
            }
            orders[b] += 1;
            used[u] += 1;
            used[v] += 1;
            if self.solve(used, orders)? {
                return Some(true);
            }
            orders[b] -= 1;
            used[u] -= 1;
            used[v] -= 1;
        }
        Some(false)
    }
}
