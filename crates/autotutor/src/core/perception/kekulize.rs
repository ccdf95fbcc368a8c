//! Kekulization: turns aromatic bonds into an explicit single/double pattern.
//!
//! Atoms that still lack exactly one unit of valence become the vertices of a
//! matching problem over the aromatic bonds. A maximum matching is grown with
//! augmenting paths; when that leaves atoms unmatched (odd cycles can hide an
//! augmenting path from a plain search), an exhaustive search over the
//! remaining component settles the question within a fixed step budget.

use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::VecDeque;
use thiserror::Error;

const EXHAUSTIVE_STEP_BUDGET: usize = 200_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KekulizeError {
    #[error("Cannot kekulize aromatic system: atoms {0:?} cannot take a double bond")]
    Unkekulizable(Vec<usize>),
    #[error("Kekulization search exceeded its step budget")]
    SearchExhausted,
}

/// Replaces every aromatic bond by a single or double bond.
///
/// Atom aromatic flags are kept for reference; only bond orders change.
///
/// # Errors
///
/// Returns [`KekulizeError::Unkekulizable`] with the offending atoms when no
/// assignment gives every pi atom exactly one double bond.
pub fn kekulize(mol: &mut Molecule) -> Result<(), KekulizeError> {
    if !mol.has_aromatic_bonds() {
        return Ok(());
    }

    let n = mol.atom_count();
    let mut aromatic_adj: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (b, bond) in mol.bonds().iter().enumerate() {
        if bond.order == BondOrder::Aromatic {
            aromatic_adj[bond.atom1].push((bond.atom2, b));
            aromatic_adj[bond.atom2].push((bond.atom1, b));
        }
    }

    let needs_double: Vec<bool> = (0..n)
        .map(|idx| !aromatic_adj[idx].is_empty() && needs_double_bond(mol, idx))
        .collect();

    let mut mate: Vec<Option<(usize, usize)>> = vec![None; n];

    // Greedy pass, most constrained atoms first.
    let mut order: Vec<usize> = (0..n).filter(|&i| needs_double[i]).collect();
    order.sort_by_key(|&i| {
        aromatic_adj[i]
            .iter()
            .filter(|&&(j, _)| needs_double[j])
            .count()
    });
    for &u in &order {
        if mate[u].is_some() {
            continue;
        }
        if let Some(&(v, b)) = aromatic_adj[u]
            .iter()
            .find(|&&(v, _)| needs_double[v] && mate[v].is_none())
        {
            mate[u] = Some((v, b));
            mate[v] = Some((u, b));
        }
    }

    for &u in &order {
        if mate[u].is_none() {
            augment(&aromatic_adj, &needs_double, &mut mate, u);
        }
    }

    let unmatched: Vec<usize> = order.iter().copied().filter(|&u| mate[u].is_none()).collect();
    if !unmatched.is_empty() {
        let mut budget = EXHAUSTIVE_STEP_BUDGET;
        let mut fresh: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut candidates: Vec<usize> = (0..n).filter(|&i| needs_double[i]).collect();
        candidates.sort_unstable();
        match exhaustive(&aromatic_adj, &needs_double, &mut fresh, &candidates, &mut budget) {
            Some(true) => mate = fresh,
            Some(false) => return Err(KekulizeError::Unkekulizable(unmatched)),
            None => return Err(KekulizeError::SearchExhausted),
        }
    }

    let doubles: Vec<usize> = mate.iter().flatten().map(|&(_, b)| b).collect();
    for b in 0..mol.bond_count() {
        if mol.bond(b).order == BondOrder::Aromatic {
            mol.bond_mut(b).order = if doubles.contains(&b) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
        }
    }
    Ok(())
}

/// An aromatic atom needs a double bond when its smallest reachable valence
/// is exactly one above what its sigma bonds and hydrogens already use.
fn needs_double_bond(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    let used = mol.total_valence(idx);
    atom.element
        .valences_with_charge(atom.formal_charge)
        .iter()
        .copied()
        .find(|&v| v >= used)
        .is_some_and(|target| target - used == 1)
}

fn augment(
    adj: &[Vec<(usize, usize)>],
    needs_double: &[bool],
    mate: &mut [Option<(usize, usize)>],
    start: usize,
) -> bool {
    let n = adj.len();
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        for &(v, b) in &adj[u] {
            if !needs_double[v] || visited[v] {
                continue;
            }
            visited[v] = true;
            prev[v] = Some((u, b));
            match mate[v] {
                None => {
                    flip_path(mate, &prev, start, v);
                    return true;
                }
                Some((w, matched_bond)) => {
                    if !visited[w] {
                        visited[w] = true;
                        prev[w] = Some((v, matched_bond));
                        queue.push_back(w);
                    }
                }
            }
        }
    }
    false
}

fn flip_path(
    mate: &mut [Option<(usize, usize)>],
    prev: &[Option<(usize, usize)>],
    start: usize,
    end: usize,
) {
    let mut cur = end;
    let mut is_new_match = true;
    while cur != start {
        let Some((p, b)) = prev[cur] else {
            return;
        };
        if is_new_match {
            mate[cur] = Some((p, b));
            mate[p] = Some((cur, b));
        }
        is_new_match = !is_new_match;
        cur = p;
    }
}

/// Depth-first perfect matching over the atoms that need a double bond.
/// Returns `None` once the step budget is spent.
fn exhaustive(
    adj: &[Vec<(usize, usize)>],
    needs_double: &[bool],
    mate: &mut [Option<(usize, usize)>],
    candidates: &[usize],
    budget: &mut usize,
) -> Option<bool> {
    let Some(&u) = candidates.iter().find(|&&c| mate[c].is_none()) else {
        return Some(true);
    };
    for &(v, b) in &adj[u] {
        if !needs_double[v] || mate[v].is_some() {
            continue;
        }
        *budget = budget.checked_sub(1)?;
        mate[u] = Some((v, b));
        mate[v] = Some((u, b));
        if exhaustive(adj, needs_double, mate, candidates, budget)? {
            return Some(true);
        }
        mate[u] = None;
        mate[v] = None;
    }
    Some(false)
}
