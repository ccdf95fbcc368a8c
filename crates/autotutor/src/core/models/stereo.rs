use super::atom::Chirality;

/// One position in the written neighbor order of a tetrahedral center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoNeighbor {
    Atom(usize),
    /// The single hydrogen written inside a bracket atom, as in `[C@H]`.
    ImplicitHydrogen,
}

/// A tetrahedral center with its four neighbors in the order the chirality
/// mark refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetrahedralCenter {
    pub center: usize,
    pub neighbors: [StereoNeighbor; 4],
    pub chirality: Chirality,
}

impl TetrahedralCenter {
    /// Required sign of `(n1 - c) · ((n2 - c) × (n3 - c))`.
    ///
    /// Seen from the first neighbor, `@` lists the other three
    /// anticlockwise, which makes that triple product positive; `@@` makes
    /// it negative.
    pub fn volume_sign(&self) -> f64 {
        match self.chirality {
            Chirality::CounterClockwise => 1.0,
            Chirality::Clockwise => -1.0,
            Chirality::None => 0.0,
        }
    }

    /// The four neighbors as atom indices, once every hydrogen is explicit.
    pub fn neighbor_atoms(&self) -> Option<[usize; 4]> {
        let mut out = [0; 4];
        for (slot, n) in out.iter_mut().zip(&self.neighbors) {
            match n {
                StereoNeighbor::Atom(a) => *slot = *a,
                StereoNeighbor::ImplicitHydrogen => return None,
            }
        }
        Some(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleBondConfig {
    Cis,
    Trans,
}

/// Relative placement of one reference substituent on each end of a double
/// bond. `atoms` is `[ref1, begin, end, ref2]` with `begin=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleBondStereo {
    pub atoms: [usize; 4],
    pub config: DoubleBondConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_sign_follows_the_chirality_mark() {
        let mut center = TetrahedralCenter {
            center: 1,
            neighbors: [
                StereoNeighbor::Atom(0),
                StereoNeighbor::ImplicitHydrogen,
                StereoNeighbor::Atom(2),
                StereoNeighbor::Atom(3),
            ],
            chirality: Chirality::CounterClockwise,
        };
        assert_eq!(center.volume_sign(), 1.0);
        assert_eq!(center.neighbor_atoms(), None);

        center.chirality = Chirality::Clockwise;
        center.neighbors[1] = StereoNeighbor::Atom(7);
        assert_eq!(center.volume_sign(), -1.0);
        assert_eq!(center.neighbor_atoms(), Some([0, 7, 2, 3]));
    }
}
