//! Chemical perception on structural graphs: hydrogen and valence
//! bookkeeping, kekulization of aromatic systems, bond-order reconstruction
//! for connectivity-only inputs, and ring perception.

pub mod bond_orders;
pub mod kekulize;
pub mod rings;
pub mod valence;
