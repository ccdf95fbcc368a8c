use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements understood by the structure toolkit.
///
/// Covers the whole periodic table, hydrogen through oganesson, in
/// atomic-number order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    H,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og,
}

/// Static per-element data used for valence, mass and geometry calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Standard atomic weight in g/mol.
    pub average_mass: f64,
    /// Mass of the most abundant isotope in u.
    pub exact_mass: f64,
    /// Single-bond covalent radius in Angstroms.
    pub covalent_radius: f64,
    /// Van der Waals radius in Angstroms.
    pub vdw_radius: f64,
    /// Allowed neutral valences in ascending order; empty means "do not infer".
    pub valences: &'static [u8],
    /// Depiction color as RGB.
    pub color: [u8; 3],
}

const GREY: [u8; 3] = [85, 85, 85];

// Elements without a measured covalent radius use 1.60 Å; beyond Lr the
// masses are the mass number of the longest-lived isotope and the van der
// Waals radius defaults to 2.00 Å.

#[rustfmt::skip]
static ELEMENT_TABLE: [ElementData; 118] = [
    ElementData { symbol: "H",  atomic_number: 1,  average_mass: 1.008,   exact_mass: 1.007825,   covalent_radius: 0.31, vdw_radius: 1.20, valences: &[1],          color: [115, 115, 115] },
    ElementData { symbol: "He", atomic_number: 2,  average_mass: 4.0026,  exact_mass: 4.002603,   covalent_radius: 0.28, vdw_radius: 1.40, valences: &[],           color: GREY },
    ElementData { symbol: "Li", atomic_number: 3,  average_mass: 6.94,    exact_mass: 7.016004,   covalent_radius: 1.28, vdw_radius: 1.82, valences: &[],           color: [128, 64, 191] },
    ElementData { symbol: "Be", atomic_number: 4,  average_mass: 9.0122,  exact_mass: 9.012182,   covalent_radius: 0.96, vdw_radius: 1.53, valences: &[],           color: GREY },
    ElementData { symbol: "B",  atomic_number: 5,  average_mass: 10.81,   exact_mass: 11.009305,  covalent_radius: 0.84, vdw_radius: 1.92, valences: &[3],          color: [255, 128, 128] },
    ElementData { symbol: "C",  atomic_number: 6,  average_mass: 12.011,  exact_mass: 12.0,       covalent_radius: 0.76, vdw_radius: 1.70, valences: &[4],          color: [34, 34, 34] },
    ElementData { symbol: "N",  atomic_number: 7,  average_mass: 14.007,  exact_mass: 14.003074,  covalent_radius: 0.71, vdw_radius: 1.55, valences: &[3, 5],       color: [33, 33, 204] },
    ElementData { symbol: "O",  atomic_number: 8,  average_mass: 15.999,  exact_mass: 15.994915,  covalent_radius: 0.66, vdw_radius: 1.52, valences: &[2],          color: [204, 0, 0] },
    ElementData { symbol: "F",  atomic_number: 9,  average_mass: 18.998,  exact_mass: 18.998403,  covalent_radius: 0.57, vdw_radius: 1.47, valences: &[1],          color: [51, 153, 51] },
    ElementData { symbol: "Ne", atomic_number: 10, average_mass: 20.180,  exact_mass: 19.992440,  covalent_radius: 0.58, vdw_radius: 1.54, valences: &[],           color: GREY },
    ElementData { symbol: "Na", atomic_number: 11, average_mass: 22.990,  exact_mass: 22.989770,  covalent_radius: 1.66, vdw_radius: 2.27, valences: &[],           color: [128, 64, 191] },
    ElementData { symbol: "Mg", atomic_number: 12, average_mass: 24.305,  exact_mass: 23.985042,  covalent_radius: 1.41, vdw_radius: 1.73, valences: &[],           color: [0, 128, 0] },
    ElementData { symbol: "Al", atomic_number: 13, average_mass: 26.982,  exact_mass: 26.981538,  covalent_radius: 1.21, vdw_radius: 1.84, valences: &[],           color: GREY },
    ElementData { symbol: "Si", atomic_number: 14, average_mass: 28.085,  exact_mass: 27.976927,  covalent_radius: 1.11, vdw_radius: 2.10, valences: &[4],          color: [153, 128, 102] },
    ElementData { symbol: "P",  atomic_number: 15, average_mass: 30.974,  exact_mass: 30.973762,  covalent_radius: 1.07, vdw_radius: 1.80, valences: &[3, 5],       color: [255, 128, 0] },
    ElementData { symbol: "S",  atomic_number: 16, average_mass: 32.06,   exact_mass: 31.972071,  covalent_radius: 1.05, vdw_radius: 1.80, valences: &[2, 4, 6],    color: [204, 153, 0] },
    ElementData { symbol: "Cl", atomic_number: 17, average_mass: 35.45,   exact_mass: 34.968853,  covalent_radius: 1.02, vdw_radius: 1.75, valences: &[1],          color: [0, 153, 0] },
    ElementData { symbol: "Ar", atomic_number: 18, average_mass: 39.948,  exact_mass: 39.962383,  covalent_radius: 1.06, vdw_radius: 1.88, valences: &[],           color: GREY },
    ElementData { symbol: "K",  atomic_number: 19, average_mass: 39.098,  exact_mass: 38.963707,  covalent_radius: 2.03, vdw_radius: 2.75, valences: &[],           color: [128, 64, 191] },
    ElementData { symbol: "Ca", atomic_number: 20, average_mass: 40.078,  exact_mass: 39.962591,  covalent_radius: 1.76, vdw_radius: 2.31, valences: &[],           color: [0, 128, 0] },
    ElementData { symbol: "Sc", atomic_number: 21, average_mass: 44.956,  exact_mass: 44.955908,  covalent_radius: 1.70, vdw_radius: 2.15, valences: &[],           color: GREY },
    ElementData { symbol: "Ti", atomic_number: 22, average_mass: 47.867,  exact_mass: 47.947942,  covalent_radius: 1.60, vdw_radius: 2.11, valences: &[],           color: [191, 194, 199] },
    ElementData { symbol: "V",  atomic_number: 23, average_mass: 50.942,  exact_mass: 50.943957,  covalent_radius: 1.53, vdw_radius: 2.07, valences: &[],           color: GREY },
    ElementData { symbol: "Cr", atomic_number: 24, average_mass: 51.996,  exact_mass: 51.940506,  covalent_radius: 1.39, vdw_radius: 2.06, valences: &[],           color: [138, 153, 199] },
    ElementData { symbol: "Mn", atomic_number: 25, average_mass: 54.938,  exact_mass: 54.938050,  covalent_radius: 1.39, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Fe", atomic_number: 26, average_mass: 55.845,  exact_mass: 55.934942,  covalent_radius: 1.32, vdw_radius: 2.00, valences: &[],           color: [224, 102, 51] },
    ElementData { symbol: "Co", atomic_number: 27, average_mass: 58.933,  exact_mass: 58.933200,  covalent_radius: 1.26, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Ni", atomic_number: 28, average_mass: 58.693,  exact_mass: 57.935348,  covalent_radius: 1.24, vdw_radius: 1.63, valences: &[],           color: GREY },
    ElementData { symbol: "Cu", atomic_number: 29, average_mass: 63.546,  exact_mass: 62.929601,  covalent_radius: 1.32, vdw_radius: 1.40, valences: &[],           color: [200, 128, 51] },
    ElementData { symbol: "Zn", atomic_number: 30, average_mass: 65.38,   exact_mass: 63.929147,  covalent_radius: 1.22, vdw_radius: 1.39, valences: &[],           color: GREY },
    ElementData { symbol: "Ga", atomic_number: 31, average_mass: 69.723,  exact_mass: 68.925574,  covalent_radius: 1.22, vdw_radius: 1.87, valences: &[],           color: GREY },
    ElementData { symbol: "Ge", atomic_number: 32, average_mass: 72.630,  exact_mass: 73.921178,  covalent_radius: 1.20, vdw_radius: 2.11, valences: &[4],          color: GREY },
    ElementData { symbol: "As", atomic_number: 33, average_mass: 74.922,  exact_mass: 74.921596,  covalent_radius: 1.19, vdw_radius: 1.85, valences: &[3, 5],       color: [189, 128, 227] },
    ElementData { symbol: "Se", atomic_number: 34, average_mass: 78.971,  exact_mass: 79.916522,  covalent_radius: 1.20, vdw_radius: 1.90, valences: &[2, 4, 6],    color: [255, 161, 0] },
    ElementData { symbol: "Br", atomic_number: 35, average_mass: 79.904,  exact_mass: 78.918338,  covalent_radius: 1.20, vdw_radius: 1.85, valences: &[1],          color: [153, 51, 0] },
    ElementData { symbol: "Kr", atomic_number: 36, average_mass: 83.798,  exact_mass: 83.911507,  covalent_radius: 1.16, vdw_radius: 2.02, valences: &[],           color: GREY },
    ElementData { symbol: "Rb", atomic_number: 37, average_mass: 85.468,  exact_mass: 84.911790,  covalent_radius: 2.20, vdw_radius: 3.03, valences: &[],           color: [112, 46, 176] },
    ElementData { symbol: "Sr", atomic_number: 38, average_mass: 87.62,   exact_mass: 87.905613,  covalent_radius: 1.95, vdw_radius: 2.49, valences: &[],           color: [0, 255, 0] },
    ElementData { symbol: "Y",  atomic_number: 39, average_mass: 88.906,  exact_mass: 88.905840,  covalent_radius: 1.90, vdw_radius: 2.32, valences: &[],           color: GREY },
    ElementData { symbol: "Zr", atomic_number: 40, average_mass: 91.224,  exact_mass: 89.904698,  covalent_radius: 1.75, vdw_radius: 2.23, valences: &[],           color: GREY },
    ElementData { symbol: "Nb", atomic_number: 41, average_mass: 92.906,  exact_mass: 92.906373,  covalent_radius: 1.64, vdw_radius: 2.18, valences: &[],           color: GREY },
    ElementData { symbol: "Mo", atomic_number: 42, average_mass: 95.95,   exact_mass: 97.905405,  covalent_radius: 1.54, vdw_radius: 2.17, valences: &[],           color: GREY },
    ElementData { symbol: "Tc", atomic_number: 43, average_mass: 98.0,    exact_mass: 97.907212,  covalent_radius: 1.47, vdw_radius: 2.16, valences: &[],           color: GREY },
    ElementData { symbol: "Ru", atomic_number: 44, average_mass: 101.07,  exact_mass: 101.904344, covalent_radius: 1.46, vdw_radius: 2.13, valences: &[],           color: GREY },
    ElementData { symbol: "Rh", atomic_number: 45, average_mass: 102.91,  exact_mass: 102.905498, covalent_radius: 1.42, vdw_radius: 2.10, valences: &[],           color: GREY },
    ElementData { symbol: "Pd", atomic_number: 46, average_mass: 106.42,  exact_mass: 105.903480, covalent_radius: 1.39, vdw_radius: 1.63, valences: &[],           color: [0, 105, 133] },
    ElementData { symbol: "Ag", atomic_number: 47, average_mass: 107.87,  exact_mass: 106.905093, covalent_radius: 1.45, vdw_radius: 1.72, valences: &[],           color: GREY },
    ElementData { symbol: "Cd", atomic_number: 48, average_mass: 112.41,  exact_mass: 113.903361, covalent_radius: 1.44, vdw_radius: 1.58, valences: &[],           color: GREY },
    ElementData { symbol: "In", atomic_number: 49, average_mass: 114.82,  exact_mass: 114.903879, covalent_radius: 1.42, vdw_radius: 1.93, valences: &[],           color: GREY },
    ElementData { symbol: "Sn", atomic_number: 50, average_mass: 118.71,  exact_mass: 119.902197, covalent_radius: 1.39, vdw_radius: 2.17, valences: &[],           color: GREY },
    ElementData { symbol: "Sb", atomic_number: 51, average_mass: 121.76,  exact_mass: 120.903818, covalent_radius: 1.39, vdw_radius: 2.06, valences: &[],           color: GREY },
    ElementData { symbol: "Te", atomic_number: 52, average_mass: 127.60,  exact_mass: 129.906223, covalent_radius: 1.38, vdw_radius: 2.06, valences: &[2, 4, 6],    color: GREY },
    ElementData { symbol: "I",  atomic_number: 53, average_mass: 126.90,  exact_mass: 126.904468, covalent_radius: 1.39, vdw_radius: 1.98, valences: &[1, 3, 5, 7], color: [102, 0, 153] },
    ElementData { symbol: "Xe", atomic_number: 54, average_mass: 131.29,  exact_mass: 131.904154, covalent_radius: 1.40, vdw_radius: 2.16, valences: &[],           color: GREY },
    ElementData { symbol: "Cs", atomic_number: 55, average_mass: 132.91,  exact_mass: 132.905452, covalent_radius: 2.44, vdw_radius: 3.43, valences: &[],           color: [87, 23, 143] },
    ElementData { symbol: "Ba", atomic_number: 56, average_mass: 137.33,  exact_mass: 137.905247, covalent_radius: 2.15, vdw_radius: 2.68, valences: &[],           color: [0, 201, 0] },
    ElementData { symbol: "La", atomic_number: 57, average_mass: 138.91,  exact_mass: 138.906363, covalent_radius: 2.07, vdw_radius: 2.43, valences: &[],           color: GREY },
    ElementData { symbol: "Ce", atomic_number: 58, average_mass: 140.12,  exact_mass: 139.905449, covalent_radius: 2.04, vdw_radius: 2.42, valences: &[],           color: GREY },
    ElementData { symbol: "Pr", atomic_number: 59, average_mass: 140.91,  exact_mass: 140.907663, covalent_radius: 2.03, vdw_radius: 2.40, valences: &[],           color: GREY },
    ElementData { symbol: "Nd", atomic_number: 60, average_mass: 144.24,  exact_mass: 141.907729, covalent_radius: 2.01, vdw_radius: 2.39, valences: &[],           color: GREY },
    ElementData { symbol: "Pm", atomic_number: 61, average_mass: 145.0,   exact_mass: 144.912756, covalent_radius: 1.99, vdw_radius: 2.38, valences: &[],           color: GREY },
    ElementData { symbol: "Sm", atomic_number: 62, average_mass: 150.36,  exact_mass: 151.919740, covalent_radius: 1.98, vdw_radius: 2.36, valences: &[],           color: GREY },
    ElementData { symbol: "Eu", atomic_number: 63, average_mass: 151.96,  exact_mass: 152.921238, covalent_radius: 1.98, vdw_radius: 2.35, valences: &[],           color: GREY },
    ElementData { symbol: "Gd", atomic_number: 64, average_mass: 157.25,  exact_mass: 157.924112, covalent_radius: 1.96, vdw_radius: 2.34, valences: &[],           color: GREY },
    ElementData { symbol: "Tb", atomic_number: 65, average_mass: 158.93,  exact_mass: 158.925354, covalent_radius: 1.94, vdw_radius: 2.33, valences: &[],           color: GREY },
    ElementData { symbol: "Dy", atomic_number: 66, average_mass: 162.50,  exact_mass: 163.929181, covalent_radius: 1.92, vdw_radius: 2.31, valences: &[],           color: GREY },
    ElementData { symbol: "Ho", atomic_number: 67, average_mass: 164.93,  exact_mass: 164.930329, covalent_radius: 1.92, vdw_radius: 2.30, valences: &[],           color: GREY },
    ElementData { symbol: "Er", atomic_number: 68, average_mass: 167.26,  exact_mass: 165.930300, covalent_radius: 1.89, vdw_radius: 2.29, valences: &[],           color: GREY },
    ElementData { symbol: "Tm", atomic_number: 69, average_mass: 168.93,  exact_mass: 168.934218, covalent_radius: 1.90, vdw_radius: 2.27, valences: &[],           color: GREY },
    ElementData { symbol: "Yb", atomic_number: 70, average_mass: 173.05,  exact_mass: 173.938873, covalent_radius: 1.87, vdw_radius: 2.26, valences: &[],           color: GREY },
    ElementData { symbol: "Lu", atomic_number: 71, average_mass: 174.97,  exact_mass: 174.940785, covalent_radius: 1.87, vdw_radius: 2.24, valences: &[],           color: GREY },
    ElementData { symbol: "Hf", atomic_number: 72, average_mass: 178.49,  exact_mass: 179.946557, covalent_radius: 1.75, vdw_radius: 2.23, valences: &[],           color: GREY },
    ElementData { symbol: "Ta", atomic_number: 73, average_mass: 180.95,  exact_mass: 180.947996, covalent_radius: 1.70, vdw_radius: 2.22, valences: &[],           color: GREY },
    ElementData { symbol: "W",  atomic_number: 74, average_mass: 183.84,  exact_mass: 183.950931, covalent_radius: 1.62, vdw_radius: 2.18, valences: &[],           color: [33, 148, 214] },
    ElementData { symbol: "Re", atomic_number: 75, average_mass: 186.21,  exact_mass: 186.955753, covalent_radius: 1.51, vdw_radius: 2.16, valences: &[],           color: GREY },
    ElementData { symbol: "Os", atomic_number: 76, average_mass: 190.23,  exact_mass: 191.961481, covalent_radius: 1.44, vdw_radius: 2.16, valences: &[],           color: GREY },
    ElementData { symbol: "Ir", atomic_number: 77, average_mass: 192.22,  exact_mass: 192.962926, covalent_radius: 1.41, vdw_radius: 2.13, valences: &[],           color: GREY },
    ElementData { symbol: "Pt", atomic_number: 78, average_mass: 195.08,  exact_mass: 194.964774, covalent_radius: 1.36, vdw_radius: 1.75, valences: &[],           color: GREY },
    ElementData { symbol: "Au", atomic_number: 79, average_mass: 196.97,  exact_mass: 196.966552, covalent_radius: 1.36, vdw_radius: 1.66, valences: &[],           color: [204, 170, 0] },
    ElementData { symbol: "Hg", atomic_number: 80, average_mass: 200.59,  exact_mass: 201.970626, covalent_radius: 1.32, vdw_radius: 1.55, valences: &[],           color: GREY },
    ElementData { symbol: "Tl", atomic_number: 81, average_mass: 204.38,  exact_mass: 204.974428, covalent_radius: 1.45, vdw_radius: 1.96, valences: &[],           color: GREY },
    ElementData { symbol: "Pb", atomic_number: 82, average_mass: 207.2,   exact_mass: 207.976636, covalent_radius: 1.46, vdw_radius: 2.02, valences: &[],           color: GREY },
    ElementData { symbol: "Bi", atomic_number: 83, average_mass: 208.98,  exact_mass: 208.980399, covalent_radius: 1.48, vdw_radius: 2.07, valences: &[],           color: [158, 79, 181] },
    ElementData { symbol: "Po", atomic_number: 84, average_mass: 209.0,   exact_mass: 208.982430, covalent_radius: 1.40, vdw_radius: 1.97, valences: &[],           color: GREY },
    ElementData { symbol: "At", atomic_number: 85, average_mass: 210.0,   exact_mass: 209.987148, covalent_radius: 1.50, vdw_radius: 2.02, valences: &[],           color: GREY },
    ElementData { symbol: "Rn", atomic_number: 86, average_mass: 222.0,   exact_mass: 222.017578, covalent_radius: 1.50, vdw_radius: 2.20, valences: &[],           color: GREY },
    ElementData { symbol: "Fr", atomic_number: 87, average_mass: 223.0,   exact_mass: 223.019736, covalent_radius: 2.60, vdw_radius: 3.48, valences: &[],           color: GREY },
    ElementData { symbol: "Ra", atomic_number: 88, average_mass: 226.0,   exact_mass: 226.025410, covalent_radius: 2.21, vdw_radius: 2.83, valences: &[],           color: GREY },
    ElementData { symbol: "Ac", atomic_number: 89, average_mass: 227.0,   exact_mass: 227.027752, covalent_radius: 2.15, vdw_radius: 2.47, valences: &[],           color: GREY },
    ElementData { symbol: "Th", atomic_number: 90, average_mass: 232.04,  exact_mass: 232.038056, covalent_radius: 2.06, vdw_radius: 2.45, valences: &[],           color: GREY },
    ElementData { symbol: "Pa", atomic_number: 91, average_mass: 231.04,  exact_mass: 231.035884, covalent_radius: 2.00, vdw_radius: 2.43, valences: &[],           color: GREY },
    ElementData { symbol: "U",  atomic_number: 92, average_mass: 238.03,  exact_mass: 238.050788, covalent_radius: 1.96, vdw_radius: 2.41, valences: &[],           color: [0, 143, 255] },
    ElementData { symbol: "Np", atomic_number: 93, average_mass: 237.0,   exact_mass: 237.048173, covalent_radius: 1.90, vdw_radius: 2.39, valences: &[],           color: GREY },
    ElementData { symbol: "Pu", atomic_number: 94, average_mass: 244.0,   exact_mass: 244.064204, covalent_radius: 1.87, vdw_radius: 2.43, valences: &[],           color: GREY },
    ElementData { symbol: "Am", atomic_number: 95, average_mass: 243.0,   exact_mass: 243.061381, covalent_radius: 1.80, vdw_radius: 2.44, valences: &[],           color: GREY },
    ElementData { symbol: "Cm", atomic_number: 96, average_mass: 247.0,   exact_mass: 247.070354, covalent_radius: 1.69, vdw_radius: 2.45, valences: &[],           color: GREY },
    ElementData { symbol: "Bk", atomic_number: 97, average_mass: 247.0,   exact_mass: 247.070307, covalent_radius: 1.60, vdw_radius: 2.44, valences: &[],           color: GREY },
    ElementData { symbol: "Cf", atomic_number: 98, average_mass: 251.0,   exact_mass: 251.079587, covalent_radius: 1.60, vdw_radius: 2.45, valences: &[],           color: GREY },
    ElementData { symbol: "Es", atomic_number: 99, average_mass: 252.0,   exact_mass: 252.082980, covalent_radius: 1.60, vdw_radius: 2.45, valences: &[],           color: GREY },
    ElementData { symbol: "Fm", atomic_number: 100, average_mass: 257.0,   exact_mass: 257.095105, covalent_radius: 1.60, vdw_radius: 2.45, valences: &[],           color: GREY },
    ElementData { symbol: "Md", atomic_number: 101, average_mass: 258.0,   exact_mass: 258.098431, covalent_radius: 1.60, vdw_radius: 2.46, valences: &[],           color: GREY },
    ElementData { symbol: "No", atomic_number: 102, average_mass: 259.0,   exact_mass: 259.101030, covalent_radius: 1.60, vdw_radius: 2.46, valences: &[],           color: GREY },
    ElementData { symbol: "Lr", atomic_number: 103, average_mass: 262.0,   exact_mass: 262.109610, covalent_radius: 1.60, vdw_radius: 2.46, valences: &[],           color: GREY },
    ElementData { symbol: "Rf", atomic_number: 104, average_mass: 267.0,   exact_mass: 267.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Db", atomic_number: 105, average_mass: 268.0,   exact_mass: 268.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Sg", atomic_number: 106, average_mass: 269.0,   exact_mass: 269.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Bh", atomic_number: 107, average_mass: 270.0,   exact_mass: 270.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Hs", atomic_number: 108, average_mass: 269.0,   exact_mass: 269.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Mt", atomic_number: 109, average_mass: 278.0,   exact_mass: 278.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Ds", atomic_number: 110, average_mass: 281.0,   exact_mass: 281.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Rg", atomic_number: 111, average_mass: 282.0,   exact_mass: 282.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Cn", atomic_number: 112, average_mass: 285.0,   exact_mass: 285.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Nh", atomic_number: 113, average_mass: 286.0,   exact_mass: 286.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Fl", atomic_number: 114, average_mass: 289.0,   exact_mass: 289.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Mc", atomic_number: 115, average_mass: 290.0,   exact_mass: 290.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Lv", atomic_number: 116, average_mass: 293.0,   exact_mass: 293.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Ts", atomic_number: 117, average_mass: 294.0,   exact_mass: 294.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
    ElementData { symbol: "Og", atomic_number: 118, average_mass: 294.0,   exact_mass: 294.0,      covalent_radius: 1.60, vdw_radius: 2.00, valences: &[],           color: GREY },
];

static SYMBOL_LOOKUP: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "He" => Element::He, "Li" => Element::Li, "Be" => Element::Be,
    "B" => Element::B, "C" => Element::C, "N" => Element::N, "O" => Element::O,
    "F" => Element::F, "Ne" => Element::Ne, "Na" => Element::Na, "Mg" => Element::Mg,
    "Al" => Element::Al, "Si" => Element::Si, "P" => Element::P, "S" => Element::S,
    "Cl" => Element::Cl, "Ar" => Element::Ar, "K" => Element::K, "Ca" => Element::Ca,
    "Sc" => Element::Sc, "Ti" => Element::Ti, "V" => Element::V, "Cr" => Element::Cr,
    "Mn" => Element::Mn, "Fe" => Element::Fe, "Co" => Element::Co, "Ni" => Element::Ni,
    "Cu" => Element::Cu, "Zn" => Element::Zn, "Ga" => Element::Ga, "Ge" => Element::Ge,
    "As" => Element::As, "Se" => Element::Se, "Br" => Element::Br, "Kr" => Element::Kr,
    "Rb" => Element::Rb, "Sr" => Element::Sr, "Y" => Element::Y, "Zr" => Element::Zr,
    "Nb" => Element::Nb, "Mo" => Element::Mo, "Tc" => Element::Tc, "Ru" => Element::Ru,
    "Rh" => Element::Rh, "Pd" => Element::Pd, "Ag" => Element::Ag, "Cd" => Element::Cd,
    "In" => Element::In, "Sn" => Element::Sn, "Sb" => Element::Sb, "Te" => Element::Te,
    "I" => Element::I, "Xe" => Element::Xe, "Cs" => Element::Cs, "Ba" => Element::Ba,
    "La" => Element::La, "Ce" => Element::Ce, "Pr" => Element::Pr, "Nd" => Element::Nd,
    "Pm" => Element::Pm, "Sm" => Element::Sm, "Eu" => Element::Eu, "Gd" => Element::Gd,
    "Tb" => Element::Tb, "Dy" => Element::Dy, "Ho" => Element::Ho, "Er" => Element::Er,
    "Tm" => Element::Tm, "Yb" => Element::Yb, "Lu" => Element::Lu, "Hf" => Element::Hf,
    "Ta" => Element::Ta, "W" => Element::W, "Re" => Element::Re, "Os" => Element::Os,
    "Ir" => Element::Ir, "Pt" => Element::Pt, "Au" => Element::Au, "Hg" => Element::Hg,
    "Tl" => Element::Tl, "Pb" => Element::Pb, "Bi" => Element::Bi, "Po" => Element::Po,
    "At" => Element::At, "Rn" => Element::Rn, "Fr" => Element::Fr, "Ra" => Element::Ra,
    "Ac" => Element::Ac, "Th" => Element::Th, "Pa" => Element::Pa, "U" => Element::U,
    "Np" => Element::Np, "Pu" => Element::Pu, "Am" => Element::Am, "Cm" => Element::Cm,
    "Bk" => Element::Bk, "Cf" => Element::Cf, "Es" => Element::Es, "Fm" => Element::Fm,
    "Md" => Element::Md, "No" => Element::No, "Lr" => Element::Lr, "Rf" => Element::Rf,
    "Db" => Element::Db, "Sg" => Element::Sg, "Bh" => Element::Bh, "Hs" => Element::Hs,
    "Mt" => Element::Mt, "Ds" => Element::Ds, "Rg" => Element::Rg, "Cn" => Element::Cn,
    "Nh" => Element::Nh, "Fl" => Element::Fl, "Mc" => Element::Mc, "Lv" => Element::Lv,
    "Ts" => Element::Ts, "Og" => Element::Og,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct UnknownElementError(pub String);

impl Element {
    /// Looks up an element by its case-sensitive symbol (e.g. `"Cl"`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOL_LOOKUP.get(symbol).copied()
    }

    pub fn data(self) -> &'static ElementData {
        &ELEMENT_TABLE[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.data().symbol
    }

    pub fn atomic_number(self) -> u8 {
        self.data().atomic_number
    }

    pub fn average_mass(self) -> f64 {
        self.data().average_mass
    }

    pub fn exact_mass(self) -> f64 {
        self.data().exact_mass
    }

    pub fn covalent_radius(self) -> f64 {
        self.data().covalent_radius
    }

    pub fn vdw_radius(self) -> f64 {
        self.data().vdw_radius
    }

    pub fn default_valences(self) -> &'static [u8] {
        self.data().valences
    }

    pub fn color(self) -> [u8; 3] {
        self.data().color
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    /// Elements that may be written without brackets in SMILES.
    pub fn is_organic_subset(self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }

    /// Elements that may carry the aromatic (lowercase) flag.
    pub fn can_be_aromatic(self) -> bool {
        matches!(
            self,
            Element::B
                | Element::C
                | Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::Se
                | Element::As
        )
    }

    /// Valences allowed for this element once a formal charge is applied.
    ///
    /// Follows the isoelectronic rule: a charged atom behaves like its
    /// neighbour in the period (N+ like C, O- like F), with carbanions and
    /// carbocations both trivalent.
    pub fn valences_with_charge(self, charge: i8) -> Vec<u8> {
        if charge == 0 {
            return self.default_valences().to_vec();
        }
        let base = self.default_valences();
        if base.is_empty() {
            return Vec::new();
        }
        match self {
            Element::C | Element::Si | Element::Ge if charge.abs() == 1 => vec![3],
            Element::B if charge == -1 => vec![4],
            Element::B if charge == 1 => vec![2],
            _ => {
                let group_shift = charge as i16;
                let shifted: Vec<u8> = base
                    .iter()
                    .filter_map(|&v| {
                        let adjusted = if self.is_electron_rich() {
                            v as i16 + group_shift
                        } else {
                            v as i16 - group_shift.abs()
                        };
                        (adjusted >= 0).then_some(adjusted as u8)
                    })
                    .collect();
                shifted
            }
        }
    }

    fn is_electron_rich(self) -> bool {
        matches!(
            self,
            Element::N
                | Element::O
                | Element::P
                | Element::S
                | Element::As
                | Element::Se
                | Element::Te
                | Element::F
                | Element::Cl
                | Element::Br
                | Element::I
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = UnknownElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s).ok_or_else(|| UnknownElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum_discriminants() {
        for (symbol, element) in SYMBOL_LOOKUP.entries() {
            assert_eq!(element.symbol(), *symbol);
        }
        assert_eq!(SYMBOL_LOOKUP.len(), ELEMENT_TABLE.len());
    }

    #[test]
    fn from_symbol_is_case_sensitive() {
        assert_eq!(Element::from_symbol("Cl"), Some(Element::Cl));
        assert_eq!(Element::from_symbol("CL"), None);
        assert_eq!(Element::from_symbol("cl"), None);
        assert!("Xx".parse::<Element>().is_err());
    }

    #[test]
    fn atomic_numbers_are_correct_for_common_elements() {
        assert_eq!(Element::C.atomic_number(), 6);
        assert_eq!(Element::Br.atomic_number(), 35);
        assert_eq!(Element::Pb.atomic_number(), 82);
    }

    #[test]
    fn table_covers_the_periodic_table_in_order() {
        for (idx, data) in ELEMENT_TABLE.iter().enumerate() {
            assert_eq!(data.atomic_number as usize, idx + 1, "{}", data.symbol);
            assert!(data.average_mass > 0.0 && data.exact_mass > 0.0);
            assert!(data.covalent_radius > 0.0 && data.vdw_radius > 0.0);
        }
        assert_eq!(ELEMENT_TABLE.len(), 118);
    }

    #[test]
    fn heavy_and_transition_elements_are_known() {
        for (symbol, z) in [("Ti", 22), ("Ba", 56), ("Pd", 46), ("Gd", 64), ("W", 74), ("Bi", 83), ("U", 92), ("Og", 118)] {
            let element = Element::from_symbol(symbol).unwrap();
            assert_eq!(element.atomic_number(), z);
            assert_eq!(element.symbol(), symbol);
        }
        assert!(Element::U.default_valences().is_empty());
    }

    #[test]
    fn charged_valences_follow_isoelectronic_rule() {
        assert_eq!(Element::N.valences_with_charge(1), vec![4, 6]);
        assert_eq!(Element::O.valences_with_charge(-1), vec![1]);
        assert_eq!(Element::O.valences_with_charge(1), vec![3]);
        assert_eq!(Element::C.valences_with_charge(-1), vec![3]);
        assert_eq!(Element::B.valences_with_charge(-1), vec![4]);
        assert!(Element::Na.valences_with_charge(1).is_empty());
    }
}
