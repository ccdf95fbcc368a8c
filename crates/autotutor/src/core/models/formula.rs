use super::element::Element;
use super::molecule::Molecule;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,
    #[error("Unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unbalanced parenthesis at position {pos}")]
    UnbalancedParen { pos: usize },
    #[error("Element count too large at position {pos}")]
    CountOverflow { pos: usize },
    #[error("Zero count at position {pos}")]
    ZeroCount { pos: usize },
}

/// Element counts plus net charge, independent of any connectivity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MolecularFormula {
    counts: BTreeMap<Element, u32>,
    charge: i32,
}

impl MolecularFormula {
    /// Collects element counts (including implicit hydrogens) and net charge.
    pub fn from_molecule(mol: &Molecule) -> Self {
        let mut formula = Self::default();
        for atom in mol.atoms() {
            *formula.counts.entry(atom.element).or_default() += 1;
            if atom.implicit_hydrogens > 0 {
                *formula.counts.entry(Element::H).or_default() += atom.implicit_hydrogens as u32;
            }
        }
        formula.charge = mol.net_charge();
        formula
    }

    pub fn count(&self, element: Element) -> u32 {
        self.counts.get(&element).copied().unwrap_or(0)
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn elements(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        self.counts.iter().map(|(&e, &n)| (e, n))
    }

    pub fn heavy_atom_count(&self) -> u32 {
        self.counts
            .iter()
            .filter(|&(&e, _)| e != Element::H)
            .map(|(_, &n)| n)
            .sum()
    }

    /// Average molecular weight in g/mol.
    pub fn average_mass(&self) -> f64 {
        self.counts
            .iter()
            .map(|(e, &n)| e.average_mass() * n as f64)
            .sum()
    }

    /// Monoisotopic mass in u.
    pub fn exact_mass(&self) -> f64 {
        self.counts
            .iter()
            .map(|(e, &n)| e.exact_mass() * n as f64)
            .sum()
    }

    /// Degree of unsaturation for C/H/N/halogen formulas.
    ///
    /// `DU = 1 + C - (H + X - N) / 2`, counting rings plus pi bonds.
    pub fn degree_of_unsaturation(&self) -> f64 {
        let carbons = self.count(Element::C) as f64;
        let hydrogens = self.count(Element::H) as f64;
        let nitrogens = self.count(Element::N) as f64;
        let halogens: f64 = self
            .counts
            .iter()
            .filter(|&(e, _)| e.is_halogen())
            .map(|(_, &n)| n as f64)
            .sum();
        let h_equivalent = hydrogens + halogens - nitrogens;
        1.0 + carbons - h_equivalent / 2.0
    }

    /// Hill-order string: C, then H, then the rest alphabetically; without
    /// carbon, everything is alphabetical. Net charge is appended.
    pub fn hill_notation(&self) -> String {
        let mut ordered: Vec<(Element, u32)> = self.elements().filter(|&(_, n)| n > 0).collect();
        let has_carbon = self.count(Element::C) > 0;
        ordered.sort_by(|(a, _), (b, _)| {
            let rank = |e: &Element| -> u8 {
                match (has_carbon, e) {
                    (true, Element::C) => 0,
                    (true, Element::H) => 1,
                    _ => 2,
                }
            };
            rank(a)
                .cmp(&rank(b))
                .then_with(|| a.symbol().cmp(b.symbol()))
        });

        let mut out = String::new();
        for (element, n) in ordered {
            out.push_str(element.symbol());
            if n > 1 {
                out.push_str(&n.to_string());
            }
        }
        match self.charge {
            0 => {}
            1 => out.push('+'),
            -1 => out.push('-'),
            c if c > 0 => out.push_str(&format!("{}+", c)),
            c => out.push_str(&format!("{}-", -c)),
        }
        out
    }

    fn add_scaled(&mut self, other: &MolecularFormula, factor: u32, pos: usize) -> Result<(), FormulaError> {
        for (&e, &n) in &other.counts {
            let scaled = n
                .checked_mul(factor)
                .ok_or(FormulaError::CountOverflow { pos })?;
            let entry = self.counts.entry(e).or_default();
            *entry = entry
                .checked_add(scaled)
                .ok_or(FormulaError::CountOverflow { pos })?;
        }
        self.charge += other.charge * factor as i32;
        Ok(())
    }
}

impl fmt::Display for MolecularFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hill_notation())
    }
}

impl FromStr for MolecularFormula {
    type Err = FormulaError;

    /// Parses formulas such as `C8H12Br`, `Ca(OH)2`, `CuSO4.5H2O` or `NH4+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = FormulaParser { chars: &chars, pos: 0 };
        let mut total = MolecularFormula::default();
        loop {
            let multiplier = parser.read_count()?;
            let start = parser.pos;
            let component = parser.parse_group(0)?;
            if component.counts.is_empty() {
                return Err(match parser.peek() {
                    Some(ch) => FormulaError::UnexpectedChar { ch, pos: parser.pos },
                    None => FormulaError::Empty,
                });
            }
            total.add_scaled(&component, multiplier, start)?;
            match parser.peek() {
                Some('.') | Some('·') => parser.pos += 1,
                _ => break,
            }
        }
        total.charge += parser.read_charge()?;
        if let Some(ch) = parser.peek() {
            return Err(FormulaError::UnexpectedChar { ch, pos: parser.pos });
        }
        Ok(total)
    }
}

struct FormulaParser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl FormulaParser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn read_number(&mut self) -> Result<Option<u32>, FormulaError> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
                .ok_or(FormulaError::CountOverflow { pos: start })?;
            self.pos += 1;
        }
        Ok((self.pos > start).then_some(value))
    }

    /// Reads an optional count; an explicit zero is rejected.
    fn read_count(&mut self) -> Result<u32, FormulaError> {
        let start = self.pos;
        match self.read_number()? {
            Some(0) => Err(FormulaError::ZeroCount { pos: start }),
            Some(n) => Ok(n),
            None => Ok(1),
        }
    }

    /// Whether the rest of the input is a `<digits><sign>` charge such as `3-`.
    fn at_trailing_charge(&self) -> bool {
        let rest = &self.chars[self.pos.min(self.chars.len())..];
        let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && rest.len() == digits + 1 && matches!(rest[digits], '+' | '-')
    }

    fn parse_group(&mut self, depth: usize) -> Result<MolecularFormula, FormulaError> {
        let mut group = MolecularFormula::default();
        while let Some(ch) = self.peek() {
            match ch {
                'A'..='Z' => {
                    let start = self.pos;
                    self.pos += 1;
                    let mut symbol = ch.to_string();
                    if let Some(lower) = self.peek().filter(|c| c.is_ascii_lowercase()) {
                        symbol.push(lower);
                        self.pos += 1;
                    }
                    let element = Element::from_symbol(&symbol)
                        .ok_or(FormulaError::UnknownElement { symbol, pos: start })?;
                    let n = self.read_count()?;
                    let entry = group.counts.entry(element).or_default();
                    *entry = entry
                        .checked_add(n)
                        .ok_or(FormulaError::CountOverflow { pos: start })?;
                }
                '(' | '[' => {
                    let open = self.pos;
                    self.pos += 1;
                    let inner = self.parse_group(depth + 1)?;
                    match self.peek() {
                        Some(')') | Some(']') => self.pos += 1,
                        _ => return Err(FormulaError::UnbalancedParen { pos: open }),
                    }
                    // `[Fe(CN)6]3-`: digits before a final sign are the charge.
                    let n = if self.at_trailing_charge() {
                        1
                    } else {
                        self.read_count()?
                    };
                    group.add_scaled(&inner, n, open)?;
                }
                ')' | ']' => {
                    if depth == 0 {
                        return Err(FormulaError::UnbalancedParen { pos: self.pos });
                    }
                    return Ok(group);
                }
                _ => return Ok(group),
            }
        }
        Ok(group)
    }

    fn read_charge(&mut self) -> Result<i32, FormulaError> {
        if self.at_trailing_charge() {
            let magnitude = self.read_number()?.unwrap_or(1) as i32;
            let sign = if self.peek() == Some('+') { 1 } else { -1 };
            self.pos += 1;
            return Ok(sign * magnitude);
        }
        let mut charge = 0;
        while let Some(sign @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let unit = if sign == '+' { 1 } else { -1 };
            let magnitude = self.read_number()?.unwrap_or(1) as i32;
            charge += unit * magnitude;
        }
        Ok(charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::BondOrder;

    fn parse(s: &str) -> MolecularFormula {
        s.parse().unwrap()
    }

    #[test]
    fn parses_simple_formula_and_keeps_hill_order() {
        let f = parse("C8H12Br");
        assert_eq!(f.count(Element::C), 8);
        assert_eq!(f.count(Element::H), 12);
        assert_eq!(f.count(Element::Br), 1);
        assert_eq!(f.hill_notation(), "C8H12Br");
        assert_eq!(f.heavy_atom_count(), 9);
    }

    #[test]
    fn reorders_into_hill_notation() {
        assert_eq!(parse("H2O").hill_notation(), "H2O");
        assert_eq!(parse("OHC2H5").hill_notation(), "C2H6O");
        assert_eq!(parse("NaCl").hill_notation(), "ClNa");
    }

    #[test]
    fn parses_groups_hydrates_and_charges() {
        let f = parse("Ca(OH)2");
        assert_eq!(f.count(Element::O), 2);
        assert_eq!(f.count(Element::H), 2);

        let hydrate = parse("CuSO4.5H2O");
        assert_eq!(hydrate.count(Element::H), 10);
        assert_eq!(hydrate.count(Element::O), 9);

        assert_eq!(parse("NH4+").charge(), 1);
        assert_eq!(parse("SO4-2").charge(), -2);
        assert_eq!(parse("SO4-2").hill_notation(), "O4S2-");
    }

    #[test]
    fn rejects_malformed_formulas() {
        assert_eq!("".parse::<MolecularFormula>(), Err(FormulaError::Empty));
        assert!(matches!(
            "Xq2".parse::<MolecularFormula>(),
            Err(FormulaError::UnknownElement { .. })
        ));
        assert!(matches!(
            "C2(H4".parse::<MolecularFormula>(),
            Err(FormulaError::UnbalancedParen { pos: 2 })
        ));
        assert!(matches!(
            "hello".parse::<MolecularFormula>(),
            Err(FormulaError::UnexpectedChar { ch: 'h', pos: 0 })
        ));
        assert!(matches!(
            "C2H6 O".parse::<MolecularFormula>(),
            Err(FormulaError::UnexpectedChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn bracket_suffix_is_read_as_charge() {
        let ferricyanide = parse("[Fe(CN)6]3-");
        assert_eq!(ferricyanide.count(Element::Fe), 1);
        assert_eq!(ferricyanide.count(Element::C), 6);
        assert_eq!(ferricyanide.charge(), -3);
        assert_eq!(ferricyanide.hill_notation(), "C6FeN63-");

        let ammine = parse("[Co(NH3)6]3+");
        assert_eq!(ammine.count(Element::H), 18);
        assert_eq!(ammine.charge(), 3);

        assert_eq!(parse("Ca(OH)2").charge(), 0);
        assert_eq!(parse("[Fe(CN)6]2").count(Element::Fe), 2);
    }

    #[test]
    fn zero_counts_are_rejected() {
        assert_eq!(
            "C0".parse::<MolecularFormula>(),
            Err(FormulaError::ZeroCount { pos: 1 })
        );
        assert!(matches!(
            "Ca(OH)0".parse::<MolecularFormula>(),
            Err(FormulaError::ZeroCount { .. })
        ));
        assert!(matches!(
            "CuSO4.0H2O".parse::<MolecularFormula>(),
            Err(FormulaError::ZeroCount { .. })
        ));
    }

    #[test]
    fn heavier_elements_parse() {
        let f = parse("BaTiO3");
        assert_eq!(f.count(Element::Ba), 1);
        assert_eq!(f.count(Element::Ti), 1);
        assert_eq!(f.hill_notation(), "BaO3Ti");
        assert_eq!(parse("UF6").heavy_atom_count(), 7);
    }

    #[test]
    fn degree_of_unsaturation_counts_halogens_and_nitrogen() {
        assert_eq!(parse("C8H12Br").degree_of_unsaturation(), 2.5);
        assert_eq!(parse("C6H6").degree_of_unsaturation(), 4.0);
        assert_eq!(parse("C5H5N").degree_of_unsaturation(), 4.0);
        assert_eq!(parse("C2H6").degree_of_unsaturation(), 0.0);
    }

    #[test]
    fn masses_use_average_and_monoisotopic_tables() {
        let water = parse("H2O");
        assert!((water.average_mass() - 18.015).abs() < 1e-3);
        assert!((water.exact_mass() - 18.010565).abs() < 1e-6);
    }

    #[test]
    fn from_molecule_counts_implicit_hydrogens_and_charge() {
        let mut mol = Molecule::new();
        let c = mol.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let o = mol.add_atom(Atom::new(Element::O).with_charge(-1));
        mol.add_bond(c, o, BondOrder::Single).unwrap();
        let f = MolecularFormula::from_molecule(&mol);
        assert_eq!(f.hill_notation(), "CH3O-");
    }
}
