use super::error::SmilesError;
use crate::core::models::atom::Chirality;
use crate::core::models::element::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond { bond: BondToken, pos: usize },
    RingClosure { digit: u16, pos: usize },
    OpenBranch(usize),
    CloseBranch(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub aromatic: bool,
    pub isotope: u16,
    pub chirality: Chirality,
    /// Explicit hydrogen count; only bracket atoms carry one.
    pub hydrogens: Option<u8>,
    pub charge: i8,
    pub atom_class: u16,
    pub bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let token = match ch {
            '[' => {
                let (atom, next) = bracket_atom(&chars, i)?;
                i = next;
                Token::Atom(atom)
            }
            'B' if chars.get(i + 1) == Some(&'r') => {
                i += 2;
                Token::Atom(bare_atom(Element::Br, false, i - 2))
            }
            'C' if chars.get(i + 1) == Some(&'l') => {
                i += 2;
                Token::Atom(bare_atom(Element::Cl, false, i - 2))
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                let element = organic_element(ch).ok_or(SmilesError::UnexpectedChar { pos: i, ch })?;
                i += 1;
                Token::Atom(bare_atom(element, false, i - 1))
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                let element = organic_element(ch.to_ascii_uppercase())
                    .ok_or(SmilesError::UnexpectedChar { pos: i, ch })?;
                i += 1;
                Token::Atom(bare_atom(element, true, i - 1))
            }
            '-' | '=' | '#' | ':' | '/' | '\\' => {
                let bond = match ch {
                    '-' => BondToken::Single,
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    _ => BondToken::Down,
                };
                i += 1;
                Token::Bond { bond, pos: i - 1 }
            }
            '(' => {
                i += 1;
                Token::OpenBranch(i - 1)
            }
            ')' => {
                i += 1;
                Token::CloseBranch(i - 1)
            }
            '.' => {
                i += 1;
                Token::Dot(i - 1)
            }
            '%' => {
                let digits: Option<u16> = match (chars.get(i + 1), chars.get(i + 2)) {
                    (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                        Some((*a as u16 - '0' as u16) * 10 + (*b as u16 - '0' as u16))
                    }
                    _ => None,
                };
                let digit = digits.ok_or(SmilesError::UnexpectedChar { pos: i, ch })?;
                i += 3;
                Token::RingClosure { digit, pos: i - 3 }
            }
            '0'..='9' => {
                i += 1;
                Token::RingClosure {
                    digit: ch as u16 - '0' as u16,
                    pos: i - 1,
                }
            }
            _ => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn organic_element(ch: char) -> Option<Element> {
    match ch {
        'B' => Some(Element::B),
        'C' => Some(Element::C),
        'N' => Some(Element::N),
        'O' => Some(Element::O),
        'P' => Some(Element::P),
        'S' => Some(Element::S),
        'F' => Some(Element::F),
        'I' => Some(Element::I),
        _ => None,
    }
}

fn bare_atom(element: Element, aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        element,
        aromatic,
        isotope: 0,
        chirality: Chirality::None,
        hydrogens: None,
        charge: 0,
        atom_class: 0,
        bracket: false,
        pos,
    }
}

/// Parses `[isotope? symbol chirality? hcount? charge? class?]` starting at
/// the opening bracket; returns the token and the index after `]`.
fn bracket_atom(chars: &[char], start: usize) -> Result<(AtomToken, usize), SmilesError> {
    let mut i = start + 1;

    let mut isotope: u16 = 0;
    while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
        isotope = isotope
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as u16))
            .ok_or(SmilesError::InvalidIsotope { pos: start })?;
        i += 1;
    }

    let (element, aromatic) = bracket_element(chars, &mut i, start)?;

    let mut chirality = Chirality::None;
    if chars.get(i) == Some(&'@') {
        i += 1;
        chirality = Chirality::CounterClockwise;
        if chars.get(i) == Some(&'@') {
            i += 1;
            chirality = Chirality::Clockwise;
        }
    }

    let mut hydrogens = 0u8;
    if chars.get(i) == Some(&'H') {
        i += 1;
        hydrogens = 1;
        if let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
            hydrogens = d as u8;
            i += 1;
        }
    }

    let charge = bracket_charge(chars, &mut i, start)?;

    let mut atom_class: u16 = 0;
    if chars.get(i) == Some(&':') {
        i += 1;
        while let Some(d) = chars.get(i).and_then(|c| c.to_digit(10)) {
            atom_class = atom_class.saturating_mul(10).saturating_add(d as u16);
            i += 1;
        }
    }

    if chars.get(i) != Some(&']') {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }

    Ok((
        AtomToken {
            element,
            aromatic,
            isotope,
            chirality,
            hydrogens: Some(hydrogens),
            charge,
            atom_class,
            bracket: true,
            pos: start,
        },
        i + 1,
    ))
}

fn bracket_element(
    chars: &[char],
    i: &mut usize,
    bracket_start: usize,
) -> Result<(Element, bool), SmilesError> {
    let Some(&first) = chars.get(*i) else {
        return Err(SmilesError::UnclosedBracket { pos: bracket_start });
    };

    if first.is_ascii_lowercase() {
        let second = chars.get(*i + 1).copied();
        let two = second.map(|s| format!("{}{}", first.to_ascii_uppercase(), s));
        if let Some(element) = two
            .as_deref()
            .filter(|_| second.is_some_and(|s| s.is_ascii_lowercase()))
            .and_then(Element::from_symbol)
            .filter(|e| e.can_be_aromatic())
        {
            *i += 2;
            return Ok((element, true));
        }
        let one = first.to_ascii_uppercase().to_string();
        if let Some(element) = Element::from_symbol(&one).filter(|e| e.can_be_aromatic()) {
            *i += 1;
            return Ok((element, true));
        }
        return Err(SmilesError::InvalidElement {
            pos: *i,
            text: first.to_string(),
        });
    }

    if first.is_ascii_uppercase() {
        if let Some(second) = chars.get(*i + 1).filter(|c| c.is_ascii_lowercase()) {
            let symbol = format!("{}{}", first, second);
            if let Some(element) = Element::from_symbol(&symbol) {
                *i += 2;
                return Ok((element, false));
            }
        }
        if let Some(element) = Element::from_symbol(&first.to_string()) {
            *i += 1;
            return Ok((element, false));
        }
    }

    Err(SmilesError::InvalidElement {
        pos: *i,
        text: first.to_string(),
    })
}

fn bracket_charge(chars: &[char], i: &mut usize, bracket_start: usize) -> Result<i8, SmilesError> {
    let sign: i8 = match chars.get(*i) {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Ok(0),
    };
    let symbol = chars[*i];
    *i += 1;

    if let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        let mut magnitude = d as i8;
        *i += 1;
        if let Some(d2) = chars.get(*i).and_then(|c| c.to_digit(10)) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(d2 as i8))
                .ok_or(SmilesError::InvalidCharge { pos: bracket_start })?;
            *i += 1;
        }
        return Ok(sign * magnitude);
    }

    let mut magnitude: i8 = 1;
    while chars.get(*i) == Some(&symbol) {
        magnitude = magnitude
            .checked_add(1)
            .ok_or(SmilesError::InvalidCharge { pos: bracket_start })?;
        *i += 1;
    }
    Ok(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(token: &Token) -> &AtomToken {
        match token {
            Token::Atom(a) => a,
            other => panic!("expected atom, got {:?}", other),
        }
    }

    #[test]
    fn two_letter_halogens_are_single_tokens() {
        let tokens = tokenize("BrCCl").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(atom(&tokens[0]).element, Element::Br);
        assert_eq!(atom(&tokens[2]).element, Element::Cl);
    }

    #[test]
    fn bracket_atom_fields_are_parsed() {
        let tokens = tokenize("[13CH3+:7]").unwrap();
        let a = atom(&tokens[0]);
        assert_eq!(a.isotope, 13);
        assert_eq!(a.element, Element::C);
        assert_eq!(a.hydrogens, Some(3));
        assert_eq!(a.charge, 1);
        assert_eq!(a.atom_class, 7);
        assert!(a.bracket);
    }

    #[test]
    fn bracket_charges_accept_repeats_and_digits() {
        assert_eq!(atom(&tokenize("[Fe++]").unwrap()[0]).charge, 2);
        assert_eq!(atom(&tokenize("[Fe+3]").unwrap()[0]).charge, 3);
        assert_eq!(atom(&tokenize("[O-]").unwrap()[0]).charge, -1);
        assert_eq!(atom(&tokenize("[O--]").unwrap()[0]).charge, -2);
    }

    #[test]
    fn aromatic_bracket_atoms_and_chirality() {
        let se = tokenize("[se]").unwrap();
        assert_eq!(atom(&se[0]).element, Element::Se);
        assert!(atom(&se[0]).aromatic);

        let nh = tokenize("[nH]").unwrap();
        assert_eq!(atom(&nh[0]).element, Element::N);
        assert_eq!(atom(&nh[0]).hydrogens, Some(1));

        let chiral = tokenize("[C@@H]").unwrap();
        assert_eq!(atom(&chiral[0]).chirality, Chirality::Clockwise);
    }

    #[test]
    fn ring_closures_and_bonds() {
        let tokens = tokenize("C=1%12").unwrap();
        assert!(matches!(tokens[1], Token::Bond { bond: BondToken::Double, pos: 1 }));
        assert!(matches!(tokens[2], Token::RingClosure { digit: 1, pos: 2 }));
        assert!(matches!(tokens[3], Token::RingClosure { digit: 12, pos: 3 }));
    }

    #[test]
    fn rejects_unknown_characters_and_unclosed_brackets() {
        assert_eq!(
            tokenize("CXC"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: 'X' })
        );
        assert_eq!(
            tokenize("C[CH3"),
            Err(SmilesError::UnclosedBracket { pos: 1 })
        );
        assert!(matches!(
            tokenize("[Xx]"),
            Err(SmilesError::InvalidElement { .. })
        ));
    }
}
