//! Tokenizers for the individual `/`-separated InChI layers.
//!
//! Atom numbers here are the 1-based canonical numbers of the string; callers
//! convert them to 0-based component-local indices.

use super::InchiError;
use crate::core::models::element::Element;

/// One formula component after multiplier expansion: heavy atoms in
/// canonical numbering order plus the hydrogen count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaComponent {
    pub heavy_atoms: Vec<Element>,
    pub hydrogens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileGroup {
    pub count: u8,
    pub atoms: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrogenLayer {
    pub fixed: Vec<(usize, u8)>,
    pub mobile: Vec<MobileGroup>,
}

/// Expands `n*segment` multipliers in a `;`-separated layer body.
pub fn split_components(layer: char, body: &str) -> Result<Vec<String>, InchiError> {
    let mut out = Vec::new();
    for segment in body.split(';') {
        match segment.split_once('*') {
            Some((count, rest)) => {
                let n: usize = count.parse().map_err(|_| InchiError::InvalidLayer {
                    layer,
                    detail: format!("bad multiplier '{}'", count),
                })?;
                out.extend(std::iter::repeat_n(rest.to_string(), n));
            }
            None => out.push(segment.to_string()),
        }
    }
    Ok(out)
}

/// Parses the formula layer, e.g. `C2H4O2.2Na`.
pub fn parse_formula(body: &str) -> Result<Vec<FormulaComponent>, InchiError> {
    let mut components = Vec::new();
    for part in body.split('.') {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        let multiplier: usize = if digits.is_empty() {
            1
        } else {
            digits.parse().map_err(|_| InchiError::InvalidFormula(part.to_string()))?
        };
        let component = parse_formula_component(&part[digits.len()..])?;
        components.extend(std::iter::repeat_n(component, multiplier));
    }
    Ok(components)
}

fn parse_formula_component(text: &str) -> Result<FormulaComponent, InchiError> {
    let bad = || InchiError::InvalidFormula(text.to_string());
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Err(bad());
    }
    let mut counts: Vec<(Element, u32)> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            return Err(bad());
        }
        let mut symbol = chars[i].to_string();
        i += 1;
        if i < chars.len() && chars[i].is_ascii_lowercase() {
            symbol.push(chars[i]);
            i += 1;
        }
        let element = Element::from_symbol(&symbol).ok_or_else(bad)?;
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let count: u32 = if start == i {
            1
        } else {
            chars[start..i].iter().collect::<String>().parse().map_err(|_| bad())?
        };
        counts.push((element, count));
    }

    let hydrogens = counts
        .iter()
        .filter(|(e, _)| *e == Element::H)
        .map(|(_, n)| n)
        .sum();
    let mut heavy: Vec<(Element, u32)> = counts.into_iter().filter(|(e, _)| *e != Element::H).collect();
    heavy.sort_by(|(a, _), (b, _)| {
        (*a != Element::C)
            .cmp(&(*b != Element::C))
            .then_with(|| a.symbol().cmp(b.symbol()))
    });
    let heavy_atoms = heavy
        .into_iter()
        .flat_map(|(e, n)| std::iter::repeat_n(e, n as usize))
        .collect();
    Ok(FormulaComponent {
        heavy_atoms,
        hydrogens,
    })
}

/// Parses one component of the connection layer, e.g. `1-2-4(3)5-6-1`,
/// into 1-based atom pairs.
pub fn parse_connections(text: &str) -> Result<Vec<(usize, usize)>, InchiError> {
    let bad = |pos: usize| InchiError::InvalidLayer {
        layer: 'c',
        detail: format!("unexpected character at position {} in '{}'", pos, text),
    };
    let chars: Vec<char> = text.chars().collect();
    let mut bonds = Vec::new();
    let mut prev: Option<usize> = None;
    let mut stack: Vec<Option<usize>> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let atom: usize = chars[start..i]
                    .iter()
                    .collect::<String>()
                    .parse()
                    .map_err(|_| bad(start))?;
                if let Some(p) = prev {
                    bonds.push((p, atom));
                }
                prev = Some(atom);
                continue;
            }
            '-' => {}
            '(' => stack.push(prev),
            ',' => prev = *stack.last().ok_or_else(|| bad(i))?,
            ')' => prev = stack.pop().ok_or_else(|| bad(i))?,
            _ => return Err(bad(i)),
        }
        i += 1;
    }
    if !stack.is_empty() {
        return Err(bad(chars.len()));
    }
    Ok(bonds)
}

/// Parses one component of the hydrogen layer, e.g. `1-2H3,3H,(H,4,5)`.
pub fn parse_hydrogens(text: &str) -> Result<HydrogenLayer, InchiError> {
    let bad = |pos: usize| InchiError::InvalidLayer {
        layer: 'h',
        detail: format!("unexpected character at position {} in '{}'", pos, text),
    };
    let chars: Vec<char> = text.chars().collect();
    let mut layer = HydrogenLayer::default();
    let mut pending: Vec<usize> = Vec::new();
    let mut i = 0;

    let read_number = |i: &mut usize| -> Option<usize> {
        let start = *i;
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
        chars[start..*i].iter().collect::<String>().parse().ok()
    };

    while i < chars.len() {
        match chars[i] {
            c if c.is_ascii_digit() => {
                let first = read_number(&mut i).ok_or_else(|| bad(i))?;
                if i < chars.len() && chars[i] == '-' {
                    i += 1;
                    let last = read_number(&mut i).ok_or_else(|| bad(i))?;
                    if last < first {
                        return Err(bad(i));
                    }
                    pending.extend(first..=last);
                } else {
                    pending.push(first);
                }
            }
            ',' => i += 1,
            'H' => {
                i += 1;
                let count = if i < chars.len() && chars[i].is_ascii_digit() {
                    read_number(&mut i).ok_or_else(|| bad(i))? as u8
                } else {
                    1
                };
                if pending.is_empty() {
                    return Err(bad(i));
                }
                layer.fixed.extend(pending.drain(..).map(|a| (a, count)));
            }
            '(' => {
                i += 1;
                if chars.get(i) != Some(&'H') {
                    return Err(bad(i));
                }
                i += 1;
                let count = if i < chars.len() && chars[i].is_ascii_digit() {
                    read_number(&mut i).ok_or_else(|| bad(i))? as u8
                } else {
                    1
                };
                // Charged mobile groups (`H-`) carry the same hydrogen count.
                if chars.get(i) == Some(&'-') {
                    i += 1;
                }
                let mut atoms = Vec::new();
                while chars.get(i) == Some(&',') {
                    i += 1;
                    atoms.push(read_number(&mut i).ok_or_else(|| bad(i))?);
                }
                if chars.get(i) != Some(&')') || atoms.is_empty() {
                    return Err(bad(i));
                }
                i += 1;
                layer.mobile.push(MobileGroup { count, atoms });
            }
            _ => return Err(bad(i)),
        }
    }
    if !pending.is_empty() {
        return Err(bad(chars.len()));
    }
    Ok(layer)
}

/// Parses a signed integer such as `+1`, `-2` or an empty string (zero).
pub fn parse_signed(layer: char, text: &str) -> Result<i32, InchiError> {
    if text.is_empty() {
        return Ok(0);
    }
    text.trim_start_matches('+')
        .parse()
        .map_err(|_| InchiError::InvalidLayer {
            layer,
            detail: format!("bad charge '{}'", text),
        })
}
