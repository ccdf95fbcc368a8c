use crate::core::perception::kekulize::KekulizeError;
use crate::core::perception::valence::ValenceError;
use thiserror::Error;

/// Errors produced when reading a SMILES string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Empty SMILES string")]
    EmptyInput,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("Invalid element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    #[error("Unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    #[error("Invalid charge in bracket atom at position {pos}")]
    InvalidCharge { pos: usize },
    #[error("Invalid isotope in bracket atom at position {pos}")]
    InvalidIsotope { pos: usize },
    #[error("Unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    #[error("Bond symbol at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
    #[error("Ring closure {digit} was never closed")]
    UnclosedRing { digit: u16 },
    #[error("Invalid ring closure {digit} at position {pos}")]
    InvalidRingBond { digit: u16, pos: usize },
    #[error("Conflicting bond symbols on ring closure {digit}")]
    RingBondConflict { digit: u16 },
    #[error(transparent)]
    Kekulize(#[from] KekulizeError),
    #[error(transparent)]
    Valence(#[from] ValenceError),
}
