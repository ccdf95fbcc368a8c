use super::converter::ConverterError;
use super::input::InputError;
use crate::core::geometry::embed::EmbedError;
use crate::core::inchi::InchiError;
use crate::core::io::depiction::DepictionError;
use crate::core::io::sdf::SdfError;
use crate::core::smiles::SmilesError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureParseError {
    #[error("Invalid SMILES: {0}")]
    Smiles(#[from] SmilesError),
    #[error("Invalid InChI: {0}")]
    Inchi(#[from] InchiError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error at '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SDF export failed: {0}")]
    Sdf(#[from] SdfError),
    #[error("Depiction failed: {0}")]
    Depiction(#[from] DepictionError),
}

impl WriteError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Name resolution failed: {0}")]
    NameResolution(#[from] ConverterError),

    #[error("Structure could not be parsed: {0}")]
    StructureParse(#[from] StructureParseError),

    #[error("3D conformer generation failed: {0}")]
    Conformer(#[from] EmbedError),

    #[error("Output could not be written: {0}")]
    Write(#[from] WriteError),

    #[error("Template '{template}' could not be rendered: {source}")]
    Template {
        template: &'static str,
        #[source]
        source: minijinja::Error,
    },
}

/// Coarse classification of [`EngineError`], stable for callers that map
/// failures onto exit codes or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NameResolution,
    StructureParse,
    Conformer,
    Write,
    Template,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NameResolution(_) => ErrorKind::NameResolution,
            Self::StructureParse(_) => ErrorKind::StructureParse,
            Self::Conformer(_) => ErrorKind::Conformer,
            Self::Write(_) => ErrorKind::Write,
            Self::Template { .. } => ErrorKind::Template,
        }
    }
}
