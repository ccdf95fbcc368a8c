use super::converter::NameResolver;
use super::error::EngineError;
use crate::core::models::formula::{FormulaError, MolecularFormula};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Exactly one of name, smiles, inchi or formula is required; none was given")]
    NoSelector,
    #[error("Exactly one input is allowed, but {} were given", .0.join(", "))]
    MultipleSelectors(Vec<&'static str>),
    #[error("The {0} input is empty")]
    Empty(&'static str),
    #[error("Formula '{text}' could not be parsed: {source}")]
    Formula {
        text: String,
        #[source]
        source: FormulaError,
    },
}

/// The single identifier a run starts from. Values are stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoleculeInput {
    Name(String),
    Smiles(String),
    Inchi(String),
    Formula(String),
}

impl MoleculeInput {
    /// Builds an input from the four optional selectors.
    ///
    /// # Arguments
    ///
    /// * `name`, `smiles`, `inchi`, `formula` - The selector values; `None`
    ///   means the selector was not given at all.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NoSelector`] or [`InputError::MultipleSelectors`]
    /// unless exactly one selector is present, and [`InputError::Empty`] if
    /// that selector is blank.
    pub fn from_selectors(
        name: Option<&str>,
        smiles: Option<&str>,
        inchi: Option<&str>,
        formula: Option<&str>,
    ) -> Result<Self, InputError> {
        let given: Vec<(&'static str, &str)> = [
            ("name", name),
            ("smiles", smiles),
            ("inchi", inchi),
            ("formula", formula),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect();

        let (label, value) = match given.as_slice() {
            [] => return Err(InputError::NoSelector),
            [single] => *single,
            many => {
                return Err(InputError::MultipleSelectors(
                    many.iter().map(|(label, _)| *label).collect(),
                ));
            }
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(InputError::Empty(label));
        }
        let value = value.to_string();
        Ok(match label {
            "name" => Self::Name(value),
            "smiles" => Self::Smiles(value),
            "inchi" => Self::Inchi(value),
            _ => Self::Formula(value),
        })
    }

    /// The identifier exactly as it will appear in titles and slugs.
    pub fn text(&self) -> &str {
        match self {
            Self::Name(s) | Self::Smiles(s) | Self::Inchi(s) | Self::Formula(s) => s,
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Smiles(_) => "smiles",
            Self::Inchi(_) => "inchi",
            Self::Formula(_) => "formula",
        }
    }

    /// The IUPAC name, when the run started from one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MoleculeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.selector(), self.text())
    }
}

/// A line notation the structure toolkit can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    Smiles(String),
    Inchi(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedInput {
    Structure(StructureSource),
    /// Formula-only mode: no structure can be derived.
    FormulaOnly(MolecularFormula),
}

/// Turns a validated input into something the enricher can consume.
///
/// Names go through `resolver`; SMILES and InChI pass through unchanged;
/// formulas are parsed into element counts.
///
/// # Errors
///
/// Returns [`EngineError::NameResolution`] when the converter fails and
/// [`EngineError::InvalidInput`] for an unparsable formula.
pub fn resolve(
    input: &MoleculeInput,
    resolver: &dyn NameResolver,
) -> Result<ResolvedInput, EngineError> {
    match input {
        MoleculeInput::Name(name) => {
            info!("Resolving name '{}' with the external converter.", name);
            let smiles = resolver.resolve(name)?;
            debug!("Name '{}' resolved to SMILES '{}'.", name, smiles);
            Ok(ResolvedInput::Structure(StructureSource::Smiles(smiles)))
        }
        MoleculeInput::Smiles(s) => Ok(ResolvedInput::Structure(StructureSource::Smiles(s.clone()))),
        MoleculeInput::Inchi(s) => Ok(ResolvedInput::Structure(StructureSource::Inchi(s.clone()))),
        MoleculeInput::Formula(text) => {
            let formula = text.parse::<MolecularFormula>().map_err(|source| {
                InputError::Formula {
                    text: text.clone(),
                    source,
                }
            })?;
            info!("Formula-only mode for {}.", formula);
            Ok(ResolvedInput::FormulaOnly(formula))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::converter::ConverterError;

    struct FixedResolver(Result<&'static str, &'static str>);

    impl NameResolver for FixedResolver {
        fn resolve(&self, _name: &str) -> Result<String, ConverterError> {
            match self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(stderr) => Err(ConverterError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: stderr.to_string(),
                }),
            }
        }
    }

    #[test]
    fn exactly_one_selector_is_accepted() {
        let input = MoleculeInput::from_selectors(None, Some("  CCO "), None, None).unwrap();
        assert_eq!(input, MoleculeInput::Smiles("CCO".to_string()));
        assert_eq!(input.text(), "CCO");
        assert_eq!(input.to_string(), "smiles 'CCO'");
    }

    #[test]
    fn zero_or_many_selectors_are_rejected() {
        assert_eq!(
            MoleculeInput::from_selectors(None, None, None, None),
            Err(InputError::NoSelector)
        );
        assert_eq!(
            MoleculeInput::from_selectors(Some("ethanol"), Some("CCO"), None, Some("C2H6O")),
            Err(InputError::MultipleSelectors(vec!["name", "smiles", "formula"]))
        );
    }

    #[test]
    fn blank_selector_is_rejected() {
        assert_eq!(
            MoleculeInput::from_selectors(None, None, Some(" \t "), None),
            Err(InputError::Empty("inchi"))
        );
        assert_eq!(
            MoleculeInput::from_selectors(Some(""), None, None, None),
            Err(InputError::Empty("name"))
        );
    }

    #[test]
    fn names_go_through_the_resolver() {
        let input = MoleculeInput::Name("ethanol".to_string());
        let resolved = resolve(&input, &FixedResolver(Ok("CCO"))).unwrap();
        assert_eq!(
            resolved,
            ResolvedInput::Structure(StructureSource::Smiles("CCO".to_string()))
        );

        let err = resolve(&input, &FixedResolver(Err("unparsable name"))).unwrap_err();
        assert!(matches!(err, EngineError::NameResolution(_)));
        assert!(err.to_string().contains("unparsable name"));
    }

    #[test]
    fn formulas_are_parsed_without_a_resolver_call() {
        let input = MoleculeInput::Formula("C8H12Br".to_string());
        let resolver = FixedResolver(Err("must not be called"));
        match resolve(&input, &resolver).unwrap() {
            ResolvedInput::FormulaOnly(f) => assert_eq!(f.hill_notation(), "C8H12Br"),
            other => panic!("unexpected {:?}", other),
        }

        let bad = MoleculeInput::Formula("C8Xx".to_string());
        assert!(matches!(
            resolve(&bad, &resolver),
            Err(EngineError::InvalidInput(InputError::Formula { .. }))
        ));
    }
}
