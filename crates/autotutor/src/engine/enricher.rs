use super::config::TutorialConfig;
use super::error::{EngineError, StructureParseError};
use super::input::StructureSource;
use crate::core::geometry::embed::{Conformer, EmbedOptions, embed_conformer};
use crate::core::geometry::layout::{LayoutOptions, compute_layout};
use crate::core::inchi::parse_inchi;
use crate::core::models::formula::MolecularFormula;
use crate::core::models::molecule::Molecule;
use crate::core::smiles::{parse_smiles, write_smiles};
use nalgebra::Point2;
use serde::Serialize;
use tracing::{debug, info};

/// Facts shown on the page and spoken in the narration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    /// Hill formula with a net-charge suffix, e.g. `C2H3O2-`.
    pub formula: String,
    /// Average molecular weight in g/mol.
    pub molecular_weight: f64,
    /// Monoisotopic mass in u, rounded to four decimals.
    pub exact_mass: f64,
    pub heavy_atoms: u32,
    /// Independent ring count; absent when only a formula is known.
    pub rings: Option<usize>,
    pub degree_of_unsaturation: f64,
    pub net_charge: i32,
}

impl PropertyRecord {
    pub fn from_molecule(mol: &Molecule) -> Self {
        let formula = MolecularFormula::from_molecule(mol);
        Self {
            rings: Some(mol.ring_count()),
            ..Self::from_formula(&formula)
        }
    }

    pub fn from_formula(formula: &MolecularFormula) -> Self {
        Self {
            formula: formula.hill_notation(),
            molecular_weight: round_to(formula.average_mass(), 3),
            exact_mass: round_to(formula.exact_mass(), 4),
            heavy_atoms: formula.heavy_atom_count(),
            rings: None,
            degree_of_unsaturation: formula.degree_of_unsaturation(),
            net_charge: formula.charge(),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Everything derived from one structure source. Read-only once built.
#[derive(Debug, Clone)]
pub struct EnrichedStructure {
    /// SMILES shown to the reader: the input string when the run started
    /// from SMILES (or a name), otherwise one written from the parsed graph.
    pub display_smiles: String,
    /// Heavy-atom graph in Kekulé form with implicit hydrogens.
    pub molecule: Molecule,
    /// One 2D point per heavy atom, in bond-length units.
    pub layout: Vec<Point2<f64>>,
    pub conformer: Conformer,
    pub properties: PropertyRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnrichOptions {
    pub embed: EmbedOptions,
    pub layout: LayoutOptions,
}

impl EnrichOptions {
    pub fn from_config(config: &TutorialConfig) -> Self {
        Self {
            embed: EmbedOptions {
                seed: config.conformer.seed,
                max_attempts: config.conformer.max_attempts,
                max_iterations: config.conformer.max_iterations,
            },
            layout: LayoutOptions {
                seed: config.conformer.seed,
                ..LayoutOptions::default()
            },
        }
    }
}

/// Parses a structure source into a validated structural graph.
///
/// # Errors
///
/// Returns [`StructureParseError`] for malformed notation, impossible
/// valences and aromatic systems that cannot be kekulized.
pub fn parse_structure(source: &StructureSource) -> Result<Molecule, StructureParseError> {
    Ok(match source {
        StructureSource::Smiles(s) => parse_smiles(s)?,
        StructureSource::Inchi(s) => parse_inchi(s)?,
    })
}

/// Derives layout, conformer and properties for a structure source.
///
/// # Errors
///
/// Returns [`EngineError::StructureParse`] if the source cannot be read and
/// [`EngineError::Conformer`] if no 3D conformer converges.
pub fn enrich(
    source: &StructureSource,
    options: &EnrichOptions,
) -> Result<EnrichedStructure, EngineError> {
    let molecule = parse_structure(source)?;
    let display_smiles = match source {
        StructureSource::Smiles(s) => s.clone(),
        StructureSource::Inchi(_) => write_smiles(&molecule),
    };
    let properties = PropertyRecord::from_molecule(&molecule);
    info!(
        "Parsed structure {} ({} heavy atoms, {} rings).",
        properties.formula,
        properties.heavy_atoms,
        properties.rings.unwrap_or(0)
    );

    let layout = compute_layout(&molecule, &options.layout);
    debug!("2D layout computed for {} atoms.", layout.len());

    let conformer = embed_conformer(&molecule, &options.embed)?;
    debug!(
        "3D conformer with {} atoms, energy {:.3}.",
        conformer.molecule.atom_count(),
        conformer.energy
    );

    Ok(EnrichedStructure {
        display_smiles,
        molecule,
        layout,
        conformer,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::embed::EmbedError;

    fn smiles(s: &str) -> StructureSource {
        StructureSource::Smiles(s.to_string())
    }

    #[test]
    fn properties_for_enyne_bromide() {
        let mol = parse_smiles("C=CC(C)C(Br)CC#C").unwrap();
        let props = PropertyRecord::from_molecule(&mol);
        assert_eq!(props.formula, "C8H11Br");
        assert_eq!(props.heavy_atoms, 9);
        assert_eq!(props.rings, Some(0));
        assert_eq!(props.degree_of_unsaturation, 3.0);
        assert!((props.exact_mass - 186.0044).abs() < 1e-4);
        assert!((props.molecular_weight - 187.08).abs() < 0.01);
    }

    #[test]
    fn properties_from_formula_have_no_ring_count() {
        let formula: MolecularFormula = "C8H12Br".parse().unwrap();
        let props = PropertyRecord::from_formula(&formula);
        assert_eq!(props.formula, "C8H12Br");
        assert_eq!(props.rings, None);
        assert_eq!(props.heavy_atoms, 9);
        assert_eq!(props.degree_of_unsaturation, 2.5);
    }

    #[test]
    fn enrich_builds_every_artifact_input() {
        let enriched = enrich(&smiles("c1ccccc1O"), &EnrichOptions::default()).unwrap();
        assert_eq!(enriched.display_smiles, "c1ccccc1O");
        assert_eq!(enriched.layout.len(), enriched.molecule.atom_count());
        assert_eq!(enriched.conformer.molecule.atom_count(), 13);
        assert_eq!(enriched.properties.formula, "C6H6O");
        assert_eq!(enriched.properties.rings, Some(1));
    }

    #[test]
    fn inchi_sources_get_a_written_display_smiles() {
        let source = StructureSource::Inchi("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3".to_string());
        let enriched = enrich(&source, &EnrichOptions::default()).unwrap();
        assert_eq!(enriched.properties.formula, "C2H6O");
        let reparsed = parse_smiles(&enriched.display_smiles).unwrap();
        assert_eq!(PropertyRecord::from_molecule(&reparsed), enriched.properties);
    }

    #[test]
    fn malformed_sources_are_parse_errors() {
        for source in [smiles("C(((("), smiles("c1cccc1"), smiles("C(C)(C)(C)(C)C")] {
            assert!(matches!(
                enrich(&source, &EnrichOptions::default()),
                Err(EngineError::StructureParse(StructureParseError::Smiles(_)))
            ));
        }
        let bad_inchi = StructureSource::Inchi("InChI=1S/C2H6O/c1-2-9".to_string());
        assert!(matches!(
            parse_structure(&bad_inchi),
            Err(StructureParseError::Inchi(_))
        ));
    }

    #[test]
    fn exhausted_embedding_is_a_conformer_error() {
        let options = EnrichOptions {
            embed: EmbedOptions {
                max_iterations: 1,
                max_attempts: 1,
                ..EmbedOptions::default()
            },
            ..EnrichOptions::default()
        };
        assert!(matches!(
            enrich(&smiles("C1CCC2CCCCC2C1"), &options),
            Err(EngineError::Conformer(EmbedError::NoConvergence { attempts: 1, .. }))
        ));
    }
}
