use crate::core::io::depiction::{DepictionOptions, render_png};
use crate::core::io::sdf::{SdfFile, SdfMetadata};
use crate::core::io::traits::MolecularFile;
use crate::engine::bundle::{
    BundleStage, CAPTIONS, DESCRIPTION, INDEX_HTML, MODEL_PNG, MODEL_SDF, OutputBundle, VOICEOVER,
};
use crate::engine::composer::{Composer, PageContext};
use crate::engine::config::TutorialConfig;
use crate::engine::converter::NameResolver;
use crate::engine::enricher::{EnrichOptions, EnrichedStructure, PropertyRecord, enrich};
use crate::engine::error::{EngineError, ErrorKind, WriteError};
use crate::engine::input::{MoleculeInput, ResolvedInput, resolve};
use crate::engine::narration::Narration;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::slug::slugify;
use crate::engine::teaching::{FORMULA_BULLETS, bullets_from_name, unsaturation_bullet};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

/// Longest SDF title line written.
const SDF_TITLE_LEN: usize = 80;

/// The raw selector values a run starts from. Exactly one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    pub name: Option<String>,
    pub smiles: Option<String>,
    pub inchi: Option<String>,
    pub formula: Option<String>,
}

/// The stage a run was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStage {
    Parse,
    Resolve,
    Enrich,
    Write,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::Resolve => "resolve",
            Self::Enrich => "enrich",
            Self::Write => "write",
        })
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct WorkflowError {
    pub stage: RunStage,
    #[source]
    pub source: EngineError,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

trait AtStage<T> {
    fn at(self, stage: RunStage) -> Result<T, WorkflowError>;
}

impl<T, E: Into<EngineError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: RunStage) -> Result<T, WorkflowError> {
        self.map_err(|e| WorkflowError {
            stage,
            source: e.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialOutcome {
    pub input: MoleculeInput,
    pub bundle: OutputBundle,
    /// The formula printed in the bundle, from the enricher or the parsed formula.
    pub formula: String,
    pub formula_only: bool,
}

/// Builds one tutorial bundle.
///
/// # Arguments
///
/// * `selectors` - The name, SMILES, InChI or formula given by the user.
/// * `config` - Output root, converter, conformer and depiction settings.
/// * `resolver` - Converts IUPAC names to SMILES.
/// * `reporter` - Receives progress events.
///
/// # Return
///
/// The committed bundle and a summary of the run.
///
/// # Errors
///
/// Returns [`WorkflowError`] carrying the failing [`RunStage`] and the
/// underlying [`EngineError`]. Nothing is left on disk when a run fails:
/// input problems are caught before any directory is created, and later
/// failures discard the staging directory.
#[instrument(skip_all, name = "tutorial_workflow")]
pub fn run(
    selectors: &Selectors,
    config: &TutorialConfig,
    resolver: &dyn NameResolver,
    reporter: &ProgressReporter,
) -> Result<TutorialOutcome, WorkflowError> {
    let input = MoleculeInput::from_selectors(
        selectors.name.as_deref(),
        selectors.smiles.as_deref(),
        selectors.inchi.as_deref(),
        selectors.formula.as_deref(),
    )
    .at(RunStage::Parse)?;
    info!("Building tutorial for {}.", input);

    let resolved = reporter
        .phase("Resolving input", || resolve(&input, resolver))
        .at(RunStage::Resolve)?;
    let slug = slugify(input.text());

    let (bundle, formula, formula_only) = match resolved {
        ResolvedInput::Structure(source) => {
            let options = EnrichOptions::from_config(config);
            let structure = reporter
                .phase("Enriching structure", || enrich(&source, &options))
                .at(RunStage::Enrich)?;
            let formula = structure.properties.formula.clone();
            let bundle = reporter
                .phase("Writing bundle", || {
                    write_structure_bundle(&input, &structure, &slug, config, reporter)
                })
                .at(RunStage::Write)?;
            (bundle, formula, false)
        }
        ResolvedInput::FormulaOnly(parsed) => {
            reporter.report(Progress::Message(
                "Formula-only mode: no 3D model or depiction will be produced.".to_string(),
            ));
            let properties = PropertyRecord::from_formula(&parsed);
            let formula = properties.formula.clone();
            let bundle = reporter
                .phase("Writing bundle", || {
                    write_formula_bundle(&input, &properties, &slug, config, reporter)
                })
                .at(RunStage::Write)?;
            (bundle, formula, true)
        }
    };

    info!(
        "Tutorial for {} written to {} ({} files).",
        input,
        bundle.path.display(),
        bundle.files.len()
    );
    Ok(TutorialOutcome {
        input,
        bundle,
        formula,
        formula_only,
    })
}

fn write_structure_bundle(
    input: &MoleculeInput,
    structure: &EnrichedStructure,
    slug: &str,
    config: &TutorialConfig,
    reporter: &ProgressReporter,
) -> Result<OutputBundle, EngineError> {
    let composer = Composer::new()?;
    let title = input.text();

    let metadata = SdfMetadata {
        title: title.chars().take(SDF_TITLE_LEN).collect(),
        program: "autotutor3D".to_string(),
        comment: structure.display_smiles.clone(),
        data_items: vec![
            ("FORMULA".to_string(), structure.properties.formula.clone()),
            ("SMILES".to_string(), structure.display_smiles.clone()),
        ],
    };
    let sdf = SdfFile::write_to_string(&structure.conformer, &metadata).map_err(WriteError::from)?;

    let depiction = DepictionOptions {
        width: config.depiction.width,
        height: config.depiction.height,
        ..DepictionOptions::default()
    };
    let png = render_png(&structure.molecule, &structure.layout, &depiction)
        .map_err(WriteError::from)?;

    let mut bullets = input.name().map(bullets_from_name).unwrap_or_default();
    bullets.push(unsaturation_bullet(
        structure.properties.degree_of_unsaturation,
    ));
    let narration = Narration::for_structure(title, &structure.display_smiles, &structure.properties);
    let context = PageContext::for_structure(
        title,
        config.subtitle.as_deref(),
        input.selector(),
        structure,
        sdf.clone(),
        bullets,
    );
    let page = composer.render_page(&context)?;
    let description = composer.render_description(&context)?;
    let voiceover = narration.voiceover();
    let captions = narration.captions();

    let mut stage = BundleStage::create(&config.output_root, slug)?;
    let files: [(&'static str, &[u8]); 6] = [
        (MODEL_SDF, sdf.as_bytes()),
        (MODEL_PNG, &png),
        (INDEX_HTML, page.as_bytes()),
        (VOICEOVER, voiceover.as_bytes()),
        (CAPTIONS, captions.as_bytes()),
        (DESCRIPTION, description.as_bytes()),
    ];
    write_all(&mut stage, &files, reporter)?;
    Ok(stage.commit()?)
}

fn write_formula_bundle(
    input: &MoleculeInput,
    properties: &PropertyRecord,
    slug: &str,
    config: &TutorialConfig,
    reporter: &ProgressReporter,
) -> Result<OutputBundle, EngineError> {
    let composer = Composer::new()?;
    let title = input.text();

    let bullets = FORMULA_BULLETS.iter().map(|b| b.to_string()).collect();
    let narration = Narration::for_formula(title, input.text(), properties);
    let context = PageContext::for_formula(title, config.subtitle.as_deref(), properties, bullets);
    let page = composer.render_page(&context)?;
    let description = composer.render_description(&context)?;
    let voiceover = narration.voiceover();
    let captions = narration.captions();

    let mut stage = BundleStage::create(&config.output_root, slug)?;
    let files: [(&'static str, &[u8]); 4] = [
        (INDEX_HTML, page.as_bytes()),
        (VOICEOVER, voiceover.as_bytes()),
        (CAPTIONS, captions.as_bytes()),
        (DESCRIPTION, description.as_bytes()),
    ];
    write_all(&mut stage, &files, reporter)?;
    Ok(stage.commit()?)
}

fn write_all(
    stage: &mut BundleStage,
    files: &[(&'static str, &[u8])],
    reporter: &ProgressReporter,
) -> Result<(), WriteError> {
    reporter.report(Progress::TaskStart {
        total_steps: files.len() as u64,
    });
    for &(file, contents) in files {
        stage.write_bytes(file, contents)?;
        reporter.report(Progress::ArtifactWritten { file });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    Ok(())
}
