use autotutor::engine::error::ErrorKind;
use autotutor::workflows::tutorial::WorkflowError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Workflow(e) => match e.kind() {
                ErrorKind::InvalidInput => 2,
                ErrorKind::NameResolution => 3,
                ErrorKind::StructureParse => 4,
                ErrorKind::Conformer => 5,
                ErrorKind::Write => 6,
                ErrorKind::Template => 70,
            },
            Self::Config(_) | Self::FileParsing { .. } => 2,
            Self::Io(_) => 6,
            Self::Other(_) => 70,
        }
    }

    /// The message folded onto one line, for the final stderr report.
    pub fn one_line(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotutor::core::geometry::embed::EmbedError;
    use autotutor::engine::converter::ConverterError;
    use autotutor::engine::enricher::parse_structure;
    use autotutor::engine::error::{EngineError, WriteError};
    use autotutor::engine::input::{InputError, StructureSource};
    use autotutor::workflows::tutorial::RunStage;
    use std::time::Duration;

    fn workflow(stage: RunStage, source: EngineError) -> CliError {
        CliError::Workflow(WorkflowError { stage, source })
    }

    #[test]
    fn workflow_failures_map_to_distinct_exit_codes() {
        let parse = parse_structure(&StructureSource::Smiles("C((((".to_string())).unwrap_err();
        let cases = [
            (workflow(RunStage::Parse, InputError::NoSelector.into()), 2),
            (
                workflow(RunStage::Resolve, ConverterError::Timeout(Duration::from_secs(1)).into()),
                3,
            ),
            (workflow(RunStage::Enrich, parse.into()), 4),
            (workflow(RunStage::Enrich, EmbedError::EmptyMolecule.into()), 5),
            (
                workflow(
                    RunStage::Write,
                    WriteError::Io {
                        path: PathBuf::from("out"),
                        source: std::io::Error::other("disk full"),
                    }
                    .into(),
                ),
                6,
            ),
        ];
        for (error, code) in cases {
            assert_eq!(error.exit_code(), code, "{}", error);
        }
    }

    #[test]
    fn cli_level_failures_have_exit_codes() {
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 2);
        assert_eq!(CliError::Io(std::io::Error::other("x")).exit_code(), 6);
        assert_eq!(CliError::Other(anyhow::anyhow!("boom")).exit_code(), 70);
    }

    #[test]
    fn one_line_folds_multiline_diagnostics() {
        let err = workflow(
            RunStage::Resolve,
            ConverterError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "first line\n\n  second line".to_string(),
            }
            .into(),
        );
        let line = err.one_line();
        assert!(!line.contains('\n'));
        assert!(line.starts_with("resolve stage failed"));
        assert!(line.ends_with("first line second line"));
    }
}
