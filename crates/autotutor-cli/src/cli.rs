use clap::{Args, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "autotutor",
    version,
    about = "chem-autotutor - Turn an IUPAC name, SMILES, InChI or molecular formula into a mini tutorial bundle (3D viewer page, SDF, 2D depiction, narration and captions).",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory under which the `<slug>/` bundle is written [default: out]
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Optional subtitle shown under the page title (e.g., 'Tutorial 01: Multiple Bonds')
    #[arg(long, value_name = "SUBTITLE")]
    pub tutorial: Option<String>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the platform config directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Converter Overrides ---
    /// Java executable used to run OPSIN
    #[arg(long, value_name = "PATH")]
    pub java: Option<PathBuf>,

    /// Path to the OPSIN command-line jar
    #[arg(long, value_name = "PATH")]
    pub opsin_jar: Option<PathBuf>,

    /// Seconds to wait for OPSIN before killing it
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    // --- Conformer Overrides ---
    /// Random seed for 2D layout and 3D embedding
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S conformer.max-attempts=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output and the progress display
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// The molecule selectors. Exactly one is expected; the library reports
/// missing or conflicting selectors itself.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// IUPAC name, converted to a structure with OPSIN
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// SMILES string
    #[arg(long, value_name = "SMILES")]
    pub smiles: Option<String>,

    /// Standard or non-standard InChI string
    #[arg(long, value_name = "INCHI")]
    pub inchi: Option<String>,

    /// Molecular formula (formula-only mode: no 3D model or depiction)
    #[arg(long, value_name = "FORMULA")]
    pub formula: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_selectors_and_overrides() {
        let cli = Cli::try_parse_from([
            "autotutor",
            "--name",
            "4-bromo-3-methylhept-1-en-6-yne",
            "--out",
            "tutorials",
            "--tutorial",
            "Tutorial 01",
            "--seed",
            "7",
            "-S",
            "conformer.max-attempts=3",
            "-S",
            "depiction.width=640",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.input.name.as_deref(), Some("4-bromo-3-methylhept-1-en-6-yne"));
        assert_eq!(cli.input.smiles, None);
        assert_eq!(cli.out, Some(PathBuf::from("tutorials")));
        assert_eq!(cli.tutorial.as_deref(), Some("Tutorial 01"));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(
            cli.set_values,
            vec!["conformer.max-attempts=3", "depiction.width=640"]
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn several_selectors_are_left_to_the_library() {
        let cli = Cli::try_parse_from(["autotutor", "--smiles", "CCO", "--formula", "C2H6O"]).unwrap();
        assert!(cli.input.smiles.is_some() && cli.input.formula.is_some());
        let cli = Cli::try_parse_from(["autotutor"]).unwrap();
        assert!(cli.input.name.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["autotutor", "--smiles", "C", "-q", "-v"]).is_err());
    }
}
