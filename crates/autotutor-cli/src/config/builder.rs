use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::locations::SearchPaths;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use autotutor::engine::config::TutorialConfigBuilder;
use autotutor::workflows::tutorial::Selectors;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub fn build_config(args: &Cli, paths: &SearchPaths) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match args.config.as_ref() {
        Some(path) => FileConfig::from_file(path)?,
        None => match paths.existing_config_file() {
            Some(path) => {
                info!("Using configuration file {}.", path.display());
                FileConfig::from_file(&path)?
            }
            None => FileConfig::default(),
        },
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let output_file = file_config.output.take().unwrap_or_default();
    let output_root = args
        .out
        .clone()
        .or(output_file.root)
        .unwrap_or(defaults.output_root);

    let converter_file = file_config.converter.take().unwrap_or_default();
    let java = args
        .java
        .clone()
        .or(converter_file.java)
        .unwrap_or(defaults.java);
    let opsin_jar = args
        .opsin_jar
        .clone()
        .or(converter_file.opsin_jar)
        .unwrap_or_else(|| paths.locate_opsin_jar());
    let timeout_secs = args
        .timeout_secs
        .or(converter_file.timeout_secs)
        .unwrap_or(defaults.timeout_secs);

    let conformer_file = file_config.conformer.take().unwrap_or_default();
    let seed = args.seed.or(conformer_file.seed).unwrap_or(defaults.seed);
    let max_attempts = conformer_file.max_attempts.unwrap_or(defaults.max_attempts);
    let max_iterations = conformer_file
        .max_iterations
        .unwrap_or(defaults.max_iterations);

    let depiction_file = file_config.depiction.take().unwrap_or_default();
    let width = depiction_file.width.unwrap_or(defaults.width);
    let height = depiction_file.height.unwrap_or(defaults.height);

    let core_config = TutorialConfigBuilder::new()
        .output_root(output_root)
        .subtitle(args.tutorial.clone())
        .java(java)
        .opsin_jar(opsin_jar)
        .timeout(Duration::from_secs(timeout_secs))
        .seed(seed)
        .max_attempts(max_attempts)
        .max_iterations(max_iterations)
        .image_size(width, height)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Resolved configuration: {:?}", core_config);

    Ok(AppConfig {
        selectors: Selectors {
            name: args.input.name.clone(),
            smiles: args.input.smiles.clone(),
            inchi: args.input.inchi.clone(),
            formula: args.input.formula.clone(),
        },
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair).map_err(config_error)?;

        match key {
            "output.root" => {
                config.output.get_or_insert_with(Default::default).root = Some(PathBuf::from(value));
            }
            "converter.java" => {
                config.converter.get_or_insert_with(Default::default).java = Some(PathBuf::from(value));
            }
            "converter.opsin-jar" => {
                config.converter.get_or_insert_with(Default::default).opsin_jar =
                    Some(PathBuf::from(value));
            }
            "converter.timeout-secs" => {
                config.converter.get_or_insert_with(Default::default).timeout_secs =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            "conformer.seed" => {
                config.conformer.get_or_insert_with(Default::default).seed =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            "conformer.max-attempts" => {
                config.conformer.get_or_insert_with(Default::default).max_attempts =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            "conformer.max-iterations" => {
                config.conformer.get_or_insert_with(Default::default).max_iterations =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            "depiction.width" => {
                config.depiction.get_or_insert_with(Default::default).width =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            "depiction.height" => {
                config.depiction.get_or_insert_with(Default::default).height =
                    Some(parser::parse_value(key, value, "integer").map_err(config_error)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn config_error(e: ParseError) -> CliError {
    CliError::Config(e.to_string())
}
