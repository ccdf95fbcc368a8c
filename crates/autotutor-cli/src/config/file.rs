use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<FileOutputConfig>,
    pub converter: Option<FileConverterConfig>,
    pub conformer: Option<FileConformerConfig>,
    pub depiction: Option<FileDepictionConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub root: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConverterConfig {
    pub java: Option<PathBuf>,
    pub opsin_jar: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConformerConfig {
    pub seed: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_iterations: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDepictionConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Cannot read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_kebab_case_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [output]
            root = "tutorials"

            [converter]
            java = "/usr/bin/java"
            opsin-jar = "/opt/opsin/opsin.jar"
            timeout-secs = 30

            [conformer]
            seed = 7
            max-attempts = 3
            max-iterations = 500

            [depiction]
            width = 640
            height = 480
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let converter = config.converter.unwrap();
        assert_eq!(config.output.unwrap().root, Some(PathBuf::from("tutorials")));
        assert_eq!(converter.opsin_jar, Some(PathBuf::from("/opt/opsin/opsin.jar")));
        assert_eq!(converter.timeout_secs, Some(30));
        assert_eq!(config.conformer.unwrap().max_attempts, Some(3));
        assert_eq!(config.depiction.unwrap().height, Some(480));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(FileConfig::from_file(&path).unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[conformer]\nmax_attempts = 3\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: p, .. } if p == path));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(&err, CliError::Config(message) if message.contains("absent.toml")));
        assert_eq!(err.exit_code(), 2);
    }
}
