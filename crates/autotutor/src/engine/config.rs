use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Largest accepted depiction edge, in pixels.
const MAX_IMAGE_EDGE: u32 = 8192;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How the external name-to-structure converter is launched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    pub java: PathBuf,
    pub opsin_jar: PathBuf,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConformerConfig {
    pub seed: u64,
    pub max_attempts: u32,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepictionConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialConfig {
    /// Directory under which `<slug>/` bundles are created.
    pub output_root: PathBuf,
    /// Optional subtitle shown under the page title.
    pub subtitle: Option<String>,
    pub converter: ConverterConfig,
    pub conformer: ConformerConfig,
    pub depiction: DepictionConfig,
}

#[derive(Default)]
pub struct TutorialConfigBuilder {
    output_root: Option<PathBuf>,
    subtitle: Option<String>,
    java: Option<PathBuf>,
    opsin_jar: Option<PathBuf>,
    timeout: Option<Duration>,
    seed: Option<u64>,
    max_attempts: Option<u32>,
    max_iterations: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

impl TutorialConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_root(mut self, path: PathBuf) -> Self {
        self.output_root = Some(path);
        self
    }
    pub fn subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }
    pub fn java(mut self, path: PathBuf) -> Self {
        self.java = Some(path);
        self
    }
    pub fn opsin_jar(mut self, path: PathBuf) -> Self {
        self.opsin_jar = Some(path);
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
    pub fn max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn build(self) -> Result<TutorialConfig, ConfigError> {
        let converter = ConverterConfig {
            java: self.java.ok_or(ConfigError::MissingParameter("java"))?,
            opsin_jar: self
                .opsin_jar
                .ok_or(ConfigError::MissingParameter("opsin_jar"))?,
            timeout: self.timeout.ok_or(ConfigError::MissingParameter("timeout"))?,
        };
        if converter.timeout.is_zero() {
            return Err(invalid("timeout", "must be greater than zero"));
        }

        let conformer = ConformerConfig {
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            max_attempts: self
                .max_attempts
                .ok_or(ConfigError::MissingParameter("max_attempts"))?,
            max_iterations: self
                .max_iterations
                .ok_or(ConfigError::MissingParameter("max_iterations"))?,
        };
        if conformer.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if conformer.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }

        let depiction = DepictionConfig {
            width: self.width.ok_or(ConfigError::MissingParameter("width"))?,
            height: self.height.ok_or(ConfigError::MissingParameter("height"))?,
        };
        for (name, edge) in [("width", depiction.width), ("height", depiction.height)] {
            if edge == 0 || edge > MAX_IMAGE_EDGE {
                return Err(invalid(name, format!("must be between 1 and {}", MAX_IMAGE_EDGE)));
            }
        }

        Ok(TutorialConfig {
            output_root: self
                .output_root
                .ok_or(ConfigError::MissingParameter("output_root"))?,
            subtitle: self.subtitle.filter(|s| !s.trim().is_empty()),
            converter,
            conformer,
            depiction,
        })
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> TutorialConfigBuilder {
        TutorialConfigBuilder::new()
            .output_root(PathBuf::from("out"))
            .java(PathBuf::from("java"))
            .opsin_jar(PathBuf::from("opsin.jar"))
            .timeout(Duration::from_secs(60))
            .seed(42)
            .max_attempts(10)
            .max_iterations(2000)
            .image_size(800, 520)
    }

    #[test]
    fn builds_complete_config() {
        let config = complete()
            .subtitle(Some("Tutorial 01".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.subtitle.as_deref(), Some("Tutorial 01"));
        assert_eq!(config.conformer.seed, 42);
        assert_eq!(config.depiction.width, 800);
        assert_eq!(config.converter.timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_parameter_is_reported_by_name() {
        let result = TutorialConfigBuilder::new()
            .java(PathBuf::from("java"))
            .opsin_jar(PathBuf::from("opsin.jar"))
            .timeout(Duration::from_secs(1))
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("seed")));

        let result = complete().build().map(|_| ());
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            complete().max_attempts(0).build(),
            Err(ConfigError::InvalidParameter { name: "max_attempts", .. })
        ));
        assert!(matches!(
            complete().image_size(0, 520).build(),
            Err(ConfigError::InvalidParameter { name: "width", .. })
        ));
        assert!(matches!(
            complete().timeout(Duration::ZERO).build(),
            Err(ConfigError::InvalidParameter { name: "timeout", .. })
        ));
    }

    #[test]
    fn blank_subtitle_is_dropped() {
        let config = complete().subtitle(Some("   ".to_string())).build().unwrap();
        assert_eq!(config.subtitle, None);
    }
}
