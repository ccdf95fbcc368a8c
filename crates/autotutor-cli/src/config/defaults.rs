use std::path::PathBuf;

/// File name of the OPSIN jar searched for when none is configured.
pub const OPSIN_JAR_NAME: &str = "opsin.jar";

pub struct DefaultsConfig {
    pub output_root: PathBuf,
    pub java: PathBuf,
    pub timeout_secs: u64,
    pub seed: u64,
    pub max_attempts: u32,
    pub max_iterations: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("out"),
            java: PathBuf::from("java"),
            timeout_secs: 60,
            seed: 42,
            max_attempts: 10,
            max_iterations: 2000,
            width: 800,
            height: 520,
        }
    }
}
