use super::defaults::OPSIN_JAR_NAME;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform locations consulted when no explicit path is given.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// `config.toml` in the platform config directory; used only if it exists.
    pub config_file: Option<PathBuf>,
    /// Directory searched for `opsin.jar` after the working directory.
    pub data_dir: Option<PathBuf>,
}

impl SearchPaths {
    pub fn discover() -> Self {
        match ProjectDirs::from("org", "chem-autotutor", "autotutor") {
            Some(dirs) => {
                let paths = Self {
                    config_file: Some(dirs.config_dir().join(CONFIG_FILE_NAME)),
                    data_dir: Some(dirs.data_dir().to_path_buf()),
                };
                debug!("Search paths: {:?}", paths);
                paths
            }
            None => {
                warn!("Could not determine platform directories; only explicit paths are used.");
                Self::default()
            }
        }
    }

    /// The default config file, if one is present on disk.
    pub fn existing_config_file(&self) -> Option<PathBuf> {
        self.config_file.clone().filter(|p| p.is_file())
    }

    /// `./opsin.jar`, then `<data dir>/opsin.jar`; falls back to the bare
    /// file name so the converter reports a clear launch error.
    pub fn locate_opsin_jar(&self) -> PathBuf {
        let local = PathBuf::from(OPSIN_JAR_NAME);
        if local.is_file() {
            return local;
        }
        if let Some(candidate) = self
            .data_dir
            .as_ref()
            .map(|dir| dir.join(OPSIN_JAR_NAME))
            .filter(|p| p.is_file())
        {
            return candidate;
        }
        local
    }
}
