use super::error::WriteError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

pub const INDEX_HTML: &str = "index.html";
pub const MODEL_SDF: &str = "model.sdf";
pub const MODEL_PNG: &str = "model.png";
pub const VOICEOVER: &str = "voiceover.txt";
pub const CAPTIONS: &str = "captions.srt";
pub const DESCRIPTION: &str = "YOUTUBE_DESCRIPTION.md";

const STAGING_PREFIX: &str = ".autotutor-";

/// A finished bundle directory and the files it holds, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBundle {
    pub path: PathBuf,
    pub files: Vec<&'static str>,
}

/// A bundle being assembled in a hidden sibling of its final location.
///
/// Nothing is visible under the final name until [`BundleStage::commit`]
/// succeeds. Dropping an uncommitted stage deletes everything written so far.
pub struct BundleStage {
    staging: TempDir,
    target: PathBuf,
    written: Vec<&'static str>,
}

impl BundleStage {
    /// Creates the output root if needed and a fresh staging directory in it.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if either directory cannot be created.
    pub fn create(output_root: &Path, slug: &str) -> Result<Self, WriteError> {
        fs::create_dir_all(output_root).map_err(WriteError::io(output_root))?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(output_root)
            .map_err(WriteError::io(output_root))?;
        debug!("Staging bundle '{}' in {}.", slug, staging.path().display());
        Ok(Self {
            staging,
            target: output_root.join(slug),
            written: Vec::new(),
        })
    }

    pub fn staging_path(&self) -> &Path {
        self.staging.path()
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    pub fn files(&self) -> &[&'static str] {
        &self.written
    }

    pub fn write_text(&mut self, file: &'static str, contents: &str) -> Result<(), WriteError> {
        self.write_bytes(file, contents.as_bytes())
    }

    pub fn write_bytes(&mut self, file: &'static str, contents: &[u8]) -> Result<(), WriteError> {
        let path = self.staging.path().join(file);
        fs::write(&path, contents).map_err(WriteError::io(&path))?;
        if !self.written.contains(&file) {
            self.written.push(file);
        }
        Ok(())
    }

    /// Replaces any existing bundle at the target with the staged files.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the previous bundle cannot be removed or
    /// the staging directory cannot be moved into place. The staging
    /// directory is deleted in either case.
    pub fn commit(self) -> Result<OutputBundle, WriteError> {
        match fs::symlink_metadata(&self.target) {
            Ok(meta) if meta.is_dir() => {
                warn!("Replacing existing bundle at {}.", self.target.display());
                fs::remove_dir_all(&self.target).map_err(WriteError::io(&self.target))?;
            }
            Ok(_) => {
                warn!("Replacing file at {} with a bundle directory.", self.target.display());
                fs::remove_file(&self.target).map_err(WriteError::io(&self.target))?;
            }
            Err(_) => {}
        }
        fs::rename(self.staging.path(), &self.target).map_err(WriteError::io(&self.target))?;
        info!(
            "Bundle with {} files committed to {}.",
            self.written.len(),
            self.target.display()
        );
        // The staging path no longer exists; dropping the guard is a no-op.
        Ok(OutputBundle {
            path: self.target,
            files: self.written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn commit_moves_staged_files_into_place() {
        let root = tempdir().unwrap();
        let mut stage = BundleStage::create(root.path(), "ethanol").unwrap();
        assert!(stage.staging_path().starts_with(root.path()));
        stage.write_text(VOICEOVER, "Title: ethanol\n").unwrap();
        stage.write_bytes(MODEL_PNG, &[0x89, b'P', b'N', b'G']).unwrap();
        assert!(!root.path().join("ethanol").exists());

        let bundle = stage.commit().unwrap();
        assert_eq!(bundle.path, root.path().join("ethanol"));
        assert_eq!(bundle.files, vec![VOICEOVER, MODEL_PNG]);
        assert_eq!(entries(root.path()), vec!["ethanol"]);
        assert_eq!(
            fs::read_to_string(bundle.path.join(VOICEOVER)).unwrap(),
            "Title: ethanol\n"
        );
    }

    #[test]
    fn dropping_an_uncommitted_stage_leaves_nothing() {
        let root = tempdir().unwrap();
        {
            let mut stage = BundleStage::create(root.path(), "ethanol").unwrap();
            stage.write_text(INDEX_HTML, "<html></html>").unwrap();
        }
        assert!(entries(root.path()).is_empty());
    }

    #[test]
    fn commit_replaces_previous_bundle_wholesale() {
        let root = tempdir().unwrap();
        let old = root.path().join("ethanol");
        fs::create_dir_all(&old).unwrap();
        fs::write(old.join("stale.txt"), "old").unwrap();
        fs::write(old.join(CAPTIONS), "old").unwrap();

        let mut stage = BundleStage::create(root.path(), "ethanol").unwrap();
        stage.write_text(CAPTIONS, "new").unwrap();
        stage.commit().unwrap();

        assert_eq!(entries(&old), vec![CAPTIONS]);
        assert_eq!(fs::read_to_string(old.join(CAPTIONS)).unwrap(), "new");
    }

    #[test]
    fn rewriting_a_file_is_listed_once() {
        let root = tempdir().unwrap();
        let mut stage = BundleStage::create(root.path(), "x").unwrap();
        stage.write_text(DESCRIPTION, "a").unwrap();
        stage.write_text(DESCRIPTION, "b").unwrap();
        assert_eq!(stage.files(), [DESCRIPTION]);
    }

    #[test]
    fn create_fails_when_root_is_a_file() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("out");
        fs::write(&blocker, "not a directory").unwrap();
        let err = BundleStage::create(&blocker, "x").err().unwrap();
        assert!(matches!(err, WriteError::Io { path, .. } if path == blocker));
    }
}
