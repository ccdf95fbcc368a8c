use super::config::ConverterConfig;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("Failed to launch '{program}': {source}", program = program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Converter did not finish within {0:?} and was killed")]
    Timeout(Duration),
    #[error("Converter returned no structure: {stderr}")]
    Empty { stderr: String },
    #[error("Converter returned a malformed structure string '{0}'")]
    Malformed(String),
    #[error("I/O error while exchanging files with the converter: {0}")]
    Io(#[from] io::Error),
}

/// Converts a systematic or trivial chemical name into a SMILES string.
pub trait NameResolver {
    /// # Errors
    ///
    /// Returns [`ConverterError`] when the name cannot be converted.
    fn resolve(&self, name: &str) -> Result<String, ConverterError>;
}

/// Runs the OPSIN command-line jar as a blocking subprocess.
///
/// The name goes into a temporary input file, OPSIN writes SMILES into a
/// temporary output file (`java -jar opsin.jar -osmi <in> <out>`), and the
/// first whitespace-delimited token of the first output line is taken as the
/// result. All temporary files are removed when the call returns.
#[derive(Debug, Clone)]
pub struct OpsinResolver {
    java: PathBuf,
    jar: PathBuf,
    timeout: Duration,
}

impl OpsinResolver {
    pub fn new(java: PathBuf, jar: PathBuf, timeout: Duration) -> Self {
        Self { java, jar, timeout }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(
            config.java.clone(),
            config.opsin_jar.clone(),
            config.timeout,
        )
    }
}

impl NameResolver for OpsinResolver {
    fn resolve(&self, name: &str) -> Result<String, ConverterError> {
        let input = tempfile::Builder::new().prefix("opsin_in_").tempfile()?;
        let output = tempfile::Builder::new().prefix("opsin_out_").tempfile()?;
        let diagnostics = tempfile::Builder::new().prefix("opsin_err_").tempfile()?;
        fs::write(input.path(), format!("{}\n", name.trim()))?;

        debug!(
            "Running {} -jar {} -osmi {:?} {:?}",
            self.java.display(),
            self.jar.display(),
            input.path(),
            output.path()
        );
        let mut child = Command::new(&self.java)
            .arg("-jar")
            .arg(&self.jar)
            .arg("-osmi")
            .arg(input.path())
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(diagnostics.reopen()?))
            .spawn()
            .map_err(|source| ConverterError::Launch {
                program: self.java.clone(),
                source,
            })?;

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                warn!("Converter exceeded {:?}; killing it.", self.timeout);
                child.kill()?;
                child.wait()?;
                return Err(ConverterError::Timeout(self.timeout));
            }
        };

        let stderr = read_lossy(diagnostics.reopen()?)?.trim().to_string();
        if !status.success() {
            return Err(ConverterError::Failed {
                status: status.to_string(),
                stderr,
            });
        }

        let text = read_lossy(File::open(output.path())?)?;
        let token = text
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("");
        if token.is_empty() {
            return Err(ConverterError::Empty { stderr });
        }
        if !is_smiles_token(token) {
            return Err(ConverterError::Malformed(token.to_string()));
        }
        Ok(token.to_string())
    }
}

fn read_lossy(mut file: File) -> io::Result<String> {
    let mut bytes = Vec::new();
    io::Read::read_to_end(&mut file, &mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Accepts the character set of SMILES line notation.
fn is_smiles_token(token: &str) -> bool {
    token.chars().all(|c| {
        c.is_ascii_alphanumeric() || "[]()=#$:/\\.%+-@*".contains(c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smiles_charset_check() {
        assert!(is_smiles_token("C=CC(C)C(Br)CC#C"));
        assert!(is_smiles_token("[NH4+].[Cl-]"));
        assert!(is_smiles_token("C[C@@H](O)c1ccccc1"));
        assert!(!is_smiles_token("<html>"));
        assert!(!is_smiles_token("C;C"));
    }

    #[test]
    #[serial_test::serial]
    fn missing_program_is_a_launch_error() {
        let resolver = OpsinResolver::new(
            PathBuf::from("/nonexistent/bin/java-for-tests"),
            PathBuf::from("opsin.jar"),
            Duration::from_secs(5),
        );
        assert!(matches!(
            resolver.resolve("ethanol"),
            Err(ConverterError::Launch { .. })
        ));
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use serial_test::serial;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Writes an executable stand-in for `java`. Its arguments are
        /// `-jar <jar> -osmi <in> <out>`, so the output path is `$5`.
        fn fake_java(body: &str) -> (TempDir, OpsinResolver) {
            let dir = tempfile::tempdir().unwrap();
            let script = dir.path().join("java");
            fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            let resolver = OpsinResolver::new(
                script,
                dir.path().join("opsin.jar"),
                Duration::from_secs(5),
            );
            (dir, resolver)
        }

        #[test]
        #[serial]
        fn reads_first_token_of_first_line() {
            let (_dir, resolver) =
                fake_java("printf 'C=CC(C)C(Br)CC#C\\tname\\nextra\\n' > \"$5\"");
            assert_eq!(resolver.resolve("4-bromo-3-methylhept-1-en-6-yne").unwrap(), "C=CC(C)C(Br)CC#C");
        }

        #[test]
        #[serial]
        fn passes_the_name_through_the_input_file() {
            let (_dir, resolver) = fake_java("[ \"$(cat \"$4\")\" = ethanol ] && echo CCO > \"$5\"");
            assert_eq!(resolver.resolve("  ethanol ").unwrap(), "CCO");
        }

        #[test]
        #[serial]
        fn non_zero_exit_propagates_stderr_verbatim() {
            let (_dir, resolver) =
                fake_java("echo 'uk.ac.cam.ch.wwmm.opsin.ParsingException: bogusane is unparsable' >&2\nexit 3");
            match resolver.resolve("bogusane") {
                Err(ConverterError::Failed { stderr, .. }) => assert_eq!(
                    stderr,
                    "uk.ac.cam.ch.wwmm.opsin.ParsingException: bogusane is unparsable"
                ),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        #[serial]
        fn empty_output_is_an_error() {
            let (_dir, resolver) = fake_java("echo 'could not parse' >&2\n: > \"$5\"");
            match resolver.resolve("???") {
                Err(ConverterError::Empty { stderr }) => assert_eq!(stderr, "could not parse"),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        #[serial]
        fn malformed_output_is_rejected() {
            let (_dir, resolver) = fake_java("echo '<error/>' > \"$5\"");
            assert!(matches!(
                resolver.resolve("x"),
                Err(ConverterError::Malformed(token)) if token == "<error/>"
            ));
        }

        #[test]
        #[serial]
        fn slow_converter_times_out() {
            let (_dir, resolver) = fake_java("sleep 5\necho C > \"$5\"");
            let resolver = OpsinResolver {
                timeout: Duration::from_millis(200),
                ..resolver
            };
            assert!(matches!(
                resolver.resolve("methane"),
                Err(ConverterError::Timeout(_))
            ));
        }
    }
}
