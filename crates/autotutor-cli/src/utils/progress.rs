use autotutor::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;
/// Resolve, enrich and write.
const EXPECTED_PHASES: u32 = 3;

struct DisplayState {
    bar: ProgressBar,
    phase_index: u32,
    phase_name: &'static str,
    written: Vec<&'static str>,
}

/// Renders tutorial progress on stderr: one spinner line per phase, and a
/// file counter while the bundle is written.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<DisplayState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(Self::spinner_style());
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(DisplayState {
                bar,
                phase_index: 0,
                phase_name: "",
                written: Vec::new(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress display lock was poisoned; dropping event.");
                return;
            };
            state.apply(progress);
        })
    }

    /// Files reported as written so far, in order.
    pub fn written_files(&self) -> Vec<&'static str> {
        self.state
            .lock()
            .map(|s| s.written.clone())
            .unwrap_or_default()
    }

    /// Removes whatever is still drawn, e.g. after a failed phase.
    pub fn clear(&self) {
        if let Ok(state) = self.state.lock() {
            state.bar.disable_steady_tick();
            state.bar.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:.bold.dim} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn files_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:.bold.dim} {msg:<24} [{bar:30.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl DisplayState {
    fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.phase_index += 1;
                self.phase_name = name;
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(CliProgressHandler::spinner_style());
                self.bar
                    .set_prefix(format!("[{}/{}]", self.phase_index, EXPECTED_PHASES));
                self.bar.set_message(format!("{}...", name));
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(format!("{} ✓", self.phase_name));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_style(CliProgressHandler::files_style());
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
            }
            Progress::ArtifactWritten { file } => {
                self.written.push(file);
                self.bar.set_message(file);
            }
            Progress::Message(msg) => {
                if self.bar.is_finished() {
                    self.bar.set_message(msg);
                } else {
                    self.bar.println(format!("  {}", msg));
                }
            }
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn bar(handler: &CliProgressHandler) -> ProgressBar {
        handler.state.lock().unwrap().bar.clone()
    }

    #[test]
    fn starts_hidden_and_idle() {
        let handler = CliProgressHandler::new();
        assert!(bar(&handler).is_finished());
        assert!(handler.written_files().is_empty());
    }

    #[test]
    fn phases_are_numbered_and_finished_with_their_name() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Resolving input",
        });
        let pb = bar(&handler);
        assert_eq!(pb.prefix(), "[1/3]");
        assert_eq!(pb.message(), "Resolving input...");
        assert!(!pb.is_finished());

        callback(Progress::PhaseFinish);
        assert_eq!(bar(&handler).message(), "Resolving input ✓");

        callback(Progress::PhaseStart {
            name: "Enriching structure",
        });
        assert_eq!(bar(&handler).prefix(), "[2/3]");
        handler.clear();
    }

    #[test]
    fn bundle_files_are_counted_and_recorded() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Writing bundle",
        });
        callback(Progress::TaskStart { total_steps: 4 });
        for file in ["index.html", "voiceover.txt"] {
            callback(Progress::ArtifactWritten { file });
            callback(Progress::TaskIncrement);
        }
        let pb = bar(&handler);
        assert_eq!(pb.length(), Some(4));
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.message(), "voiceover.txt");

        callback(Progress::TaskFinish);
        assert_eq!(bar(&handler).position(), 4);
        assert_eq!(handler.written_files(), vec!["index.html", "voiceover.txt"]);
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Writing bundle" });
            callback(Progress::ArtifactWritten { file: "model.sdf" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(bar(&handler).is_finished());
        assert_eq!(handler.written_files(), vec!["model.sdf"]);
    }

    #[test]
    fn clear_finishes_a_running_spinner() {
        let handler = CliProgressHandler::new();
        handler.get_callback()(Progress::PhaseStart {
            name: "Enriching structure",
        });
        handler.clear();
        assert!(bar(&handler).is_finished());
    }
}
