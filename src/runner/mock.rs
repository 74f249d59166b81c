//! Mock model runner for tests: records invocations and returns a canned outcome.
//!
//! ```ignore
//! use gcam_sampling::runner::mock::MockRunner;
//!
//! let runner = MockRunner::builder()
//!     .exit_code(1)
//!     .stderr("solver failed")
//!     .build();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ModelRunner, RunOutcome, RunStatus};

/// A recorded invocation for assertion in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub executable: PathBuf,
    pub config_file: PathBuf,
    pub batch_file: PathBuf,
}

/// Builder for `MockRunner`.
pub struct MockRunnerBuilder {
    status: RunStatus,
    stdout: String,
    stderr: String,
}

impl MockRunnerBuilder {
    pub fn exit_code(mut self, code: i32) -> Self {
        self.status = RunStatus::Exited(code);
        self
    }

    pub fn status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn build(self) -> MockRunner {
        MockRunner {
            outcome: RunOutcome {
                status: self.status,
                stdout: self.stdout,
                stderr: self.stderr,
            },
            runs: Mutex::new(Vec::new()),
        }
    }
}

/// A runner that never spawns anything.
pub struct MockRunner {
    outcome: RunOutcome,
    runs: Mutex<Vec<RecordedRun>>,
}

impl MockRunner {
    /// Defaults to a successful run with empty output.
    pub fn builder() -> MockRunnerBuilder {
        MockRunnerBuilder {
            status: RunStatus::Exited(0),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// All invocations so far, oldest first.
    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ModelRunner for MockRunner {
    fn run(&self, executable: &Path, config_file: &Path, batch_file: &Path) -> RunOutcome {
        self.runs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRun {
                executable: executable.to_path_buf(),
                config_file: config_file.to_path_buf(),
                batch_file: batch_file.to_path_buf(),
            });
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_run() {
        let runner = MockRunner::builder().stdout("ok").build();
        let outcome = runner.run(
            Path::new("gcam/exe/gcam.exe"),
            Path::new("config.xml"),
            Path::new("batch.xml"),
        );
        assert!(outcome.success());
        assert_eq!(outcome.stdout, "ok");

        let runs = runner.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].batch_file, PathBuf::from("batch.xml"));
    }

    #[test]
    fn configured_failure() {
        let runner = MockRunner::builder().exit_code(2).stderr("diverged").build();
        let outcome = runner.run(Path::new("x"), Path::new("c"), Path::new("b"));
        assert!(!outcome.success());
        assert_eq!(outcome.status, RunStatus::Exited(2));
        assert_eq!(outcome.stderr, "diverged");
    }
}
