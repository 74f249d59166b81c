//! Invocation of the external model.
//!
//! The model is a collaborator: it receives a top-level configuration file and
//! a batch manifest, runs to completion, and reports an exit status. Failures
//! are values ([`RunOutcome`]), never `Err`.

pub mod mock;

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::debug;

/// Environment variable carrying the top-level configuration path.
pub const DEFAULT_CONFIG_ENV: &str = "GCAM_CONFIG_FILE";
/// Environment variable carrying the batch manifest path.
pub const DEFAULT_BATCH_ENV: &str = "BATCH_FILE";

/// How a model invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited with this code.
    Exited(i32),
    /// Process was killed by a signal.
    Terminated,
    /// No executable at the expected path.
    NotFound,
    /// The process could not be spawned.
    LaunchFailed(String),
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Exited(code) => write!(f, "exited with status {code}"),
            RunStatus::Terminated => f.write_str("terminated by signal"),
            RunStatus::NotFound => f.write_str("executable not found"),
            RunStatus::LaunchFailed(msg) => write!(f, "launch failed: {msg}"),
        }
    }
}

/// Exit status plus captured output of one model run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Exited(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: RunStatus::NotFound,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn launch_failed(msg: impl Into<String>) -> Self {
        Self {
            status: RunStatus::LaunchFailed(msg.into()),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// True only for a zero exit status.
    pub fn success(&self) -> bool {
        self.status == RunStatus::Exited(0)
    }
}

/// Something that can execute the model.
pub trait ModelRunner {
    fn run(&self, executable: &Path, config_file: &Path, batch_file: &Path) -> RunOutcome;
}

/// Runs the model as a child process and waits for it.
///
/// Paths are handed over through environment variables.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    config_env: String,
    batch_env: String,
}

impl ProcessRunner {
    pub fn new(config_env: impl Into<String>, batch_env: impl Into<String>) -> Self {
        Self {
            config_env: config_env.into(),
            batch_env: batch_env.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_ENV, DEFAULT_BATCH_ENV)
    }
}

impl ModelRunner for ProcessRunner {
    fn run(&self, executable: &Path, config_file: &Path, batch_file: &Path) -> RunOutcome {
        if !executable.is_file() {
            return RunOutcome::not_found();
        }
        debug!(
            "spawning {} with {}={} {}={}",
            executable.display(),
            self.config_env,
            config_file.display(),
            self.batch_env,
            batch_file.display()
        );

        let output = match Command::new(executable)
            .env(&self.config_env, config_file)
            .env(&self.batch_env, batch_file)
            .output()
        {
            Ok(output) => output,
            Err(e) => return RunOutcome::launch_failed(e.to_string()),
        };

        RunOutcome {
            status: match output.status.code() {
                Some(code) => RunStatus::Exited(code),
                None => RunStatus::Terminated,
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
