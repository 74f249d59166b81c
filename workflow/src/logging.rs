//! Logger setup: `env_logger` to stderr, optionally tee'd into a log file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Writes every record to stderr and to a second sink.
pub struct Tee<W: Write> {
    sink: W,
}

impl<W: Write> Tee<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.sink.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.sink.flush()
    }
}

/// Install the global logger.
///
/// `level` is the default filter; `RUST_LOG` still takes precedence.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee::new(file))));
    }

    builder
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Logging(format!("cannot open log file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_copies_into_sink() {
        let mut tee = Tee::new(Vec::new());
        write!(tee, "[INFO] sampling started").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.into_inner(), b"[INFO] sampling started");
    }

    #[test]
    fn log_file_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("workflow.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
