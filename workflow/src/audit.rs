//! JSONL audit trail.
//!
//! Each workflow run appends events to the audit file in the output
//! directory, one JSON object per line. Every line carries the id of the run
//! that wrote it, so repeated runs into the same directory stay separable.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use gcam_sampling::{ParameterSpace, RunOutcome, SampleMatrix};
use serde::Serialize;

use crate::error::Result;

static RUN_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// One line of the trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent<'a> {
    pub run: &'a str,
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    /// Milliseconds since the run opened its log.
    pub elapsed_ms: i64,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit trail for a single workflow run.
pub struct AuditLog {
    writer: BufWriter<fs::File>,
    run: String,
    started: DateTime<Utc>,
}

impl AuditLog {
    /// Open (or create) the trail at `path` and start a new run id.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let started = Utc::now();

        Ok(Self {
            writer: BufWriter::new(file),
            run: format!(
                "{}-{}",
                started.format("%Y%m%dT%H%M%S%.6fZ"),
                RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed)
            ),
            started,
        })
    }

    /// Id stamped on every event of this run.
    pub fn run_id(&self) -> &str {
        &self.run
    }

    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let ts = Utc::now();
        let entry = AuditEvent {
            run: &self.run,
            event,
            ts,
            elapsed_ms: (ts - self.started).num_milliseconds(),
            data,
        };
        let json = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Record a step that carries no data.
    pub fn log_marker(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

pub fn log_run_started(
    audit: &mut AuditLog,
    method: &str,
    num_samples: usize,
    gcam_root: &Path,
    output_dir: &Path,
    seed: Option<u64>,
) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "method": method,
            "samples": num_samples,
            "gcam_root": gcam_root.display().to_string(),
            "output_dir": output_dir.display().to_string(),
            "seed": seed,
        }),
    )
}

pub fn log_parameters(audit: &mut AuditLog, space: &ParameterSpace, source: &str) -> Result<()> {
    let params: Vec<_> = space
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.name(),
                "lower": p.lower_bound(),
                "upper": p.upper_bound(),
                "units": p.units(),
                "xml_path": p.xml_path(),
            })
        })
        .collect();

    audit.log(
        "parameters_defined",
        serde_json::json!({
            "source": source,
            "parameters": params,
        }),
    )
}

pub fn log_samples(audit: &mut AuditLog, sampler: &str, samples: &SampleMatrix) -> Result<()> {
    let (rows, cols) = samples.shape();
    audit.log(
        "samples_generated",
        serde_json::json!({
            "sampler": sampler,
            "rows": rows,
            "dimensions": cols,
        }),
    )
}

pub fn log_scenarios(audit: &mut AuditLog, set_name: &str, count: usize) -> Result<()> {
    audit.log(
        "scenarios_created",
        serde_json::json!({
            "set": set_name,
            "count": count,
        }),
    )
}

pub fn log_batch_written(audit: &mut AuditLog, path: &Path) -> Result<()> {
    audit.log(
        "batch_written",
        serde_json::json!({ "path": path.display().to_string() }),
    )
}

pub fn log_model_run(audit: &mut AuditLog, outcome: &RunOutcome) -> Result<()> {
    audit.log(
        "model_run",
        serde_json::json!({
            "success": outcome.success(),
            "status": outcome.status.to_string(),
        }),
    )
}

pub fn log_run_completed(
    audit: &mut AuditLog,
    scenarios: usize,
    model_success: Option<bool>,
) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "scenarios": scenarios,
            "model_success": model_success,
        }),
    )
}
