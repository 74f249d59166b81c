//! # gcam-sampling-workflow
//!
//! End-to-end driver for GCAM parameter sampling:
//!
//! 1. Build the parameter space (standard set or a CSV config)
//! 2. Draw samples with the selected strategy
//! 3. Save the sample table and a diagnostic plot
//! 4. Write per-scenario parameter fragments and the batch manifest
//! 5. Optionally run GCAM over the manifest
//!
//! Every step is recorded in a JSONL audit trail inside the output directory.

pub mod audit;
pub mod config;
pub mod error;
pub mod logging;
pub mod workflow;
