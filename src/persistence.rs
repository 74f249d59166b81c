//! Tabular persistence: parameter configuration in, sample table out.
//!
//! The parameter file is header-driven CSV:
//!
//! ```text
//! name,lower_bound,upper_bound,units,description,xml_path,default_value
//! albedo,0.2,0.4,fraction,Surface albedo,climate/albedo,
//! ```
//!
//! `units`, `description`, `xml_path` and `default_value` may be omitted.

use std::path::Path;

use log::{error, info, warn};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::matrix::SampleMatrix;
use crate::parameter::Parameter;

/// One row of the parameter configuration file.
#[derive(Debug, Clone, Deserialize)]
struct ParameterRow {
    name: String,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    units: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    xml_path: String,
    #[serde(default)]
    default_value: Option<f64>,
}

impl ParameterRow {
    fn into_parameter(self) -> Result<Parameter> {
        let mut parameter = Parameter::new(self.name, self.lower_bound, self.upper_bound, self.xml_path)?
            .with_units(self.units)
            .with_description(self.description);
        if let Some(default_value) = self.default_value {
            parameter = parameter.with_default(default_value);
        }
        Ok(parameter)
    }
}

/// Read parameters from a CSV file. Any malformed row fails the whole load.
pub fn load_parameters(path: &Path) -> Result<Vec<Parameter>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::ConfigLoad(format!("{}: {e}", path.display())))?;

    let mut parameters = Vec::new();
    for (line, row) in reader.deserialize::<ParameterRow>().enumerate() {
        let row = row.map_err(|e| Error::ConfigLoad(format!("{}: {e}", path.display())))?;
        let parameter = row.into_parameter().map_err(|e| {
            Error::ConfigLoad(format!("{} row {}: {e}", path.display(), line + 1))
        })?;
        parameters.push(parameter);
    }
    Ok(parameters)
}

/// Like [`load_parameters`], but a missing or malformed file is logged and
/// yields no parameters.
pub fn load_custom_parameters(path: &Path) -> Vec<Parameter> {
    if !path.exists() {
        warn!("parameter config file not found: {}", path.display());
        return Vec::new();
    }
    match load_parameters(path) {
        Ok(parameters) => {
            info!(
                "loaded {} custom parameters from {}",
                parameters.len(),
                path.display()
            );
            parameters
        }
        Err(e) => {
            error!("error loading parameter config: {e}");
            Vec::new()
        }
    }
}

/// Write the sample matrix as CSV: one column per parameter, then `scenario`.
///
/// `scenario_names[i]` labels sample row `i`.
pub fn write_sample_table(
    path: &Path,
    parameter_names: &[String],
    samples: &SampleMatrix,
    scenario_names: &[String],
) -> Result<()> {
    if parameter_names.len() != samples.num_dimensions() {
        return Err(Error::DimensionMismatch {
            expected: parameter_names.len(),
            found: samples.num_dimensions(),
        });
    }
    if scenario_names.len() != samples.num_samples() {
        return Err(Error::DimensionMismatch {
            expected: samples.num_samples(),
            found: scenario_names.len(),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut header: Vec<&str> = parameter_names.iter().map(String::as_str).collect();
    header.push("scenario");
    writer.write_record(&header)?;

    for (row, scenario) in samples.rows().zip(scenario_names) {
        let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        record.push(scenario.clone());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
