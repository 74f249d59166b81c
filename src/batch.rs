//! Batch manifest consumed by the model's batch runner.
//!
//! ```text
//! <BatchRunner>
//!   <ComponentSet name="lhs_analysis">
//!     <FileSet name="Latin Hypercube Sampling_scenario_1">
//!       <Value name="climate-sensitivity">outputs/parameters/.../climate_sensitivity.xml</Value>
//!     </FileSet>
//!   </ComponentSet>
//!   <runner-set>
//!     <single-scenario-runner/>
//!   </runner-set>
//! </BatchRunner>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::scenario::ScenarioSet;
use crate::xml::XmlDocument;

/// Default manifest file name.
pub const DEFAULT_BATCH_FILE: &str = "parameter_sampling_batch.xml";

/// Serialize `sets` into the manifest document.
pub fn render_batch(sets: &[ScenarioSet]) -> Result<String> {
    let mut doc = XmlDocument::new()?;
    doc.open("BatchRunner", &[])?;
    for set in sets {
        doc.open("ComponentSet", &[("name", set.name.as_str())])?;
        for scenario in &set.scenarios {
            doc.open("FileSet", &[("name", scenario.name())])?;
            for (parameter, path) in scenario.files() {
                let path = path.to_string_lossy();
                doc.leaf("Value", &[("name", parameter.as_str())], &path)?;
            }
            doc.close("FileSet")?;
        }
        doc.close("ComponentSet")?;
    }
    doc.open("runner-set", &[])?;
    doc.empty("single-scenario-runner")?;
    doc.close("runner-set")?;
    doc.close("BatchRunner")?;
    doc.finish()
}

/// Write the manifest for `sets` to `output_file`, creating parent directories.
pub fn create_batch_file(sets: &[ScenarioSet], output_file: &Path) -> Result<PathBuf> {
    let xml = render_batch(sets)?;
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_file, xml)?;
    Ok(output_file.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn sample_set() -> ScenarioSet {
        let scenario = Scenario::new(
            "Random Sampling_scenario_1".into(),
            vec![("ccs-efficiency".into(), 0.9)],
            vec![("ccs-efficiency".into(), PathBuf::from("out/ccs_efficiency.xml"))],
        );
        ScenarioSet::new("random_analysis", vec![scenario])
    }

    #[test]
    fn manifest_structure() {
        let xml = render_batch(&[sample_set()]).unwrap();
        assert!(xml.contains("<BatchRunner>"));
        assert!(xml.contains("<ComponentSet name=\"random_analysis\">"));
        assert!(xml.contains("<FileSet name=\"Random Sampling_scenario_1\">"));
        assert!(xml.contains("<Value name=\"ccs-efficiency\">out/ccs_efficiency.xml</Value>"));
        assert!(xml.contains("<single-scenario-runner/>"));

        let runner = xml.find("<runner-set>").unwrap();
        let last_set = xml.rfind("</ComponentSet>").unwrap();
        assert!(runner > last_set);
    }

    #[test]
    fn empty_batch_still_has_runner_marker() {
        let xml = render_batch(&[]).unwrap();
        assert!(xml.contains("<runner-set>"));
        assert!(xml.contains("<single-scenario-runner/>"));
    }

    #[test]
    fn writes_to_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("batch").join(DEFAULT_BATCH_FILE);
        let written = create_batch_file(&[sample_set()], &out).unwrap();
        assert_eq!(written, out);
        assert!(fs::read_to_string(&out).unwrap().ends_with("</BatchRunner>\n"));
    }
}
