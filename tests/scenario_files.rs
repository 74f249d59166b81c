//! Integration tests for scenario fragment files and batch manifests.

use std::fs;

use gcam_sampling::fragment::parse_fragment;
use gcam_sampling::{
    Error, GcamParameterManager, Parameter, SampleMatrix, SamplingMethod, ScenarioSet,
    StrategyOptions,
};

fn manager_with(dir: &std::path::Path, params: &[(&str, f64, f64, &str)]) -> GcamParameterManager {
    let mut manager = GcamParameterManager::new("gcam-core", dir);
    for &(name, lower, upper, path) in params {
        manager.add_parameter(Parameter::new(name, lower, upper, path).unwrap());
    }
    manager
}

fn three_params() -> Vec<(&'static str, f64, f64, &'static str)> {
    vec![
        ("climate-sensitivity", 2.0, 4.5, "climate/magicc-input/climate_sensitivity"),
        ("interest-rate", 0.05, 0.10, "socioeconomics/interest_rate"),
        ("ccs-efficiency", 0.85, 0.95, "technology/ccs/efficiency"),
    ]
}

// ============================================================================
// Scenario generation
// ============================================================================

#[test]
fn n_rows_make_n_scenarios_of_d_files() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(dir.path(), &three_params());
    let space = manager.parameter_space();
    let options = StrategyOptions {
        seed: Some(7),
        ..StrategyOptions::default()
    };
    let samples = SamplingMethod::Halton
        .strategy(&options)
        .generate_samples(&space.lower_bounds(), &space.upper_bounds(), 5)
        .unwrap();

    let scenarios = manager
        .create_scenarios_from_samples("Halton Sequence Sampling", &samples, &space.names())
        .unwrap();

    assert_eq!(scenarios.len(), 5);
    for (i, scenario) in scenarios.iter().enumerate() {
        assert_eq!(
            scenario.name(),
            format!("Halton Sequence Sampling_scenario_{}", i + 1)
        );
        assert_eq!(scenario.files().len(), 3);
        assert_eq!(scenario.values().len(), 3);
        for (j, (name, value)) in scenario.values().iter().enumerate() {
            assert_eq!(name, &space.names()[j]);
            assert_eq!(*value, samples.get(i, j));
        }
    }

    let dir_entries = fs::read_dir(dir.path().join("parameters")).unwrap().count();
    assert_eq!(dir_entries, 5);
}

#[test]
fn fragment_files_hold_sampled_values() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(dir.path(), &three_params());
    let samples = SampleMatrix::from_rows(vec![vec![3.25, 0.075, 0.9]]).unwrap();
    let names = manager.parameter_space().names();

    let scenarios = manager
        .create_scenarios_from_samples("manual", &samples, &names)
        .unwrap();
    let path = scenarios[0].file("climate-sensitivity").unwrap();
    assert_eq!(
        path,
        dir.path()
            .join("parameters")
            .join("manual_scenario_1")
            .join("climate_sensitivity.xml")
    );

    let parsed = parse_fragment(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(parsed.root, "scenario");
    assert_eq!(parsed.path, vec!["climate", "magicc-input", "climate_sensitivity"]);
    assert_eq!(parsed.value().unwrap(), 3.25);
}

#[test]
fn width_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(dir.path(), &three_params());
    let samples = SampleMatrix::from_rows(vec![vec![3.0, 0.07], vec![2.5, 0.06]]).unwrap();
    let names = manager.parameter_space().names();

    let err = manager
        .create_scenarios_from_samples("manual", &samples, &names)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 3,
            found: 2
        }
    ));
    assert!(!dir.path().join("parameters").exists());
}

#[test]
fn unknown_parameter_name_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(dir.path(), &three_params());
    let samples = SampleMatrix::from_rows(vec![vec![0.3]]).unwrap();

    let err = manager
        .create_scenarios_from_samples("manual", &samples, &["albedo".to_string()])
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref name) if name == "albedo"));
}

#[test]
fn readding_parameter_replaces_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_with(dir.path(), &three_params());
    let old = manager.add_parameter(
        Parameter::new("interest-rate", 0.02, 0.04, "economy/rate")
            .unwrap()
            .with_units("fraction"),
    );

    assert_eq!(old.unwrap().upper_bound(), 0.10);
    let space = manager.parameter_space();
    assert_eq!(space.size(), 3);
    assert_eq!(space.names()[1], "interest-rate");
    assert_eq!(space.lower_bounds()[1], 0.02);
    assert_eq!(space.get("interest-rate").unwrap().xml_path(), "economy/rate");
}

// ============================================================================
// Batch manifest
// ============================================================================

#[test]
fn batch_lists_every_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(dir.path(), &three_params());
    let samples =
        SampleMatrix::from_rows(vec![vec![3.0, 0.07, 0.9], vec![2.5, 0.06, 0.88]]).unwrap();
    let names = manager.parameter_space().names();
    let scenarios = manager
        .create_scenarios_from_samples("Random Sampling", &samples, &names)
        .unwrap();
    let first_file = scenarios[0].file("ccs-efficiency").unwrap().to_path_buf();

    let out = dir.path().join(gcam_sampling::DEFAULT_BATCH_FILE);
    let written = manager
        .create_batch_file(&[ScenarioSet::new("random_analysis", scenarios)], &out)
        .unwrap();
    assert_eq!(written, out);

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<ComponentSet name=\"random_analysis\">"));
    assert!(xml.contains("<FileSet name=\"Random Sampling_scenario_2\">"));
    assert_eq!(xml.matches("<Value ").count(), 6);
    assert!(xml.contains(&format!(
        "<Value name=\"ccs-efficiency\">{}</Value>",
        first_file.display()
    )));
    assert!(xml.contains("<single-scenario-runner/>"));
}

#[test]
fn standard_parameters_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = GcamParameterManager::new("gcam-core", dir.path());
    manager.define_standard_parameters().unwrap();
    let space = manager.parameter_space();
    let defaults: Vec<(String, f64)> = space
        .iter()
        .map(|p| (p.name().to_string(), p.default_value()))
        .collect();

    let paths = manager.create_parameter_files("defaults", &defaults).unwrap();
    assert_eq!(paths.len(), 6);
    for (path, (_, value)) in paths.iter().zip(&defaults) {
        let parsed = parse_fragment(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.value().unwrap(), *value);
    }
}
