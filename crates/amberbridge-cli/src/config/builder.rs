use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AmberOptions, AppConfig};
use crate::cli::{EvaluateArgs, JobArgs};
use crate::error::{CliError, Result};
use amberbridge::core::symmetry::cell::UnitCell;
use amberbridge::core::symmetry::space_group::{CrystalSymmetry, SpaceGroup};
use amberbridge::engine::config::AdapterConfigBuilder;
use amberbridge::engine::reduction::GradientReduction;
use nalgebra::Point3;
use std::path::PathBuf;
use std::str::FromStr;

/// Merges the job file, `--set` values, and (for `evaluate`) command-line overrides.
///
/// Command-line flags win over `--set` values, which win over the job file, which wins
/// over the defaults.
pub fn build_config(job: &JobArgs, evaluate: Option<&EvaluateArgs>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&job.config)?;
    let mut file_config = apply_set_values(file_config, &job.set_values)?;

    let crystal_file = file_config.crystal.take().unwrap_or_default();
    let cell = crystal_file
        .cell
        .ok_or_else(|| CliError::Config("`crystal.cell` is required.".to_string()))?;
    let unit_cell = UnitCell::from_parameters(cell)?;
    let space_group = match crystal_file.operations {
        Some(operations) => SpaceGroup::from_xyz(&operations)?,
        None => SpaceGroup::from_xyz(&defaults.operations)?,
    };

    let structure_file = file_config.structure.take().unwrap_or_default();
    let sites = structure_file
        .sites
        .ok_or_else(|| CliError::Config("`structure.sites` is required.".to_string()))?
        .into_iter()
        .map(|[x, y, z]| Point3::new(x, y, z))
        .collect();
    let number_of_restraints = evaluate
        .and_then(|args| args.number_of_restraints)
        .or(structure_file.number_of_restraints)
        .unwrap_or(defaults.number_of_restraints);

    let amber_file = file_config.amber.take().unwrap_or_default();
    let amber = AmberOptions {
        use_amber: amber_file.use_amber.unwrap_or(defaults.use_amber),
        use_sander: amber_file.use_sander.unwrap_or(defaults.use_sander),
        topology_file_name: evaluate
            .and_then(|args| args.topology.clone())
            .or(amber_file.topology_file_name),
        coordinate_file_name: evaluate
            .and_then(|args| args.coordinates.clone())
            .or(amber_file.coordinate_file_name),
    };

    let backend_file = file_config.backend.take().unwrap_or_default();
    let backend_command = match evaluate.and_then(|args| args.backend_command.as_deref()) {
        Some(command) => Some(split_command(command)?),
        None => backend_file.command,
    };

    let evaluation_file = file_config.evaluation.take().unwrap_or_default();
    let compute_gradients = if evaluate.is_some_and(|args| args.no_gradients) {
        false
    } else {
        evaluation_file
            .compute_gradients
            .unwrap_or(defaults.compute_gradients)
    };
    let gradient_reduction = match evaluate.and_then(|args| args.gradient_reduction.as_deref()) {
        Some(policy) => parse_gradient_reduction(policy)?,
        None => evaluation_file
            .gradient_reduction
            .unwrap_or(defaults.gradient_reduction),
    };
    let normalization = if evaluate.is_some_and(|args| args.normalization) {
        true
    } else {
        evaluation_file
            .normalization
            .unwrap_or(defaults.normalization)
    };

    let adapter = AdapterConfigBuilder::new()
        .gradient_reduction(gradient_reduction)
        .normalization(normalization)
        .build();

    Ok(AppConfig {
        symmetry: CrystalSymmetry::new(unit_cell, space_group),
        sites,
        number_of_restraints,
        compute_gradients,
        adapter,
        amber,
        backend_command,
    })
}

fn split_command(command: &str) -> Result<Vec<String>> {
    let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(CliError::Argument(
            "The backend command cannot be empty.".to_string(),
        ));
    }
    Ok(parts)
}

fn parse_gradient_reduction(value: &str) -> Result<GradientReduction> {
    match value {
        "first-image" => Ok(GradientReduction::FirstImage),
        "symmetry-average" => Ok(GradientReduction::SymmetryAverage),
        other => Err(CliError::Argument(format!(
            "Unknown gradient reduction policy '{}'. Expected 'first-image' or 'symmetry-average'.",
            other
        ))),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "structure.number-of-restraints" => {
                config
                    .structure
                    .get_or_insert_with(Default::default)
                    .number_of_restraints = Some(parse_value(key, value_str, "integer")?);
            }
            "amber.use-amber" => {
                config.amber.get_or_insert_with(Default::default).use_amber =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "amber.use-sander" => {
                config.amber.get_or_insert_with(Default::default).use_sander =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "amber.topology-file-name" => {
                config
                    .amber
                    .get_or_insert_with(Default::default)
                    .topology_file_name = Some(PathBuf::from(value_str));
            }
            "amber.coordinate-file-name" => {
                config
                    .amber
                    .get_or_insert_with(Default::default)
                    .coordinate_file_name = Some(PathBuf::from(value_str));
            }
            "evaluation.compute-gradients" => {
                config
                    .evaluation
                    .get_or_insert_with(Default::default)
                    .compute_gradients = Some(parse_value(key, value_str, "boolean")?);
            }
            "evaluation.gradient-reduction" => {
                config
                    .evaluation
                    .get_or_insert_with(Default::default)
                    .gradient_reduction = Some(
                    parse_gradient_reduction(value_str)
                        .map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "evaluation.normalization" => {
                config
                    .evaluation
                    .get_or_insert_with(Default::default)
                    .normalization = Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    const MINIMAL_JOB: &str = r#"
    [crystal]
    cell = [10.0, 10.0, 10.0, 90.0, 90.0, 90.0]

    [structure]
    sites = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    "#;

    fn write_job(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn job_args(config: PathBuf) -> JobArgs {
        JobArgs {
            config,
            set_values: vec![],
        }
    }

    fn evaluate_args(config: PathBuf) -> EvaluateArgs {
        EvaluateArgs {
            job: job_args(config),
            backend_command: None,
            topology: None,
            coordinates: None,
            gradient_reduction: None,
            number_of_restraints: None,
            no_gradients: false,
            normalization: false,
        }
    }

    #[test]
    fn minimal_job_uses_defaults_for_rest() {
        let (_dir, path) = write_job(MINIMAL_JOB);
        let config = build_config(&job_args(path), None).unwrap();

        assert_eq!(config.sites.len(), 3);
        assert!(config.symmetry.space_group().is_p1());
        assert_eq!(config.number_of_restraints, 0);
        assert!(config.compute_gradients);
        assert_eq!(
            config.adapter.gradient_reduction,
            GradientReduction::SymmetryAverage
        );
        assert!(!config.adapter.normalization);
        assert!(!config.amber.use_amber);
        assert!(!config.amber.use_sander);
        assert_eq!(config.backend_command, None);
    }

    #[test]
    fn missing_cell_is_a_config_error() {
        let (_dir, path) = write_job(
            r#"
            [structure]
            sites = [[0.0, 0.0, 0.0]]
            "#,
        );
        let result = build_config(&job_args(path), None);
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("crystal.cell")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_operation_is_a_symmetry_error() {
        let (_dir, path) = write_job(
            r#"
            [crystal]
            cell = [10.0, 10.0, 10.0, 90.0, 90.0, 90.0]
            operations = ["x,y"]

            [structure]
            sites = [[0.0, 0.0, 0.0]]
            "#,
        );
        let result = build_config(&job_args(path), None);
        assert!(matches!(result, Err(CliError::Symmetry(_))));
    }

    #[test]
    fn set_values_override_file_values() {
        let content = format!(
            "{}\n[evaluation]\nnormalization = false\n",
            MINIMAL_JOB
        );
        let (_dir, path) = write_job(&content);
        let mut args = job_args(path);
        args.set_values = vec![
            "evaluation.normalization=true".to_string(),
            "evaluation.gradient-reduction=first-image".to_string(),
            "structure.number-of-restraints=9".to_string(),
            "amber.use-amber=true".to_string(),
        ];

        let config = build_config(&args, None).unwrap();
        assert!(config.adapter.normalization);
        assert_eq!(
            config.adapter.gradient_reduction,
            GradientReduction::FirstImage
        );
        assert_eq!(config.number_of_restraints, 9);
        assert!(config.amber.use_amber);
    }

    #[test]
    fn unsupported_or_malformed_set_values_are_rejected() {
        let (_dir, path) = write_job(MINIMAL_JOB);
        for bad in ["crystal.cell=1", "evaluation.normalization", "amber.use-amber=yes"] {
            let mut args = job_args(path.clone());
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_config(&args, None), Err(CliError::Config(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn evaluate_flags_override_file_and_set_values() {
        let content = format!(
            "{}\n[backend]\ncommand = [\"old-server\"]\n[evaluation]\ncompute-gradients = true\n",
            MINIMAL_JOB
        );
        let (_dir, path) = write_job(&content);
        let mut args = evaluate_args(path);
        args.job.set_values = vec!["structure.number-of-restraints=3".to_string()];
        args.backend_command = Some("python3 sander_server.py --quiet".to_string());
        args.topology = Some(PathBuf::from("4lzt.prmtop"));
        args.gradient_reduction = Some("first-image".to_string());
        args.number_of_restraints = Some(40);
        args.no_gradients = true;
        args.normalization = true;

        let config = build_config(&args.job, Some(&args)).unwrap();
        assert_eq!(
            config.backend_command,
            Some(vec![
                "python3".to_string(),
                "sander_server.py".to_string(),
                "--quiet".to_string()
            ])
        );
        assert_eq!(
            config.amber.topology_file_name,
            Some(PathBuf::from("4lzt.prmtop"))
        );
        assert_eq!(
            config.adapter.gradient_reduction,
            GradientReduction::FirstImage
        );
        assert_eq!(config.number_of_restraints, 40);
        assert!(!config.compute_gradients);
        assert!(config.adapter.normalization);
    }

    #[test]
    fn unknown_gradient_reduction_flag_is_an_argument_error() {
        let (_dir, path) = write_job(MINIMAL_JOB);
        let mut args = evaluate_args(path);
        args.gradient_reduction = Some("sum".to_string());
        assert!(matches!(
            build_config(&args.job, Some(&args)),
            Err(CliError::Argument(_))
        ));
    }
}
