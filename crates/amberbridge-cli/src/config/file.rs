use crate::error::{CliError, Result};
use amberbridge::engine::reduction::GradientReduction;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileCrystalConfig {
    /// `[a, b, c, alpha, beta, gamma]` in Å and degrees.
    pub cell: Option<[f64; 6]>,
    pub operations: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileStructureConfig {
    pub sites: Option<Vec<[f64; 3]>>,
    #[serde(rename = "number-of-restraints")]
    pub number_of_restraints: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileAmberConfig {
    #[serde(rename = "use-amber")]
    pub use_amber: Option<bool>,
    #[serde(rename = "use-sander")]
    pub use_sander: Option<bool>,
    #[serde(rename = "topology-file-name")]
    pub topology_file_name: Option<PathBuf>,
    #[serde(rename = "coordinate-file-name")]
    pub coordinate_file_name: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileBackendConfig {
    pub command: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileEvaluationConfig {
    #[serde(rename = "compute-gradients")]
    pub compute_gradients: Option<bool>,
    #[serde(rename = "gradient-reduction")]
    pub gradient_reduction: Option<GradientReduction>,
    pub normalization: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub crystal: Option<FileCrystalConfig>,
    pub structure: Option<FileStructureConfig>,
    pub amber: Option<FileAmberConfig>,
    pub backend: Option<FileBackendConfig>,
    pub evaluation: Option<FileEvaluationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading job configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_job_file_deserializes() {
        let content = r#"
        [crystal]
        cell = [10.0, 12.0, 14.0, 90.0, 100.0, 90.0]
        operations = ["x,y,z", "-x,y+1/2,-z"]

        [structure]
        sites = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]
        number-of-restraints = 12

        [amber]
        use-amber = true
        use-sander = true
        topology-file-name = "4lzt.prmtop"
        coordinate-file-name = "4lzt.rst7"

        [backend]
        command = ["python3", "sander_server.py"]

        [evaluation]
        compute-gradients = false
        gradient-reduction = "first-image"
        normalization = true
        "#;
        let config: FileConfig = toml::from_str(content).unwrap();

        let crystal = config.crystal.unwrap();
        assert_eq!(crystal.cell, Some([10.0, 12.0, 14.0, 90.0, 100.0, 90.0]));
        assert_eq!(crystal.operations.unwrap().len(), 2);
        let structure = config.structure.unwrap();
        assert_eq!(structure.sites.unwrap()[1], [1.0, 0.0, 0.0]);
        assert_eq!(structure.number_of_restraints, Some(12));
        let amber = config.amber.unwrap();
        assert_eq!(amber.use_sander, Some(true));
        assert_eq!(amber.topology_file_name, Some(PathBuf::from("4lzt.prmtop")));
        assert_eq!(
            config.backend.unwrap().command,
            Some(vec!["python3".to_string(), "sander_server.py".to_string()])
        );
        let evaluation = config.evaluation.unwrap();
        assert_eq!(evaluation.compute_gradients, Some(false));
        assert_eq!(
            evaluation.gradient_reduction,
            Some(GradientReduction::FirstImage)
        );
        assert_eq!(evaluation.normalization, Some(true));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str(
            r#"
            [amber]
            use-pmemd = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[crystal\ncell = 1").unwrap();

        let result = FileConfig::from_file(&path);
        match result {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn from_file_of_missing_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
