use amberbridge::core::symmetry::space_group::CrystalSymmetry;
use amberbridge::engine::config::AdapterConfig;
use nalgebra::Point3;
use std::path::PathBuf;

/// The Amber option block of a job.
#[derive(Debug, Clone, PartialEq)]
pub struct AmberOptions {
    pub use_amber: bool,
    pub use_sander: bool,
    pub topology_file_name: Option<PathBuf>,
    pub coordinate_file_name: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub symmetry: CrystalSymmetry,
    pub sites: Vec<Point3<f64>>,
    pub number_of_restraints: usize,
    pub compute_gradients: bool,
    pub adapter: AdapterConfig,
    pub amber: AmberOptions,
    pub backend_command: Option<Vec<String>>,
}
