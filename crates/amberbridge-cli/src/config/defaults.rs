use amberbridge::engine::reduction::GradientReduction;

pub struct DefaultsConfig {
    pub operations: Vec<String>,
    pub number_of_restraints: usize,
    pub use_amber: bool,
    pub use_sander: bool,
    pub compute_gradients: bool,
    pub gradient_reduction: GradientReduction,
    pub normalization: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            operations: vec!["x,y,z".to_string()],
            number_of_restraints: 0,
            use_amber: false,
            use_sander: false,
            compute_gradients: true,
            gradient_reduction: GradientReduction::SymmetryAverage,
            normalization: false,
        }
    }
}
