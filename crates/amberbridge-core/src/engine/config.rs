use super::reduction::GradientReduction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterConfig {
    pub gradient_reduction: GradientReduction,
    /// Divide target and gradients by the restraint count when finalizing a result.
    pub normalization: bool,
}

#[derive(Default)]
pub struct AdapterConfigBuilder {
    gradient_reduction: Option<GradientReduction>,
    normalization: Option<bool>,
}

impl AdapterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gradient_reduction(mut self, reduction: GradientReduction) -> Self {
        self.gradient_reduction = Some(reduction);
        self
    }
    pub fn normalization(mut self, enabled: bool) -> Self {
        self.normalization = Some(enabled);
        self
    }

    pub fn build(self) -> AdapterConfig {
        AdapterConfig {
            gradient_reduction: self.gradient_reduction.unwrap_or_default(),
            normalization: self.normalization.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_settings_yields_defaults() {
        let config = AdapterConfigBuilder::new().build();
        assert_eq!(config, AdapterConfig::default());
        assert_eq!(config.gradient_reduction, GradientReduction::SymmetryAverage);
        assert!(!config.normalization);
    }

    #[test]
    fn builder_applies_explicit_settings() {
        let config = AdapterConfigBuilder::new()
            .gradient_reduction(GradientReduction::FirstImage)
            .normalization(true)
            .build();
        assert_eq!(config.gradient_reduction, GradientReduction::FirstImage);
        assert!(config.normalization);
    }
}
