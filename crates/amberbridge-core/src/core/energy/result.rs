use super::components::EnergyComponents;
use nalgebra::Vector3;
use std::fmt;

/// The outcome of one energy/gradient evaluation, in the shape a generic restraints-energy
/// consumer expects.
///
/// `gradients` is always sized to the asymmetric unit. When gradients were not requested
/// it is all zeros of that length.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyResult {
    residual_sum: f64,
    target: f64,
    energy_components: EnergyComponents,
    gradients: Vec<Vector3<f64>>,
    number_of_restraints: usize,
    compute_gradients: bool,
    normalization: bool,
}

impl EnergyResult {
    pub(crate) fn new(
        residual_sum: f64,
        energy_components: EnergyComponents,
        gradients: Vec<Vector3<f64>>,
        number_of_restraints: usize,
        compute_gradients: bool,
    ) -> Self {
        Self {
            residual_sum,
            target: residual_sum,
            energy_components,
            gradients,
            number_of_restraints,
            compute_gradients,
            normalization: false,
        }
    }

    /// Derives the optimization target from the residual sum.
    ///
    /// With normalization on and a non-zero restraint count, the target and the gradients
    /// are divided by the number of restraints; otherwise the target is the residual sum.
    pub(crate) fn finalize_target_and_gradients(mut self, normalization: bool) -> Self {
        self.normalization = normalization;
        self.target = self.residual_sum;
        if normalization && self.number_of_restraints > 0 {
            let scale = 1.0 / self.number_of_restraints as f64;
            self.target *= scale;
            for gradient in &mut self.gradients {
                *gradient *= scale;
            }
        }
        self
    }

    #[inline]
    pub fn residual_sum(&self) -> f64 {
        self.residual_sum
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn energy_components(&self) -> &EnergyComponents {
        &self.energy_components
    }

    #[inline]
    pub fn gradients(&self) -> &[Vector3<f64>] {
        &self.gradients
    }

    #[inline]
    pub fn number_of_restraints(&self) -> usize {
        self.number_of_restraints
    }

    #[inline]
    pub fn compute_gradients(&self) -> bool {
        self.compute_gradients
    }

    #[inline]
    pub fn normalization(&self) -> bool {
        self.normalization
    }

    /// Root-mean-square over every Cartesian gradient component; zero when there are no atoms.
    pub fn gradient_rms(&self) -> f64 {
        if self.gradients.is_empty() {
            return 0.0;
        }
        let sum_of_squares: f64 = self.gradients.iter().map(|g| g.norm_squared()).sum();
        (sum_of_squares / (3 * self.gradients.len()) as f64).sqrt()
    }

    pub fn show(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnergyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.energy_components;
        writeln!(f, "    Amber total energy: {:.2}", self.residual_sum)?;
        writeln!(f, "      bonds (n={}): {:.2}", c.n_bonds() as i64, c.bond())?;
        writeln!(f, "      angles (n={}): {:.2}", c.n_angles() as i64, c.angle())?;
        writeln!(
            f,
            "      dihedrals (n={}): {:.2}",
            c.n_dihedrals() as i64,
            c.dihedral()
        )?;
        writeln!(f, "      electrostatics: {:.2}", c.electrostatic())?;
        writeln!(f, "      van der Waals: {:.2}", c.van_der_waals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_components() -> EnergyComponents {
        EnergyComponents::new([6.7, 1.0, 2.0, 3.0, 4.0, 5.0, 12.0, 20.0, 31.0])
    }

    #[test]
    fn target_equals_residual_sum_without_normalization() {
        let result = EnergyResult::new(6.7, sample_components(), vec![Vector3::x()], 4, true)
            .finalize_target_and_gradients(false);
        assert_eq!(result.target(), 6.7);
        assert_eq!(result.residual_sum(), 6.7);
        assert_eq!(result.gradients(), &[Vector3::x()]);
        assert!(!result.normalization());
    }

    #[test]
    fn normalization_divides_target_and_gradients_by_restraint_count() {
        let result = EnergyResult::new(
            8.0,
            sample_components(),
            vec![Vector3::new(4.0, -8.0, 2.0)],
            4,
            true,
        )
        .finalize_target_and_gradients(true);
        assert_eq!(result.target(), 2.0);
        assert_eq!(result.residual_sum(), 8.0);
        assert_eq!(result.gradients(), &[Vector3::new(1.0, -2.0, 0.5)]);
    }

    #[test]
    fn normalization_with_zero_restraints_leaves_values_untouched() {
        let result = EnergyResult::new(8.0, sample_components(), vec![Vector3::y()], 0, true)
            .finalize_target_and_gradients(true);
        assert_eq!(result.target(), 8.0);
        assert_eq!(result.gradients(), &[Vector3::y()]);
    }

    #[test]
    fn gradient_rms_averages_over_all_cartesian_components() {
        let result = EnergyResult::new(
            0.0,
            EnergyComponents::default(),
            vec![Vector3::new(1.0, 1.0, 1.0), Vector3::new(3.0, 3.0, 3.0)],
            0,
            true,
        );
        assert!((result.gradient_rms() - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn gradient_rms_of_empty_gradients_is_zero() {
        let result = EnergyResult::new(0.0, EnergyComponents::default(), Vec::new(), 0, false);
        assert_eq!(result.gradient_rms(), 0.0);
    }

    #[test]
    fn show_lists_total_terms_and_counts() {
        let result = EnergyResult::new(6.7, sample_components(), Vec::new(), 0, false);
        let expected = concat!(
            "    Amber total energy: 6.70\n",
            "      bonds (n=12): 1.00\n",
            "      angles (n=20): 2.00\n",
            "      dihedrals (n=31): 3.00\n",
            "      electrostatics: 4.00\n",
            "      van der Waals: 5.00\n",
        );
        assert_eq!(result.show(), expected);
    }
}
