use super::backend::EvaluationRequest;
use super::backend::context::BackendContext;
use super::config::AdapterConfig;
use super::error::EngineError;
use crate::core::energy::result::EnergyResult;
use crate::core::symmetry::expand::expand;
use crate::core::symmetry::space_group::CrystalSymmetry;
use nalgebra::{Point3, Vector3};
use tracing::{info, instrument};

/// Per-call inputs that ride along with the coordinates.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationOptions<'a> {
    pub config: &'a AdapterConfig,
    /// Initial energy buffer for the embedded-library backend.
    pub seed_components: &'a [f64],
    pub number_of_restraints: usize,
}

/// Runs one expand → evaluate → reduce sequence against the selected backend.
///
/// The returned gradients always hold one entry per asymmetric-unit site. When
/// `want_gradients` is false they are zeros of that length.
#[instrument(skip_all, name = "energy_evaluation", fields(n_sites = sites.len(), backend = %context.kind()))]
pub fn evaluate(
    sites: &[Point3<f64>],
    symmetry: &CrystalSymmetry,
    context: &mut BackendContext,
    want_gradients: bool,
    options: &EvaluationOptions<'_>,
) -> Result<EnergyResult, EngineError> {
    let n_atoms = sites.len();
    let expanded = expand(sites, symmetry);
    info!(
        n_operations = symmetry.space_group().n_operations(),
        n_expanded = expanded.len(),
        "Expanded asymmetric unit to the unit cell."
    );

    let backend = context.backend_mut();
    let kind = backend.kind();
    let evaluation = backend
        .evaluate(&EvaluationRequest {
            expanded_sites: &expanded,
            want_gradients,
            seed_components: options.seed_components,
        })
        .map_err(|source| EngineError::Backend {
            backend: kind,
            source,
        })?;

    let gradients = match evaluation.gradients {
        Some(expanded_gradients) if want_gradients => options
            .config
            .gradient_reduction
            .reduce(expanded_gradients, n_atoms, symmetry, kind)?,
        _ => vec![Vector3::zeros(); n_atoms],
    };

    let result = EnergyResult::new(
        evaluation.residual_sum,
        evaluation.energy_components,
        gradients,
        options.number_of_restraints,
        want_gradients,
    )
    .finalize_target_and_gradients(options.config.normalization);
    info!(
        residual_sum = result.residual_sum(),
        "Force-field evaluation complete."
    );
    Ok(result)
}
