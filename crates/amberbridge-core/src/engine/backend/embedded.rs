use super::error::BackendError;
use super::{
    BackendEvaluation, BackendKind, EnergyBackend, EvaluationRequest, EvaluatorError,
    negated_vectors,
};
use crate::core::energy::components::EnergyComponents;
use crate::core::geometry::sites::flatten_sites;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Width of the energy buffer the native evaluator writes into.
pub const NATIVE_ENERGY_BUFFER_LEN: usize = 10;

/// The call contract of a force field linked into the process as a native library.
///
/// A single combined call evaluates the coordinates and accumulates into the gradient and
/// energy buffers in place. Entry 0 of `energies` receives the total energy; the remaining
/// layout is defined by the library.
pub trait EmbeddedEngine {
    fn evaluate_into(
        &mut self,
        coordinates: &[f64],
        gradients: &mut [f64],
        energies: &mut [f64],
    ) -> Result<(), EvaluatorError>;
}

/// A native library that can build its topology and restart state from files.
pub trait EmbeddedLibrary: EmbeddedEngine + Sized {
    fn load(topology_path: &Path, restart_path: &Path) -> Result<Self, EvaluatorError>;
}

/// Holds the native topology/restart handle for one structure.
pub struct EmbeddedLibraryContext {
    engine: Box<dyn EmbeddedEngine>,
}

impl EmbeddedLibraryContext {
    pub fn new(engine: impl EmbeddedEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub fn load<L>(topology_path: &Path, restart_path: &Path) -> Result<Self, BackendError>
    where
        L: EmbeddedLibrary + 'static,
    {
        info!(
            "Loading embedded force-field topology from {:?} with restart {:?}",
            topology_path, restart_path
        );
        let library =
            L::load(topology_path, restart_path).map_err(BackendError::evaluation("load"))?;
        Ok(Self::new(library))
    }
}

impl EnergyBackend for EmbeddedLibraryContext {
    fn kind(&self) -> BackendKind {
        BackendKind::EmbeddedLibrary
    }

    #[instrument(skip_all, name = "embedded_library_evaluation", fields(n_sites = request.expanded_sites.len()))]
    fn evaluate(
        &mut self,
        request: &EvaluationRequest<'_>,
    ) -> Result<BackendEvaluation, BackendError> {
        let coordinates = flatten_sites(request.expanded_sites);
        let mut gradients = vec![0.0; coordinates.len()];

        let seed = request.seed_components;
        let mut energies = vec![0.0; NATIVE_ENERGY_BUFFER_LEN.max(seed.len())];
        energies[..seed.len()].copy_from_slice(seed);

        self.engine
            .evaluate_into(&coordinates, &mut gradients, &mut energies)
            .map_err(BackendError::evaluation("evaluate_into"))?;
        debug!(total = energies[0], "Embedded library returned energies.");

        let gradients = if request.want_gradients {
            Some(negated_vectors(&gradients, "gradients")?)
        } else {
            None
        };

        Ok(BackendEvaluation {
            residual_sum: energies[0],
            energy_components: EnergyComponents::from_slice(&energies),
            gradients,
        })
    }
}
