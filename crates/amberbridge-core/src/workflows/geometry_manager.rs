use crate::core::energy::result::EnergyResult;
use crate::core::geometry::deviation::{
    AngleTerm, BondTerm, DeviationError, GeometryDeviation, bond_angle_rmsd,
};
use crate::core::symmetry::space_group::CrystalSymmetry;
use crate::engine::backend::BackendKind;
use crate::engine::backend::context::BackendContext;
use crate::engine::backend::embedded::NATIVE_ENERGY_BUFFER_LEN;
use crate::engine::backend::error::BackendError;
use crate::engine::config::AdapterConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluation::{EvaluationOptions, evaluate};
use nalgebra::Point3;
use tracing::instrument;

/// Owns the asymmetric-unit coordinates and the force-field context of one refinement run.
pub struct GeometryManager {
    sites_cart: Vec<Point3<f64>>,
    context: BackendContext,
    number_of_restraints: usize,
    energy_components: Vec<f64>,
    config: AdapterConfig,
}

impl GeometryManager {
    pub fn new(sites_cart: Vec<Point3<f64>>, context: BackendContext) -> Self {
        Self {
            sites_cart,
            context,
            number_of_restraints: 0,
            energy_components: vec![0.0; NATIVE_ENERGY_BUFFER_LEN],
            config: AdapterConfig::default(),
        }
    }

    pub fn with_number_of_restraints(mut self, number_of_restraints: usize) -> Self {
        self.number_of_restraints = number_of_restraints;
        self
    }

    /// Replaces the seed buffer the embedded-library backend accumulates into.
    pub fn with_energy_components(mut self, energy_components: Vec<f64>) -> Self {
        self.energy_components = energy_components;
        self
    }

    pub fn with_config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn sites_cart(&self) -> &[Point3<f64>] {
        &self.sites_cart
    }

    pub fn set_sites_cart(&mut self, sites_cart: Vec<Point3<f64>>) {
        self.sites_cart = sites_cart;
    }

    #[inline]
    pub fn number_of_restraints(&self) -> usize {
        self.number_of_restraints
    }

    #[inline]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.context.kind()
    }

    /// Evaluates the force-field energy of the current sites, and their gradients when
    /// `compute_gradients` is set.
    ///
    /// # Errors
    ///
    /// Any failure of the expansion, the external evaluator or the gradient reduction
    /// aborts the call; no partial result is produced.
    #[instrument(skip_all, name = "energies_sites")]
    pub fn energies_sites(
        &mut self,
        crystal_symmetry: &CrystalSymmetry,
        compute_gradients: bool,
    ) -> Result<EnergyResult, EngineError> {
        evaluate(
            &self.sites_cart,
            crystal_symmetry,
            &mut self.context,
            compute_gradients,
            &EvaluationOptions {
                config: &self.config,
                seed_components: &self.energy_components,
                number_of_restraints: self.number_of_restraints,
            },
        )
    }

    /// Bond and angle RMS deviations of the current sites.
    pub fn geometry_deviation(
        &self,
        bonds: &[BondTerm],
        angles: &[AngleTerm],
    ) -> Result<GeometryDeviation, DeviationError> {
        bond_angle_rmsd(&self.sites_cart, bonds, angles)
    }

    pub fn into_context(self) -> BackendContext {
        self.context
    }

    /// Ends the run, releasing a live-process session if one is held.
    pub fn release(self) -> Result<(), BackendError> {
        match self.context {
            BackendContext::LiveProcess(session) => session.release(),
            BackendContext::EmbeddedLibrary(_) => Ok(()),
        }
    }
}
