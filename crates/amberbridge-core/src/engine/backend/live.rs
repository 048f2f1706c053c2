use super::error::BackendError;
use super::{
    BackendEvaluation, BackendKind, EnergyBackend, EvaluationRequest, EvaluatorError,
    negated_vectors,
};
use crate::core::energy::components::{EnergyBreakdown, TopologyCounts};
use crate::core::geometry::sites::flatten_sites;
use tracing::{debug, info, instrument, warn};

/// The call contract of a running force-field process.
///
/// The process holds a single "current positions" state: [`LiveEngine::set_positions`]
/// overwrites it and [`LiveEngine::energy_forces`] evaluates it. Coordinate and force
/// buffers are flat `[x0, y0, z0, x1, ...]` arrays sized to the expanded unit cell.
pub trait LiveEngine {
    fn set_positions(&mut self, coordinates: &[f64]) -> Result<(), EvaluatorError>;

    fn energy_forces(&mut self) -> Result<(EnergyBreakdown, Vec<f64>), EvaluatorError>;

    fn topology_counts(&self) -> TopologyCounts;

    /// Tears the process down. Called exactly once per session.
    fn release(&mut self) -> Result<(), EvaluatorError> {
        Ok(())
    }
}

/// Exclusive ownership of a live force-field process for the duration of a run.
///
/// The session is acquired on construction, evaluated any number of times, and released
/// either explicitly through [`LiveProcessSession::release`] or on drop, including after a
/// failed evaluation.
pub struct LiveProcessSession {
    engine: Box<dyn LiveEngine>,
    released: bool,
}

impl LiveProcessSession {
    pub fn acquire(engine: impl LiveEngine + 'static) -> Self {
        let counts = engine.topology_counts();
        info!(
            n_bonds = counts.n_bonds(),
            n_angles = counts.n_angles(),
            n_dihedrals = counts.n_dihedrals(),
            "Acquired live force-field process session."
        );
        Self {
            engine: Box::new(engine),
            released: false,
        }
    }

    pub fn topology_counts(&self) -> TopologyCounts {
        self.engine.topology_counts()
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release(mut self) -> Result<(), BackendError> {
        self.release_engine()
    }

    fn release_engine(&mut self) -> Result<(), BackendError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        info!("Releasing live force-field process session.");
        self.engine
            .release()
            .map_err(BackendError::evaluation("release"))
    }
}

impl Drop for LiveProcessSession {
    fn drop(&mut self) {
        if let Err(e) = self.release_engine() {
            warn!("Live force-field process did not release cleanly: {}", e);
        }
    }
}

impl EnergyBackend for LiveProcessSession {
    fn kind(&self) -> BackendKind {
        BackendKind::LiveProcess
    }

    #[instrument(skip_all, name = "live_process_evaluation", fields(n_sites = request.expanded_sites.len()))]
    fn evaluate(
        &mut self,
        request: &EvaluationRequest<'_>,
    ) -> Result<BackendEvaluation, BackendError> {
        if self.released {
            return Err(BackendError::SessionReleased);
        }

        let coordinates = flatten_sites(request.expanded_sites);
        self.engine
            .set_positions(&coordinates)
            .map_err(BackendError::evaluation("set_positions"))?;

        let (energy, forces) = self
            .engine
            .energy_forces()
            .map_err(BackendError::evaluation("energy_forces"))?;
        debug!(
            total = energy.total,
            n_forces = forces.len(),
            "Live process returned energy and forces."
        );

        let gradients = if request.want_gradients {
            Some(negated_vectors(&forces, "forces")?)
        } else {
            None
        };

        Ok(BackendEvaluation {
            residual_sum: energy.total,
            energy_components: energy.to_components(&self.engine.topology_counts()),
            gradients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        positions: Vec<Vec<f64>>,
        releases: usize,
    }

    struct StubEngine {
        calls: Rc<RefCell<Calls>>,
        fail_energy: bool,
        fail_release: bool,
    }

    impl StubEngine {
        fn new(calls: Rc<RefCell<Calls>>) -> Self {
            Self {
                calls,
                fail_energy: false,
                fail_release: false,
            }
        }
    }

    impl LiveEngine for StubEngine {
        fn set_positions(&mut self, coordinates: &[f64]) -> Result<(), EvaluatorError> {
            self.calls.borrow_mut().positions.push(coordinates.to_vec());
            Ok(())
        }

        fn energy_forces(&mut self) -> Result<(EnergyBreakdown, Vec<f64>), EvaluatorError> {
            if self.fail_energy {
                return Err("wrong number of atoms".into());
            }
            let n = self.calls.borrow().positions.last().map_or(0, Vec::len);
            let forces = (0..n).map(|i| i as f64).collect();
            let energy = EnergyBreakdown {
                total: 6.7,
                bond: 1.0,
                angle: 2.0,
                dihedral: 3.0,
                electrostatic: 3.5,
                electrostatic_14: 0.5,
                van_der_waals: 4.0,
                van_der_waals_14: 1.0,
            };
            Ok((energy, forces))
        }

        fn topology_counts(&self) -> TopologyCounts {
            TopologyCounts {
                bonds_with_hydrogen: 1,
                bonds_without_hydrogen: 2,
                angles_with_hydrogen: 3,
                angles_without_hydrogen: 4,
                dihedrals_with_hydrogen: 5,
                dihedrals_without_hydrogen: 6,
            }
        }

        fn release(&mut self) -> Result<(), EvaluatorError> {
            self.calls.borrow_mut().releases += 1;
            if self.fail_release {
                return Err("process already exited".into());
            }
            Ok(())
        }
    }

    fn two_sites() -> Vec<Point3<f64>> {
        vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)]
    }

    fn request(sites: &[Point3<f64>], want_gradients: bool) -> EvaluationRequest<'_> {
        EvaluationRequest {
            expanded_sites: sites,
            want_gradients,
            seed_components: &[],
        }
    }

    #[test]
    fn evaluate_pushes_flat_positions_before_evaluating() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut session = LiveProcessSession::acquire(StubEngine::new(calls.clone()));
        let sites = two_sites();
        session.evaluate(&request(&sites, false)).unwrap();
        assert_eq!(
            calls.borrow().positions,
            vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn evaluate_negates_forces_into_gradients() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut session = LiveProcessSession::acquire(StubEngine::new(calls));
        let sites = two_sites();
        let evaluation = session.evaluate(&request(&sites, true)).unwrap();
        assert_eq!(
            evaluation.gradients,
            Some(vec![
                Vector3::new(-0.0, -1.0, -2.0),
                Vector3::new(-3.0, -4.0, -5.0)
            ])
        );
    }

    #[test]
    fn evaluate_without_gradients_returns_none() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut session = LiveProcessSession::acquire(StubEngine::new(calls));
        let sites = two_sites();
        let evaluation = session.evaluate(&request(&sites, false)).unwrap();
        assert_eq!(evaluation.gradients, None);
    }

    #[test]
    fn evaluate_builds_components_from_breakdown_and_topology() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut session = LiveProcessSession::acquire(StubEngine::new(calls));
        let sites = two_sites();
        let evaluation = session.evaluate(&request(&sites, false)).unwrap();
        assert_eq!(evaluation.residual_sum, 6.7);
        assert_eq!(
            evaluation.energy_components.to_vec(),
            vec![6.7, 1.0, 2.0, 3.0, 4.0, 5.0, 3.0, 7.0, 11.0]
        );
    }

    #[test]
    fn evaluator_failure_propagates_with_call_name() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut engine = StubEngine::new(calls);
        engine.fail_energy = true;
        let mut session = LiveProcessSession::acquire(engine);
        let sites = two_sites();
        let result = session.evaluate(&request(&sites, true));
        match result {
            Err(BackendError::Evaluation { call, source }) => {
                assert_eq!(call, "energy_forces");
                assert_eq!(source.to_string(), "wrong number of atoms");
            }
            other => panic!("expected evaluation error, got {:?}", other),
        }
    }

    #[test]
    fn explicit_release_runs_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let session = LiveProcessSession::acquire(StubEngine::new(calls.clone()));
        session.release().unwrap();
        assert_eq!(calls.borrow().releases, 1);
    }

    #[test]
    fn drop_releases_after_failed_evaluation() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        {
            let mut engine = StubEngine::new(calls.clone());
            engine.fail_energy = true;
            let mut session = LiveProcessSession::acquire(engine);
            let sites = two_sites();
            assert!(session.evaluate(&request(&sites, true)).is_err());
        }
        assert_eq!(calls.borrow().releases, 1);
    }

    #[test]
    fn release_error_is_reported_and_not_repeated_on_drop() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut engine = StubEngine::new(calls.clone());
        engine.fail_release = true;
        let session = LiveProcessSession::acquire(engine);
        let result = session.release();
        assert!(matches!(
            result,
            Err(BackendError::Evaluation {
                call: "release",
                ..
            })
        ));
        assert_eq!(calls.borrow().releases, 1);
    }
}
