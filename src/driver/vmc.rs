//! Variational Monte Carlo ground-state search.
//!
//! Every step draws a fresh batch from the state, estimates the energy and
//! its gradient, preconditions the gradient and lets the optimizer update the
//! parameters. A record is emitted on every `logging_interval`-th step of a
//! run, carrying the energy measured before that step's update.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::error::VmcError;
use crate::models::Ansatz;
use crate::operator::LocalOperator;
use crate::optimizer::{Optimizer, Preconditioner};
use crate::sampling::{Sampler, Stats};
use crate::vqs::MCState;
use super::runtime_log::RuntimeLog;

/// Observables logged for one training step.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingRecord {
    /// Global step index, counted across runs
    pub step: usize,
    pub energy: Stats,
    /// Metropolis acceptance rate of the batch, if the sampler tracks one
    pub acceptance: Option<f64>,
}

/// Energy minimization driver.
pub struct Vmc<'a, A: Ansatz, S: Sampler, O: Optimizer, P: Preconditioner> {
    hamiltonian: &'a LocalOperator,
    state: MCState<A, S>,
    optimizer: O,
    preconditioner: P,
    step_count: usize,
}

impl<'a, A, S, O, P> Vmc<'a, A, S, O, P>
where
    A: Ansatz,
    S: Sampler,
    O: Optimizer,
    P: Preconditioner,
{
    pub fn new(
        hamiltonian: &'a LocalOperator,
        state: MCState<A, S>,
        optimizer: O,
        preconditioner: P,
    ) -> Self {
        Self { hamiltonian, state, optimizer, preconditioner, step_count: 0 }
    }

    pub fn state(&self) -> &MCState<A, S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MCState<A, S> {
        &mut self.state
    }

    pub fn into_state(self) -> MCState<A, S> {
        self.state
    }

    /// Steps performed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Energy of the current state on a fresh batch, without updating parameters.
    pub fn estimate(&mut self) -> Result<Stats, VmcError> {
        self.state.sample();
        self.state.expect(self.hamiltonian)
    }

    /// Perform a single optimization step.
    pub fn advance(&mut self) -> Result<TrainingRecord, VmcError> {
        let step = self.step_count;
        self.state.sample();
        let (energy, gradient, sample_stats) = self.state.expect_and_grad(self.hamiltonian)?;
        if !energy.mean.is_finite() {
            return Err(VmcError::NonFiniteEnergy {
                step,
                mean: energy.mean,
                error: energy.error_of_mean,
            });
        }
        if gradient.iter().any(|g| !g.is_finite()) {
            return Err(VmcError::NonFiniteGradient { step });
        }

        let update = self.preconditioner.apply(&gradient, &sample_stats);
        let params = self.optimizer.step(self.state.params(), &update);
        if params.iter().any(|p| !p.is_finite()) {
            return Err(VmcError::NonFiniteGradient { step });
        }
        self.state.set_params(params)?;
        self.step_count += 1;

        debug!("step {}: E = {}, |G| = {:.4e}", step, energy, gradient.norm());
        Ok(TrainingRecord { step, energy, acceptance: self.state.sampler().acceptance() })
    }

    /// Lazily run `n_steps` steps, yielding every `logging_interval`-th record.
    pub fn iter(
        &mut self,
        n_steps: usize,
        logging_interval: usize,
    ) -> Result<VmcIter<'_, 'a, A, S, O, P>, VmcError> {
        if logging_interval == 0 {
            return Err(VmcError::InvalidInterval);
        }
        Ok(VmcIter { driver: self, n_steps, logging_interval, done: 0, failed: false })
    }

    /// Run `n_steps` steps, appending `ceil(n_steps / logging_interval)` records to `log`.
    pub fn run(
        &mut self,
        n_steps: usize,
        logging_interval: usize,
        log: &mut RuntimeLog,
    ) -> Result<(), VmcError> {
        info!("running {} VMC steps with {} parameters", n_steps, self.state.n_params());
        for record in self.iter(n_steps, logging_interval)? {
            let record = record?;
            match record.acceptance {
                Some(acc) => info!("step {:5}: E = {} acc = {:.3}", record.step, record.energy, acc),
                None => info!("step {:5}: E = {}", record.step, record.energy),
            }
            log.push(record);
        }
        Ok(())
    }
}

/// Iterator over the logged records of a run. Stops after the first error.
pub struct VmcIter<'d, 'a, A: Ansatz, S: Sampler, O: Optimizer, P: Preconditioner> {
    driver: &'d mut Vmc<'a, A, S, O, P>,
    n_steps: usize,
    logging_interval: usize,
    done: usize,
    failed: bool,
}

impl<'d, 'a, A, S, O, P> Iterator for VmcIter<'d, 'a, A, S, O, P>
where
    A: Ansatz,
    S: Sampler,
    O: Optimizer,
    P: Preconditioner,
{
    type Item = Result<TrainingRecord, VmcError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && self.done < self.n_steps {
            let local = self.done;
            self.done += 1;
            match self.driver.advance() {
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
                Ok(record) if local % self.logging_interval == 0 => return Some(Ok(record)),
                Ok(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use crate::graph;
    use crate::hilbert::SpinHilbert;
    use crate::models::{Activation, Ffnn};
    use crate::operator::transverse_field_ising;
    use crate::optimizer::{IdentityPreconditioner, Sgd};
    use crate::sampling::ExactSampler;

    fn small_problem() -> (LocalOperator, MCState<Ffnn, ExactSampler>) {
        let g = graph::chain(3, false).unwrap();
        let hi = SpinHilbert::from_graph(&g);
        let ham = transverse_field_ising(hi, &g, 1.0, 1.0).unwrap();
        let state = MCState::new(Ffnn::new(3, 1, Activation::LogCosh), ExactSampler::new(hi, 2, 64, 5), 3);
        (ham, state)
    }

    #[test]
    fn test_record_count_and_steps() {
        let (ham, state) = small_problem();
        let mut driver = Vmc::new(&ham, state, Sgd::new(0.01), IdentityPreconditioner);
        let mut log = RuntimeLog::new();
        driver.run(7, 3, &mut log).unwrap();
        let steps: Vec<usize> = log.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![0, 3, 6]);
        assert_eq!(driver.step_count(), 7);

        // The step counter carries over; record offsets restart with each run.
        driver.run(4, 2, &mut log).unwrap();
        let steps: Vec<usize> = log.records()[3..].iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![7, 9]);
        assert!(log.records().iter().all(|r| r.energy.mean.is_finite()));
        assert!(log.records().iter().all(|r| r.acceptance.is_none()));
    }

    #[test]
    fn test_parameters_move() {
        let (ham, state) = small_problem();
        let before = state.params().clone();
        let mut driver = Vmc::new(&ham, state, Sgd::new(0.05), IdentityPreconditioner);
        driver.advance().unwrap();
        assert!((driver.state().params() - before).norm() > 0.0);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let (ham, state) = small_problem();
        let mut driver = Vmc::new(&ham, state, Sgd::new(0.01), IdentityPreconditioner);
        assert!(matches!(driver.iter(5, 0), Err(VmcError::InvalidInterval)));
        assert_eq!(driver.run(5, 0, &mut RuntimeLog::new()), Err(VmcError::InvalidInterval));
        assert_eq!(driver.step_count(), 0);
    }

    #[test]
    fn test_non_finite_energy_aborts() {
        let (ham, state) = small_problem();
        let mut params = state.params().clone();
        params[0] = f64::NAN;
        let hi = *state.hilbert();
        let state = MCState::with_params(
            Ffnn::new(3, 1, Activation::LogCosh),
            crate::sampling::MetropolisLocal::new(hi, Default::default(), 0),
            params,
        )
        .unwrap();
        let mut driver = Vmc::new(&ham, state, Sgd::new(0.01), IdentityPreconditioner);
        let mut log = RuntimeLog::new();
        let err = driver.run(10, 1, &mut log).unwrap_err();
        assert!(matches!(err, VmcError::NonFiniteEnergy { step: 0, .. }));
        assert!(log.is_empty());

        let mut it = driver.iter(3, 1).unwrap();
        assert!(matches!(it.next(), Some(Err(VmcError::NonFiniteEnergy { .. }))));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_estimate_leaves_parameters() {
        let (ham, state) = small_problem();
        let mut driver = Vmc::new(&ham, state, Sgd::new(0.01), IdentityPreconditioner);
        let before = driver.state().params().clone();
        let stats = driver.estimate().unwrap();
        assert!(stats.is_finite());
        assert_eq!(driver.state().params(), &before);
    }

    /// Optimizer whose updates are never finite.
    struct DivergingOptimizer;

    impl Optimizer for DivergingOptimizer {
        fn step(&mut self, params: &DVector<f64>, _gradient: &DVector<f64>) -> DVector<f64> {
            params.map(|_| f64::NAN)
        }
    }

    #[test]
    fn test_non_finite_update_aborts() {
        let (ham, state) = small_problem();
        let before = state.params().clone();
        let mut driver = Vmc::new(&ham, state, DivergingOptimizer, IdentityPreconditioner);
        let mut log = RuntimeLog::new();
        let err = driver.run(10, 1, &mut log).unwrap_err();
        assert_eq!(err, VmcError::NonFiniteGradient { step: 0 });
        assert_eq!(driver.step_count(), 0);
        assert_eq!(driver.state().params(), &before);
        assert!(log.is_empty());
    }
}
