//! End-to-end training runs checked against exact diagonalization.

use approx::assert_relative_eq;
use crate::error::VmcError;
use crate::exact::{lanczos_ed, smallest_eigenvalue, LanczosParams};
use crate::graph;
use crate::hilbert::SpinHilbert;
use crate::io::RunConfig;
use crate::models::{Activation, Ansatz, Ffnn};
use crate::operator::transverse_field_ising;
use crate::optimizer::{Sgd, StochasticReconfiguration};
use crate::sampling::{MetropolisLocal, MetropolisParams, Sampler};
use crate::driver::{RuntimeLog, Vmc};
use crate::vqs::MCState;

const K4_GROUND_ENERGY: f64 = -4.247303334275872;

#[test]
fn test_k4_exact_ground_energy() {
    let g = graph::complete(4);
    let ham = transverse_field_ising(SpinHilbert::from_graph(&g), &g, 1.0, 0.5).unwrap();
    assert_relative_eq!(smallest_eigenvalue(&ham).unwrap(), K4_GROUND_ENERGY, epsilon = 1e-6);
}

#[test]
fn test_k4_training_reaches_exact_energy() {
    let g = graph::complete(4);
    let hi = SpinHilbert::from_graph(&g);
    let ham = transverse_field_ising(hi, &g, 1.0, 0.5).unwrap();
    let exact = lanczos_ed(&ham, &LanczosParams::default()).unwrap()[0];

    let sampler_params = MetropolisParams { n_chains: 16, n_samples: 1024, ..Default::default() };
    let state = MCState::new(
        Ffnn::new(4, 1, Activation::LogCosh),
        MetropolisLocal::new(hi, sampler_params, 42),
        7,
    );
    let mut driver = Vmc::new(&ham, state, Sgd::new(0.05), StochasticReconfiguration::new(0.01));

    let n_steps = 150;
    let interval = 10;
    let mut log = RuntimeLog::new();
    driver.run(n_steps, interval, &mut log).unwrap();

    assert_eq!(log.len(), n_steps.div_ceil(interval));
    assert!(log.records().iter().all(|r| r.energy.mean.is_finite()));
    assert!(log.records().iter().all(|r| r.acceptance.is_some()));

    // Fluctuations of the local energy shrink as the state approaches an eigenstate.
    let variances: Vec<f64> = log.records().iter().map(|r| r.energy.variance).collect();
    let third = variances.len() / 3;
    let early = variances[..third].iter().sum::<f64>() / third as f64;
    let late = variances[variances.len() - third..].iter().sum::<f64>() / third as f64;
    assert!(late < early, "variance did not decrease: early {} late {}", early, late);

    let mut state = driver.into_state();
    let variational = state.expect_exact(&ham).unwrap();
    let relative_error = ((variational - exact) / exact).abs();
    assert!(relative_error < 0.01, "E = {}, exact = {}", variational, exact);

    state.sample();
    let sampled = state.expect(&ham).unwrap();
    assert!(((sampled.mean - exact) / exact).abs() < 0.01);
    // Variational principle, up to sampling noise.
    assert!(variational >= exact - 1e-9);
}

#[test]
fn test_run_from_config() {
    let config = RunConfig::from_yaml_str(
        "
graph: {kind: chain, length: 4, pbc: false}
sampler: {kind: exact, n_chains: 2, n_samples: 128}
optimizer: {learning_rate: 0.02}
training: {n_steps: 5, logging_interval: 2, seed: 3}
",
    )
    .unwrap();
    let g = config.graph.build().unwrap();
    let hi = SpinHilbert::from_graph(&g);
    let ham = transverse_field_ising(hi, &g, config.hamiltonian.field, config.hamiltonian.coupling)
        .unwrap();
    let model = config.model.build(hi.size());
    let sampler = config.sampler.build(hi, config.training.seed);
    assert_eq!(sampler.hilbert(), &hi);
    let state = MCState::new(model, sampler, config.training.seed);
    assert_eq!(state.n_params(), state.ansatz().n_params());

    let mut driver = Vmc::new(
        &ham,
        state,
        config.optimizer.build(),
        config.preconditioner.build(),
    );
    let mut log = RuntimeLog::new();
    driver
        .run(config.training.n_steps, config.training.logging_interval, &mut log)
        .unwrap();
    let steps: Vec<usize> = log.records().iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![0, 2, 4]);
}

#[test]
fn test_nan_parameters_abort_training() {
    let g = graph::complete(4);
    let hi = SpinHilbert::from_graph(&g);
    let ham = transverse_field_ising(hi, &g, 1.0, 0.5).unwrap();
    let model = Ffnn::new(4, 1, Activation::LogCosh);
    let params = nalgebra::DVector::from_element(model.n_params(), f64::NAN);
    let state = MCState::with_params(model, MetropolisLocal::new(hi, Default::default(), 1), params)
        .unwrap();
    let mut driver = Vmc::new(&ham, state, Sgd::new(0.05), StochasticReconfiguration::default());
    let mut log = RuntimeLog::new();
    let err = driver.run(20, 5, &mut log).unwrap_err();
    assert!(matches!(err, VmcError::NonFiniteEnergy { step: 0, .. }));
    assert!(log.is_empty());
    assert_eq!(driver.step_count(), 0);
}
