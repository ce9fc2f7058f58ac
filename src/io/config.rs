//! YAML run configuration.
//!
//! Every section and field has a default, so an empty file describes a
//! complete run. Example:
//!
//! ```yaml
//! graph:
//!   kind: random
//!   n_nodes: 8
//!   edge_probability: 0.5
//! hamiltonian:
//!   coupling: 1.0
//!   field: 1.0
//! model:
//!   kind: ffnn
//!   alpha: 1
//!   activation: log_cosh
//! preconditioner:
//!   kind: sr
//!   diag_shift: 0.01
//! training:
//!   n_steps: 300
//!   logging_interval: 10
//! ```

use std::path::Path;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use crate::error::{GraphError, IoError};
use crate::exact::LanczosParams;
use crate::graph::{self, Graph};
use crate::hilbert::{SpinHilbert, MAX_ENUMERABLE_SITES};
use crate::models::{Activation, Ffnn, Model, Rbm};
use crate::optimizer::{
    Adam, AnyOptimizer, AnyPreconditioner, IdentityPreconditioner, Sgd,
    StochasticReconfiguration,
};
use crate::sampling::{AnySampler, ExactSampler, MetropolisLocal, MetropolisParams};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Random,
    Complete,
    Chain,
    Hypercube,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    pub kind: GraphKind,
    /// Nodes of random and complete graphs
    pub n_nodes: usize,
    pub edge_probability: f64,
    /// Side length of chains and hypercubes
    pub length: usize,
    pub ndim: usize,
    pub pbc: bool,
    /// Seed of the random graph generator
    pub seed: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            kind: GraphKind::Random,
            n_nodes: 8,
            edge_probability: 0.5,
            length: 8,
            ndim: 1,
            pbc: true,
            seed: 1234,
        }
    }
}

impl GraphConfig {
    pub fn build(&self) -> Result<Graph, GraphError> {
        match self.kind {
            GraphKind::Random => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                graph::random(self.n_nodes, self.edge_probability, &mut rng)
            }
            GraphKind::Complete => Ok(graph::complete(self.n_nodes)),
            GraphKind::Chain => graph::chain(self.length, self.pbc),
            GraphKind::Hypercube => graph::hypercube(self.length, self.ndim, self.pbc),
        }
    }

    /// Number of sites of the graph this section describes.
    pub fn n_sites(&self) -> usize {
        match self.kind {
            GraphKind::Random | GraphKind::Complete => self.n_nodes,
            GraphKind::Chain => self.length,
            GraphKind::Hypercube => self.length.saturating_pow(self.ndim as u32),
        }
    }
}

/// H = -h Σᵢ σˣᵢ + J Σ₍ᵢⱼ₎ σᶻᵢ σᶻⱼ
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HamiltonianConfig {
    /// J
    pub coupling: f64,
    /// h
    pub field: f64,
}

impl Default for HamiltonianConfig {
    fn default() -> Self {
        Self { coupling: 1.0, field: 1.0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Ffnn,
    Rbm,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    /// Hidden units per visible unit
    pub alpha: usize,
    /// Hidden nonlinearity of the FFNN, ignored by the RBM
    pub activation: Activation,
    /// Standard deviation of the initial weights, model default when absent
    pub init_std: Option<f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Ffnn,
            alpha: 1,
            activation: Activation::LogCosh,
            init_std: None,
        }
    }
}

impl ModelConfig {
    pub fn build(&self, n_visible: usize) -> Model {
        match self.kind {
            ModelKind::Ffnn => {
                let model = Ffnn::new(n_visible, self.alpha, self.activation);
                Model::Ffnn(match self.init_std {
                    Some(std) => model.with_init_std(std),
                    None => model,
                })
            }
            ModelKind::Rbm => {
                let model = Rbm::new(n_visible, self.alpha);
                Model::Rbm(match self.init_std {
                    Some(std) => model.with_init_std(std),
                    None => model,
                })
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    Metropolis,
    Exact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    pub kind: SamplerKind,
    pub n_chains: usize,
    pub n_samples: usize,
    pub n_discard_per_chain: usize,
    /// Proposals per sweep, number of sites when absent
    pub sweep_size: Option<usize>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        let defaults = MetropolisParams::default();
        Self {
            kind: SamplerKind::Metropolis,
            n_chains: defaults.n_chains,
            n_samples: defaults.n_samples,
            n_discard_per_chain: defaults.n_discard_per_chain,
            sweep_size: defaults.sweep_size,
        }
    }
}

impl SamplerConfig {
    pub fn build(&self, hilbert: SpinHilbert, seed: u64) -> AnySampler {
        match self.kind {
            SamplerKind::Metropolis => {
                let params = MetropolisParams {
                    n_chains: self.n_chains,
                    n_samples: self.n_samples,
                    n_discard_per_chain: self.n_discard_per_chain,
                    sweep_size: self.sweep_size,
                    ..Default::default()
                };
                AnySampler::Metropolis(MetropolisLocal::new(hilbert, params, seed))
            }
            SamplerKind::Exact => AnySampler::Exact(ExactSampler::new(
                hilbert,
                self.n_chains,
                self.n_samples,
                seed,
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Adam,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub kind: OptimizerKind,
    pub learning_rate: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { kind: OptimizerKind::Sgd, learning_rate: 0.05 }
    }
}

impl OptimizerConfig {
    pub fn build(&self) -> AnyOptimizer {
        match self.kind {
            OptimizerKind::Sgd => AnyOptimizer::Sgd(Sgd::new(self.learning_rate)),
            OptimizerKind::Adam => AnyOptimizer::Adam(Adam::new(self.learning_rate)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreconditionerKind {
    None,
    Sr,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreconditionerConfig {
    pub kind: PreconditionerKind,
    pub diag_shift: f64,
}

impl Default for PreconditionerConfig {
    fn default() -> Self {
        Self { kind: PreconditionerKind::Sr, diag_shift: 0.01 }
    }
}

impl PreconditionerConfig {
    pub fn build(&self) -> AnyPreconditioner {
        match self.kind {
            PreconditionerKind::None => AnyPreconditioner::Identity(IdentityPreconditioner),
            PreconditionerKind::Sr => {
                AnyPreconditioner::Sr(StochasticReconfiguration::new(self.diag_shift))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub n_steps: usize,
    pub logging_interval: usize,
    /// Seed for parameter initialization and sampling
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { n_steps: 300, logging_interval: 10, seed: 0 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExactConfig {
    pub enabled: bool,
    /// Skip exact diagonalization above this many sites
    pub max_sites: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        let defaults = LanczosParams::default();
        Self {
            enabled: true,
            max_sites: 16,
            tolerance: defaults.tolerance,
            max_iterations: defaults.max_iterations,
        }
    }
}

impl ExactConfig {
    pub fn lanczos_params(&self) -> LanczosParams {
        LanczosParams {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            ..Default::default()
        }
    }

    /// Whether exact diagonalization should run for `n_sites` sites.
    pub fn applies_to(&self, n_sites: usize) -> bool {
        self.enabled && n_sites <= self.max_sites
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RunConfig {
    pub graph: GraphConfig,
    pub hamiltonian: HamiltonianConfig,
    pub model: ModelConfig,
    pub sampler: SamplerConfig,
    pub optimizer: OptimizerConfig,
    pub preconditioner: PreconditionerConfig,
    pub training: TrainingConfig,
    pub exact: ExactConfig,
}

impl RunConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, IoError> {
        let config: RunConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use.
    pub fn validate(&self) -> Result<(), IoError> {
        let invalid = |msg: String| -> Result<(), IoError> { Err(IoError::Invalid(msg)) };
        if self.graph.n_sites() == 0 {
            return invalid("graph has no sites".to_string());
        }
        if !(0.0..=1.0).contains(&self.graph.edge_probability) {
            return Err(GraphError::InvalidProbability(self.graph.edge_probability).into());
        }
        if !self.hamiltonian.coupling.is_finite() || !self.hamiltonian.field.is_finite() {
            return invalid("hamiltonian couplings must be finite".to_string());
        }
        if self.model.alpha == 0 {
            return invalid("model.alpha must be at least 1".to_string());
        }
        if let Some(std) = self.model.init_std {
            if !(std.is_finite() && std >= 0.0) {
                return invalid(format!("model.init_std must be non-negative, got {}", std));
            }
        }
        if self.sampler.n_chains == 0 || self.sampler.n_samples == 0 {
            return invalid("sampler needs at least one chain and one sample".to_string());
        }
        if self.sampler.kind == SamplerKind::Exact && self.graph.n_sites() > MAX_ENUMERABLE_SITES {
            return invalid(format!(
                "exact sampling enumerates the basis and supports at most {} sites, got {}",
                MAX_ENUMERABLE_SITES,
                self.graph.n_sites()
            ));
        }
        if self.exact.max_sites > MAX_ENUMERABLE_SITES {
            return invalid(format!(
                "exact.max_sites must be at most {}, got {}",
                MAX_ENUMERABLE_SITES, self.exact.max_sites
            ));
        }
        if !(self.optimizer.learning_rate.is_finite() && self.optimizer.learning_rate > 0.0) {
            return invalid(format!(
                "optimizer.learning_rate must be positive, got {}",
                self.optimizer.learning_rate
            ));
        }
        if !(self.preconditioner.diag_shift.is_finite() && self.preconditioner.diag_shift >= 0.0) {
            return invalid(format!(
                "preconditioner.diag_shift must be non-negative, got {}",
                self.preconditioner.diag_shift
            ));
        }
        if self.training.logging_interval == 0 {
            return invalid("training.logging_interval must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Read and validate a run configuration from a YAML file.
pub fn read_run_config<P: AsRef<Path>>(filename: P) -> Result<RunConfig, IoError> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
