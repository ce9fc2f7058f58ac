//! IO module - run configuration files.

mod config;

pub use config::{
    read_run_config, ExactConfig, GraphConfig, GraphKind, HamiltonianConfig, ModelConfig,
    ModelKind, OptimizerConfig, OptimizerKind, PreconditionerConfig, PreconditionerKind,
    RunConfig, SamplerConfig, SamplerKind, TrainingConfig,
};
