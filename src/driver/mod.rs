//! Driver module - the variational training loop and its history.

mod vmc;
mod runtime_log;

pub use vmc::{TrainingRecord, Vmc, VmcIter};
pub use runtime_log::RuntimeLog;
