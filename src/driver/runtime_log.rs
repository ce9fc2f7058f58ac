//! In-memory training history with YAML export.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::IoError;
use super::vmc::TrainingRecord;

/// Records emitted by a training run, in step order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RuntimeLog {
    records: Vec<TrainingRecord>,
}

impl RuntimeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrainingRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Energy means in record order.
    pub fn energies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.energy.mean).collect()
    }

    pub fn last(&self) -> Option<&TrainingRecord> {
        self.records.last()
    }

    pub fn to_yaml(&self) -> Result<String, IoError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the history to `path` as YAML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
