//! Sweep configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. The defaults reproduce the reference balance sweep: PuLP on
//! `grid.metis` with 12 parts over `-v {1.05, 1.10, 1.15}` × `-e {0.5, 0.7, 0.9}`.

use super::process::default_fixed_args;
use super::{CancelToken, FailurePolicy, ParameterAxis, ParameterGrid, ProcessInvoker};
use crate::partlab_error::PartLabError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Partitioner executable.
    pub partitioner: PathBuf,
    pub graph_file: PathBuf,
    pub parts: usize,
    pub axes: Vec<ParameterAxis>,
    /// Arguments appended to every invocation.
    pub fixed_args: Vec<String>,
    /// Results table path.
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    /// Decimal places for parameter values in the table.
    pub precision: usize,
    /// Concurrent invocations (needs the `parallel` feature above 1).
    pub workers: usize,
    pub timeout_secs: Option<f64>,
    pub on_failure: FailurePolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            partitioner: PathBuf::from("./pulp"),
            graph_file: PathBuf::from("grid.metis"),
            parts: 12,
            axes: vec![
                ParameterAxis::new("Vertex Balance (v)", "-v", vec![1.05, 1.10, 1.15]),
                ParameterAxis::new("Edge Balance (e)", "-e", vec![0.5, 0.7, 0.9]),
            ],
            fixed_args: default_fixed_args(),
            output: PathBuf::from("pulp_results.txt"),
            json_output: None,
            precision: 2,
            workers: 1,
            timeout_secs: None,
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl SweepConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PartLabError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PartLabError> {
        let cfg = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::debug!("loaded sweep config from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PartLabError> {
        if self.parts == 0 {
            return Err(PartLabError::InvalidParameter("parts must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(PartLabError::InvalidParameter("workers must be at least 1".into()));
        }
        if let Some(t) = self.timeout_secs {
            if !(t > 0.0 && Duration::try_from_secs_f64(t).is_ok()) {
                return Err(PartLabError::InvalidParameter(format!(
                    "timeout must be a positive, representable number of seconds, got {t}"
                )));
            }
        }
        self.grid().map(|_| ())
    }

    pub fn grid(&self) -> Result<ParameterGrid, PartLabError> {
        ParameterGrid::new(self.axes.clone())
    }

    /// Per-run deadline. Values [`validate`](Self::validate) rejects yield `None`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .and_then(|t| Duration::try_from_secs_f64(t).ok())
            .filter(|d| !d.is_zero())
    }

    /// Process invoker for this configuration.
    pub fn invoker(&self, cancel: Option<CancelToken>) -> ProcessInvoker {
        ProcessInvoker {
            program: self.partitioner.clone(),
            fixed_args: self.fixed_args.clone(),
            timeout: self.timeout(),
            cancel,
        }
    }
}
