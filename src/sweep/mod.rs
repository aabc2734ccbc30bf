//! Parameter sweeps over an external partitioner.
//!
//! A [`ParameterGrid`] is the Cartesian product of named value lists. The
//! harness calls an [`Invoke`] implementation once per grid point, in
//! row-major order (first axis slowest), and turns each run's text output
//! into a [`SweepRecord`]. Every point yields exactly one record; a run whose
//! output lacks a metric gets `None` for that metric, never a made-up value.

pub mod config;
pub mod extract;
pub mod process;
pub mod table;

pub use config::SweepConfig;
pub use extract::{ExtractedMetrics, extract_labeled, extract_metrics};
pub use process::ProcessInvoker;
pub use table::{ResultsTable, write_json};

use crate::partlab_error::PartLabError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One named list of values passed to the partitioner under `flag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAxis {
    /// Column label in the results table.
    pub name: String,
    /// Command-line flag, e.g. `-v`.
    pub flag: String,
    pub values: Vec<f64>,
}

impl ParameterAxis {
    pub fn new(name: impl Into<String>, flag: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            flag: flag.into(),
            values,
        }
    }
}

/// A parameter value at one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamValue {
    pub name: String,
    pub flag: String,
    pub value: f64,
}

/// One combination of axis values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Position in row-major enumeration order.
    pub index: usize,
    pub params: Vec<ParamValue>,
}

impl GridPoint {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.value).collect()
    }
}

/// Cartesian product of one or more non-empty axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    axes: Vec<ParameterAxis>,
}

impl ParameterGrid {
    pub fn new(axes: Vec<ParameterAxis>) -> Result<Self, PartLabError> {
        if axes.is_empty() {
            return Err(PartLabError::InvalidParameter(
                "parameter grid needs at least one axis".into(),
            ));
        }
        for axis in &axes {
            if axis.values.is_empty() {
                return Err(PartLabError::InvalidParameter(format!(
                    "axis `{}` has no values",
                    axis.name
                )));
            }
            if axis.values.iter().any(|v| !v.is_finite()) {
                return Err(PartLabError::InvalidParameter(format!(
                    "axis `{}` has a non-finite value",
                    axis.name
                )));
            }
        }
        Ok(Self { axes })
    }

    pub fn axes(&self) -> &[ParameterAxis] {
        &self.axes
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|a| a.values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All points, first axis varying slowest.
    pub fn points(&self) -> Vec<GridPoint> {
        self.axes
            .iter()
            .map(|axis| axis.values.iter().copied())
            .multi_cartesian_product()
            .enumerate()
            .map(|(index, values)| GridPoint {
                index,
                params: self
                    .axes
                    .iter()
                    .zip(values)
                    .map(|(axis, value)| ParamValue {
                        name: axis.name.clone(),
                        flag: axis.flag.clone(),
                        value,
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Runs the external partitioner for one grid point and returns its stdout.
pub trait Invoke {
    fn invoke(
        &self,
        graph_file: &Path,
        parts: usize,
        point: &GridPoint,
    ) -> Result<String, PartLabError>;
}

impl<F> Invoke for F
where
    F: Fn(&Path, usize, &GridPoint) -> Result<String, PartLabError>,
{
    fn invoke(
        &self,
        graph_file: &Path,
        parts: usize,
        point: &GridPoint,
    ) -> Result<String, PartLabError> {
        self(graph_file, parts, point)
    }
}

/// What to do when an invocation fails (launch failure, non-zero exit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the sweep and return the error.
    #[default]
    Abort,
    /// Keep going; the point's record has no metrics.
    RecordAbsent,
}

/// Result of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub point: GridPoint,
    pub edge_cut: Option<u64>,
    pub max_cut: Option<u64>,
}

impl SweepRecord {
    fn absent(point: GridPoint) -> Self {
        Self {
            point,
            edge_cut: None,
            max_cut: None,
        }
    }
}

/// Shared cancellation flag for a running sweep.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn run_point<I: Invoke + ?Sized>(
    graph_file: &Path,
    parts: usize,
    point: GridPoint,
    total: usize,
    invoker: &I,
    policy: FailurePolicy,
) -> Result<SweepRecord, PartLabError> {
    log::info!(
        "grid point {}/{}: {}",
        point.index + 1,
        total,
        point
            .params
            .iter()
            .map(|p| format!("{}={}", p.flag, p.value))
            .join(" ")
    );
    match invoker.invoke(graph_file, parts, &point) {
        Ok(text) => {
            let metrics = extract_metrics(&text);
            if metrics.edge_cut.is_none() || metrics.max_cut.is_none() {
                log::debug!("point {}: incomplete metrics in output", point.index);
            }
            log::info!(
                "point {} -> Edge Cut: {:?}, Max Cut: {:?}",
                point.index,
                metrics.edge_cut,
                metrics.max_cut
            );
            Ok(SweepRecord {
                point,
                edge_cut: metrics.edge_cut,
                max_cut: metrics.max_cut,
            })
        }
        Err(PartLabError::Cancelled) => Err(PartLabError::Cancelled),
        Err(e @ PartLabError::Timeout { .. }) => {
            log::warn!("point {}: {e}; recording absent metrics", point.index);
            Ok(SweepRecord::absent(point))
        }
        Err(e) => match policy {
            FailurePolicy::Abort => Err(e),
            FailurePolicy::RecordAbsent => {
                log::warn!("point {}: {e}; recording absent metrics", point.index);
                Ok(SweepRecord::absent(point))
            }
        },
    }
}

/// Invoke the partitioner once per grid point, sequentially.
///
/// Records come back in grid order, one per point. Timeouts always produce
/// an absent-metrics record; other invocation errors follow `policy`.
pub fn run_grid<I: Invoke + ?Sized>(
    graph_file: &Path,
    parts: usize,
    grid: &ParameterGrid,
    invoker: &I,
    policy: FailurePolicy,
) -> Result<Vec<SweepRecord>, PartLabError> {
    let points = grid.points();
    let total = points.len();
    let mut records = Vec::with_capacity(total);
    for point in points {
        records.push(run_point(graph_file, parts, point, total, invoker, policy)?);
    }
    Ok(records)
}

/// Like [`run_grid`], on a pool of at most `workers` threads.
///
/// Records are returned in grid order. If `cancel` fires, or a point fails
/// under [`FailurePolicy::Abort`] (which cancels `cancel` so in-flight
/// invocations sharing the token are stopped), no records are returned.
#[cfg(feature = "parallel")]
pub fn run_grid_parallel<I: Invoke + Sync + ?Sized>(
    graph_file: &Path,
    parts: usize,
    grid: &ParameterGrid,
    invoker: &I,
    policy: FailurePolicy,
    workers: usize,
    cancel: &CancelToken,
) -> Result<Vec<SweepRecord>, PartLabError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| PartLabError::InvalidParameter(format!("worker pool: {e}")))?;
    let points = grid.points();
    let total = points.len();

    let results: Vec<Result<SweepRecord, PartLabError>> = pool.install(|| {
        points
            .into_par_iter()
            .map(|point| {
                if cancel.is_cancelled() {
                    return Err(PartLabError::Cancelled);
                }
                let result = run_point(graph_file, parts, point, total, invoker, policy);
                if result.is_err() {
                    cancel.cancel();
                }
                result
            })
            .collect()
    });

    let mut records = Vec::with_capacity(total);
    let mut cancelled = false;
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(PartLabError::Cancelled) => cancelled = true,
            Err(e) => return Err(e),
        }
    }
    if cancelled || cancel.is_cancelled() {
        return Err(PartLabError::Cancelled);
    }
    Ok(records)
}

/// Run the sweep described by `cfg` and write its results table.
///
/// Nothing is written unless every grid point completed.
pub fn run_sweep(cfg: &SweepConfig, cancel: &CancelToken) -> Result<Vec<SweepRecord>, PartLabError> {
    cfg.validate()?;
    let grid = cfg.grid()?;
    let invoker = cfg.invoker(Some(cancel.clone()));
    log::info!(
        "sweeping {} points of {} with {} parts",
        grid.len(),
        cfg.graph_file.display(),
        cfg.parts
    );

    #[cfg(feature = "parallel")]
    let records = if cfg.workers > 1 {
        run_grid_parallel(
            &cfg.graph_file,
            cfg.parts,
            &grid,
            &invoker,
            cfg.on_failure,
            cfg.workers,
            cancel,
        )?
    } else {
        run_grid(&cfg.graph_file, cfg.parts, &grid, &invoker, cfg.on_failure)?
    };
    #[cfg(not(feature = "parallel"))]
    let records = {
        if cfg.workers > 1 {
            log::warn!("built without the `parallel` feature; running sequentially");
        }
        run_grid(&cfg.graph_file, cfg.parts, &grid, &invoker, cfg.on_failure)?
    };

    if cancel.is_cancelled() {
        return Err(PartLabError::Cancelled);
    }
    ResultsTable::new(&grid, &records)
        .with_precision(cfg.precision)
        .write_to(&cfg.output)?;
    log::info!("results saved to {}", cfg.output.display());
    if let Some(json) = &cfg.json_output {
        write_json(json, &records)?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_grid() -> ParameterGrid {
        ParameterGrid::new(vec![
            ParameterAxis::new("v", "-v", vec![1.05, 1.10, 1.15]),
            ParameterAxis::new("e", "-e", vec![0.5, 0.7, 0.9]),
        ])
        .unwrap()
    }

    #[test]
    fn grid_is_row_major() {
        let points = balance_grid().points();
        assert_eq!(points.len(), 9);
        let pairs: Vec<_> = points.iter().map(|p| (p.values()[0], p.values()[1])).collect();
        assert_eq!(pairs[0], (1.05, 0.5));
        assert_eq!(pairs[1], (1.05, 0.7));
        assert_eq!(pairs[2], (1.05, 0.9));
        assert_eq!(pairs[3], (1.10, 0.5));
        assert_eq!(pairs[8], (1.15, 0.9));
        assert!(points.iter().enumerate().all(|(i, p)| p.index == i));
    }

    #[test]
    fn grid_rejects_empty_axes() {
        assert!(ParameterGrid::new(vec![]).is_err());
        assert!(ParameterGrid::new(vec![ParameterAxis::new("v", "-v", vec![])]).is_err());
        assert!(ParameterGrid::new(vec![ParameterAxis::new("v", "-v", vec![f64::NAN])]).is_err());
    }

    #[test]
    fn failed_extraction_keeps_the_record() {
        let grid = balance_grid();
        let stub = |_: &Path, _: usize, p: &GridPoint| -> Result<String, PartLabError> {
            if p.index % 2 == 0 {
                Ok(format!("Edge Cut: {}\nMax Cut: 3\n", p.index))
            } else {
                Ok("segfault?".to_string())
            }
        };
        let records = run_grid(Path::new("g"), 4, &grid, &stub, FailurePolicy::Abort).unwrap();
        assert_eq!(records.len(), 9);
        assert_eq!(records[2].edge_cut, Some(2));
        assert_eq!(records[1].edge_cut, None);
        assert_eq!(records[1].max_cut, None);
    }

    #[test]
    fn invocation_errors_follow_policy() {
        let grid = balance_grid();
        let stub = |_: &Path, _: usize, p: &GridPoint| -> Result<String, PartLabError> {
            if p.index == 4 {
                Err(PartLabError::Invocation {
                    program: "pulp".into(),
                    message: "exit status 1".into(),
                })
            } else {
                Ok("Edge Cut: 1\nMax Cut: 1\n".into())
            }
        };
        assert!(matches!(
            run_grid(Path::new("g"), 2, &grid, &stub, FailurePolicy::Abort),
            Err(PartLabError::Invocation { .. })
        ));
        let records = run_grid(Path::new("g"), 2, &grid, &stub, FailurePolicy::RecordAbsent).unwrap();
        assert_eq!(records.len(), 9);
        assert_eq!(records[4].edge_cut, None);
        assert_eq!(records[5].edge_cut, Some(1));
    }

    #[test]
    fn timeouts_are_recorded_as_absent() {
        let grid = balance_grid();
        let stub = |_: &Path, _: usize, p: &GridPoint| -> Result<String, PartLabError> {
            if p.index == 0 {
                Err(PartLabError::Timeout {
                    program: "pulp".into(),
                    seconds: 1.0,
                })
            } else {
                Ok("Edge Cut: 5\n".into())
            }
        };
        let records = run_grid(Path::new("g"), 2, &grid, &stub, FailurePolicy::Abort).unwrap();
        assert_eq!(records[0].edge_cut, None);
        assert_eq!(records[1].edge_cut, Some(5));
        assert_eq!(records[1].max_cut, None);
    }

    #[test]
    fn sweep_with_unrepresentable_timeout_fails_before_running() {
        let cfg = SweepConfig {
            partitioner: "./definitely-not-a-partitioner-binary".into(),
            timeout_secs: Some(1e30),
            ..SweepConfig::default()
        };
        assert!(matches!(
            run_sweep(&cfg, &CancelToken::new()),
            Err(PartLabError::InvalidParameter(_))
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_records_keep_grid_order() {
        use std::time::Duration;

        let grid = balance_grid();
        // later points finish first
        let stub = |_: &Path, _: usize, p: &GridPoint| -> Result<String, PartLabError> {
            std::thread::sleep(Duration::from_millis(10 * (9 - p.index) as u64));
            Ok(format!("Edge Cut: {}\nMax Cut: {}\n", p.index, 2 * p.index))
        };
        let cancel = CancelToken::new();
        let records =
            run_grid_parallel(Path::new("g"), 4, &grid, &stub, FailurePolicy::Abort, 4, &cancel)
                .unwrap();
        assert_eq!(records.len(), 9);
        let sequential = balance_grid().points();
        for (i, (r, p)) in records.iter().zip(&sequential).enumerate() {
            assert_eq!(r.point, *p);
            assert_eq!(r.edge_cut, Some(i as u64));
            assert_eq!(r.max_cut, Some(2 * i as u64));
        }
        assert!(!cancel.is_cancelled());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_abort_cancels_and_returns_nothing() {
        let grid = balance_grid();
        let stub = |_: &Path, _: usize, p: &GridPoint| -> Result<String, PartLabError> {
            if p.index == 4 {
                Err(PartLabError::Invocation {
                    program: "pulp".into(),
                    message: "exit status 1".into(),
                })
            } else {
                Ok("Edge Cut: 1\nMax Cut: 1\n".into())
            }
        };
        let cancel = CancelToken::new();
        let result =
            run_grid_parallel(Path::new("g"), 4, &grid, &stub, FailurePolicy::Abort, 3, &cancel);
        assert!(matches!(
            result,
            Err(PartLabError::Invocation { .. }) | Err(PartLabError::Cancelled)
        ));
        assert!(cancel.is_cancelled());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_run_stops_when_cancelled_up_front() {
        let grid = balance_grid();
        let stub = |_: &Path, _: usize, _: &GridPoint| -> Result<String, PartLabError> {
            Ok("Edge Cut: 1\n".into())
        };
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            run_grid_parallel(Path::new("g"), 4, &grid, &stub, FailurePolicy::Abort, 2, &cancel),
            Err(PartLabError::Cancelled)
        ));
    }

    #[test]
    fn cancel_token_is_shared() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }
}
