//! Running the external partitioner as a child process.
//!
//! Command line: `<program> <graph_file> <parts> [<flag> <value>]... <fixed args>`.
//! Standard output is returned for metric extraction; standard error is only
//! used to describe failures.

use super::{CancelToken, GridPoint, Invoke};
use crate::partlab_error::PartLabError;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const STDERR_TAIL: usize = 400;

/// Quiet mode and a fixed seed, as used for reproducible sweeps.
pub fn default_fixed_args() -> Vec<String> {
    vec!["-q".into(), "-s".into(), "123".into()]
}

#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    pub program: PathBuf,
    pub fixed_args: Vec<String>,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl ProcessInvoker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            fixed_args: default_fixed_args(),
            timeout: None,
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Arguments passed for one grid point.
    pub fn args(&self, graph_file: &Path, parts: usize, point: &GridPoint) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![graph_file.into(), parts.to_string().into()];
        for p in &point.params {
            args.push(p.flag.clone().into());
            args.push(p.value.to_string().into());
        }
        args.extend(self.fixed_args.iter().map(OsString::from));
        args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn finish(
        &self,
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    ) -> Result<String, PartLabError> {
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let stderr = stderr.trim();
            let tail_start = stderr
                .char_indices()
                .rev()
                .nth(STDERR_TAIL)
                .map_or(0, |(i, _)| i);
            return Err(PartLabError::Invocation {
                program: self.program_name(),
                message: format!("exited with {status}: {}", &stderr[tail_start..]),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn wait_polling(&self, mut child: Child) -> Result<String, PartLabError> {
        // drain both pipes so a chatty child never blocks on a full buffer
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);
        let started = Instant::now();

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    kill_and_reap(&mut child);
                    return Err(e.into());
                }
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                kill_and_reap(&mut child);
                return Err(PartLabError::Cancelled);
            }
            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    kill_and_reap(&mut child);
                    return Err(PartLabError::Timeout {
                        program: self.program_name(),
                        seconds: limit.as_secs_f64(),
                    });
                }
            }
            thread::sleep(POLL_INTERVAL);
        };
        self.finish(status, join_reader(stdout), join_reader(stderr))
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // a read error just truncates the captured output
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("kill failed (child probably exited): {e}");
    }
    if let Err(e) = child.wait() {
        log::warn!("failed to reap partitioner process: {e}");
    }
}

impl Invoke for ProcessInvoker {
    fn invoke(
        &self,
        graph_file: &Path,
        parts: usize,
        point: &GridPoint,
    ) -> Result<String, PartLabError> {
        let args = self.args(graph_file, parts, point);
        log::debug!("running {} {:?}", self.program_name(), args);
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PartLabError::Invocation {
                program: self.program_name(),
                message: format!("failed to launch: {e}"),
            })?;

        if self.timeout.is_none() && self.cancel.is_none() {
            let output = child.wait_with_output()?;
            return self.finish(output.status, output.stdout, output.stderr);
        }
        self.wait_polling(child)
    }
}
