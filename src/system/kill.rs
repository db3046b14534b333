use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use thiserror::Error;

use super::platform;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TerminateError {
    #[error("Process {0} not found")]
    NotFound(u32),
    #[error("Permission denied for PID {0}")]
    PermissionDenied(u32),
    #[error("{0}")]
    Other(String),
}

/// Sends a graceful termination request and waits for the process to exit.
#[derive(Clone, Copy, Debug)]
pub struct Terminator {
    /// `None` waits forever.
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl Default for Terminator {
    fn default() -> Self {
        Self::new(Some(Duration::from_secs(30)), Duration::from_millis(100))
    }
}

impl Terminator {
    pub fn new(timeout: Option<Duration>, poll_interval: Duration) -> Self {
        Terminator {
            timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    pub async fn terminate(&self, pid: u32) -> Result<(), TerminateError> {
        let owner = blocking(move || platform::thread_group_id(pid))
            .await?
            .unwrap_or(pid);
        if owner == std::process::id() {
            return Err(TerminateError::Other(
                "Refusing to terminate the server process.".to_string(),
            ));
        }
        if owner != pid {
            // A thread id, not a process.
            return Err(TerminateError::NotFound(pid));
        }

        let start_time = blocking(move || signal_process(pid)).await??;
        tracing::debug!(pid, "termination signal sent, waiting for exit");

        let wait = wait_for_exit(pid, start_time, self.poll_interval);
        match self.timeout {
            None => wait.await,
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                TerminateError::Other(format!(
                    "Process {pid} did not exit within {} ms.",
                    limit.as_millis()
                ))
            })?,
        }
    }
}

/// Run a sysinfo read off the async worker.
async fn blocking<T, F>(f: F) -> Result<T, TerminateError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TerminateError::Other(e.to_string()))
}

/// Signal `pid` and return its start time, used to spot PID reuse later.
fn signal_process(pid: u32) -> Result<u64, TerminateError> {
    let mut sys = System::new();
    let process = probe(&mut sys, pid).ok_or(TerminateError::NotFound(pid))?;
    platform::send_terminate(process)?;
    Ok(process.start_time())
}

fn probe(sys: &mut System, pid: u32) -> Option<&sysinfo::Process> {
    let pids = [Pid::from_u32(pid)];
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&pids),
        true,
        ProcessRefreshKind::nothing().without_tasks(),
    );
    sys.process(pids[0])
        .filter(|process| process.thread_kind().is_none())
}

async fn wait_for_exit(
    pid: u32,
    start_time: u64,
    poll_interval: Duration,
) -> Result<(), TerminateError> {
    let mut sys = System::new();
    loop {
        let (returned, running) = blocking(move || {
            let running = is_running(&mut sys, pid, start_time);
            (sys, running)
        })
        .await?;
        if !running {
            return Ok(());
        }
        sys = returned;
        tokio::time::sleep(poll_interval).await;
    }
}

/// A zombie has already exited, and a different start time means the PID
/// now belongs to another process.
fn is_running(sys: &mut System, pid: u32, start_time: u64) -> bool {
    match probe(sys, pid) {
        Some(process) => {
            !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
                && process.start_time() == start_time
        }
        None => false,
    }
}
