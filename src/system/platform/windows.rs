use sysinfo::{Process, Signal};

use super::PlatformSignals;
use crate::system::kill::TerminateError;

pub struct Platform;

impl PlatformSignals for Platform {
    fn send_terminate(process: &Process) -> Result<(), TerminateError> {
        let pid = process.pid().as_u32();
        match process.kill_with(Signal::Term) {
            Some(true) => Ok(()),
            Some(false) => Err(TerminateError::Other(format!(
                "Failed to send SIGTERM to PID {pid}"
            ))),
            // No graceful signal on Windows; TerminateProcess is all there is.
            None if process.kill() => Ok(()),
            None => Err(TerminateError::Other(format!("Failed to kill PID {pid}"))),
        }
    }

    // Windows thread ids never name a process.
    fn thread_group_id(_id: u32) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    use super::*;

    #[test]
    fn failed_kill_is_not_reported_as_permission_denied() {
        // PID 4 is the kernel's "System" process; TerminateProcess always fails on it.
        let pids = [Pid::from_u32(4)];
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&pids),
            true,
            ProcessRefreshKind::nothing(),
        );
        let Some(process) = sys.process(pids[0]) else {
            return;
        };

        assert_eq!(
            Platform::send_terminate(process),
            Err(TerminateError::Other("Failed to kill PID 4".to_string()))
        );
    }
}
