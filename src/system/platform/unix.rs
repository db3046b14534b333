use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use sysinfo::Process;

use super::PlatformSignals;
use crate::system::kill::TerminateError;

pub struct Platform;

impl PlatformSignals for Platform {
    fn send_terminate(process: &Process) -> Result<(), TerminateError> {
        let pid = process.pid().as_u32();
        // kill(2) treats 0 and negative values as process groups.
        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return Err(TerminateError::NotFound(pid)),
        };

        signal::kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|errno| match errno {
            Errno::ESRCH => TerminateError::NotFound(pid),
            Errno::EPERM => TerminateError::PermissionDenied(pid),
            other => TerminateError::Other(other.desc().to_string()),
        })
    }

    // Linux hands out thread ids from the pid space and kill(2) on a thread id
    // signals its whole thread group, so resolve the owner first.
    #[cfg(target_os = "linux")]
    fn thread_group_id(id: u32) -> Option<u32> {
        let raw = i32::try_from(id).ok()?;
        let status = procfs::process::Process::new(raw).ok()?.status().ok()?;
        u32::try_from(status.tgid).ok()
    }

    #[cfg(not(target_os = "linux"))]
    fn thread_group_id(_id: u32) -> Option<u32> {
        None
    }
}
