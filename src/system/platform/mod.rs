use sysinfo::Process;

use super::kill::TerminateError;

pub trait PlatformSignals {
    /// Ask `process` to exit gracefully. Does not wait for the exit.
    fn send_terminate(process: &Process) -> Result<(), TerminateError>;

    /// Thread group (the process) that `id` belongs to, `None` if unknown.
    fn thread_group_id(id: u32) -> Option<u32>;
}

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use unix as platform_impl;
#[cfg(windows)]
use windows as platform_impl;

pub fn send_terminate(process: &Process) -> Result<(), TerminateError> {
    platform_impl::Platform::send_terminate(process)
}

pub fn thread_group_id(id: u32) -> Option<u32> {
    platform_impl::Platform::thread_group_id(id)
}
