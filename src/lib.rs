//! Process inspector served over HTTP: list processes, terminate one by PID,
//! and sample system-wide CPU and memory usage.

pub mod api;
pub mod config;
pub mod logging;
pub mod system;
