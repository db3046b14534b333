use sysinfo::{Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use super::process::{ProbeError, ProcessSnapshot, Snapshots, cpu_share, memory_percent};

/// Long-lived sysinfo handle used to enumerate processes.
///
/// sysinfo computes per-process CPU usage from the delta between two
/// refreshes, so the same `System` is kept across enumerations. The first
/// listing reports 0% for every process.
pub struct Collector {
    sys: System,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, Self::refresh_kind());
        Collector { sys }
    }

    fn refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing()
            .with_memory()
            .with_cpu()
            .with_user(UpdateKind::OnlyIfNotSet)
            .without_tasks()
    }

    /// Re-enumerate every visible process.
    pub fn processes(&mut self) -> Vec<ProcessSnapshot> {
        self.sys.refresh_memory();
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, Self::refresh_kind());

        let users = Users::new_with_refreshed_list();
        let total_memory = self.sys.total_memory();
        let cpus = self.sys.cpus().len();

        let probes = self
            .sys
            .processes()
            .values()
            .map(|process| probe(process, &users, total_memory, cpus));
        let mut snapshots = Snapshots::new(probes);
        let listed: Vec<ProcessSnapshot> = snapshots.by_ref().collect();

        tracing::debug!(
            listed = listed.len(),
            skipped = snapshots.skipped(),
            "enumerated processes"
        );
        listed
    }
}

fn probe(
    process: &Process,
    users: &Users,
    total_memory: u64,
    cpus: usize,
) -> Result<ProcessSnapshot, ProbeError> {
    let pid = process.pid().as_u32();
    if !process.exists() {
        return Err(ProbeError::Vanished(pid));
    }
    if process.thread_kind().is_some() {
        return Err(ProbeError::Thread(pid));
    }

    let name = process.name().to_string_lossy().to_string();
    // sysinfo leaves both empty when it could not read the process at all.
    if name.is_empty() && process.start_time() == 0 {
        return Err(ProbeError::AccessDenied(pid));
    }

    let user = process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|u| u.name().to_string());

    Ok(ProcessSnapshot {
        pid,
        name,
        cpu_percent: cpu_share(process.cpu_usage(), cpus),
        memory_percent: memory_percent(process.memory(), total_memory),
        start_time: process.start_time(),
        user,
    })
}
