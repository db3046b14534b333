use serde::Serialize;
use thiserror::Error;

/// Point-in-time view of a single process, as served by `GET /processes/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    /// Seconds since the Unix epoch.
    pub start_time: u64,
    pub user: Option<String>,
}

/// Why a single process could not be read during enumeration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    #[error("process {0} exited before it could be inspected")]
    Vanished(u32),
    #[error("access denied reading process {0}")]
    AccessDenied(u32),
    #[error("{0} is a thread, not a process")]
    Thread(u32),
}

/// Iterator adapter that drops processes whose probe failed.
///
/// Enumeration is partial-success: one unreadable process never aborts the
/// listing, it is simply left out and counted.
pub struct Snapshots<I> {
    inner: I,
    skipped: usize,
}

impl<I> Snapshots<I>
where
    I: Iterator<Item = Result<ProcessSnapshot, ProbeError>>,
{
    pub fn new(inner: I) -> Self {
        Self { inner, skipped: 0 }
    }

    /// Number of processes dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<I> Iterator for Snapshots<I>
where
    I: Iterator<Item = Result<ProcessSnapshot, ProbeError>>,
{
    type Item = ProcessSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(snapshot) => return Some(snapshot),
                Err(err) => {
                    tracing::trace!(%err, "skipping process");
                    self.skipped += 1;
                }
            }
        }
    }
}

/// Resident memory as a share of physical memory, in [0, 100].
pub fn memory_percent(resident_bytes: u64, total_bytes: u64) -> f32 {
    if total_bytes == 0 {
        return 0.0;
    }
    let pct = resident_bytes as f64 / total_bytes as f64 * 100.0;
    pct.clamp(0.0, 100.0) as f32
}

/// Per-process CPU usage (which sysinfo reports per core, so it can exceed
/// 100 on multi-core hosts) as a share of the whole machine, in [0, 100].
pub fn cpu_share(raw_usage: f32, logical_cpus: usize) -> f32 {
    if !raw_usage.is_finite() {
        return 0.0;
    }
    let cpus = logical_cpus.max(1) as f32;
    (raw_usage / cpus).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(pid: u32) -> ProcessSnapshot {
        ProcessSnapshot {
            pid,
            name: format!("proc-{pid}"),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            start_time: 1_700_000_000,
            user: Some("tester".into()),
        }
    }

    #[test]
    fn failed_probes_are_skipped_not_fatal() {
        let probes = vec![
            Ok(snapshot(1)),
            Err(ProbeError::Vanished(2)),
            Ok(snapshot(3)),
            Err(ProbeError::AccessDenied(4)),
            Err(ProbeError::Vanished(5)),
            Err(ProbeError::Thread(6)),
        ];
        let mut iter = Snapshots::new(probes.into_iter());
        let pids: Vec<u32> = iter.by_ref().map(|s| s.pid).collect();

        assert_eq!(pids, vec![1, 3]);
        assert_eq!(iter.skipped(), 4);
    }

    #[test]
    fn all_failures_yield_empty_listing() {
        let probes = vec![Err(ProbeError::Vanished(7)), Err(ProbeError::AccessDenied(8))];
        let mut iter = Snapshots::new(probes.into_iter());
        assert!(iter.next().is_none());
        assert_eq!(iter.skipped(), 2);
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let json = serde_json::to_value(snapshot(42)).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["cpu_percent", "memory_percent", "name", "pid", "start_time", "user"]
        );
    }

    #[test]
    fn unknown_user_serializes_as_null() {
        let mut s = snapshot(9);
        s.user = None;
        let json = serde_json::to_value(s).unwrap();
        assert!(json["user"].is_null());
    }

    #[test]
    fn memory_percent_handles_zero_total() {
        assert_eq!(memory_percent(1024, 0), 0.0);
        assert!((memory_percent(512, 1024) - 50.0).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn memory_percent_stays_in_range(resident in any::<u64>(), total in any::<u64>()) {
            let pct = memory_percent(resident, total);
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn cpu_share_stays_in_range(raw in any::<f32>(), cpus in 0usize..512) {
            let pct = cpu_share(raw, cpus);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
