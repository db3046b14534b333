use std::time::Duration;

use serde::Serialize;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SystemSummary {
    pub total_cpu_usage: f32,
    pub total_memory_usage: f32,
}

impl SystemSummary {
    /// Build a summary from raw readings, clamped to [0, 100] and rounded
    /// to one decimal place.
    pub fn from_readings(cpu_usage: f32, total_memory: u64, available_memory: u64) -> Self {
        let memory = if total_memory == 0 {
            0.0
        } else {
            let used = total_memory.saturating_sub(available_memory);
            used as f64 / total_memory as f64 * 100.0
        };
        let cpu = if cpu_usage.is_finite() {
            f64::from(cpu_usage)
        } else {
            0.0
        };

        SystemSummary {
            total_cpu_usage: round_percent(cpu),
            total_memory_usage: round_percent(memory),
        }
    }
}

fn round_percent(value: f64) -> f32 {
    ((value.clamp(0.0, 100.0) * 10.0).round() / 10.0) as f32
}

/// Sample global CPU usage over `window` and read current memory usage.
pub async fn sample_system_summary(window: Duration) -> SystemSummary {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    tokio::time::sleep(window.max(MINIMUM_CPU_UPDATE_INTERVAL)).await;
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    SystemSummary::from_readings(
        sys.global_cpu_usage(),
        sys.total_memory(),
        sys.available_memory(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn memory_usage_is_derived_from_available() {
        let summary = SystemSummary::from_readings(12.34, 1000, 250);
        assert_eq!(summary.total_memory_usage, 75.0);
        assert_eq!(summary.total_cpu_usage, 12.3);
    }

    #[test]
    fn zero_total_memory_reports_zero() {
        let summary = SystemSummary::from_readings(0.0, 0, 0);
        assert_eq!(summary.total_memory_usage, 0.0);
    }

    #[test]
    fn non_finite_cpu_reports_zero() {
        let summary = SystemSummary::from_readings(f32::NAN, 10, 10);
        assert_eq!(summary.total_cpu_usage, 0.0);
    }

    #[tokio::test]
    async fn sampled_summary_is_in_range() {
        let summary = sample_system_summary(Duration::from_millis(50)).await;
        assert!((0.0..=100.0).contains(&summary.total_cpu_usage));
        assert!((0.0..=100.0).contains(&summary.total_memory_usage));
    }

    proptest! {
        #[test]
        fn readings_always_land_in_range(
            cpu in any::<f32>(),
            total in any::<u64>(),
            available in any::<u64>(),
        ) {
            let s = SystemSummary::from_readings(cpu, total, available);
            prop_assert!((0.0..=100.0).contains(&s.total_cpu_usage));
            prop_assert!((0.0..=100.0).contains(&s.total_memory_usage));
        }
    }
}
