//! `--profile-cpu` support.
//!
//! Samples the current process through `sysinfo` before and after the
//! dispatched command. CPU usage is computed by sysinfo between the two
//! refreshes, so very short commands may report 0%.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Measurement started before a command runs.
pub struct CpuProfile {
    system: System,
    pid: Pid,
    started: Instant,
}

impl CpuProfile {
    /// Takes the baseline sample.
    pub fn start() -> Self {
        let pid = Pid::from_u32(std::process::id());
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        Self {
            system,
            pid,
            started: Instant::now(),
        }
    }

    /// Takes the second sample and reports the difference.
    pub fn finish(mut self) -> ProfileReport {
        let elapsed = self.started.elapsed();
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        let process = self.system.process(self.pid);
        ProfileReport {
            elapsed,
            cpu_percent: process.map(|p| p.cpu_usage()),
            memory_mb: process.map(|p| p.memory() as f64 / 1024.0 / 1024.0),
        }
    }
}

/// Result of a [`CpuProfile`].
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    /// Wall-clock time of the command.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// CPU usage between the samples (None if the process was not found).
    pub cpu_percent: Option<f32>,
    /// Resident memory in MB at the end.
    pub memory_mb: Option<f64>,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl ProfileReport {
    /// Emits the report as a `debug` event; stdout stays free for results.
    pub fn log(&self) {
        tracing::debug!(
            elapsed_ms = self.elapsed.as_millis() as u64,
            cpu_percent = self.cpu_percent,
            memory_mb = self.memory_mb,
            "command profile"
        );
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile: {:.1} ms wall", self.elapsed.as_secs_f64() * 1000.0)?;
        match self.cpu_percent {
            Some(cpu) => write!(f, ", {cpu:.1}% cpu")?,
            None => write!(f, ", cpu n/a")?,
        }
        match self.memory_mb {
            Some(mb) => write!(f, ", {mb:.1} MB rss"),
            None => write!(f, ", rss n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_current_process() {
        let report = CpuProfile::start().finish();
        assert!(report.memory_mb.is_some_and(|mb| mb > 0.0));
        assert!(report.cpu_percent.is_some());
    }

    #[test]
    fn display_formats_all_fields() {
        let report = ProfileReport {
            elapsed: Duration::from_millis(12),
            cpu_percent: Some(3.3),
            memory_mb: Some(5.0),
        };
        assert_eq!(report.to_string(), "profile: 12.0 ms wall, 3.3% cpu, 5.0 MB rss");
    }

    #[test]
    fn display_handles_missing_samples() {
        let report = ProfileReport {
            elapsed: Duration::from_millis(1),
            cpu_percent: None,
            memory_mb: None,
        };
        assert_eq!(report.to_string(), "profile: 1.0 ms wall, cpu n/a, rss n/a");
    }

    #[test]
    fn serializes_elapsed_as_millis() {
        let report = ProfileReport {
            elapsed: Duration::from_millis(250),
            cpu_percent: None,
            memory_mb: Some(1.5),
        };
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["elapsed_ms"], 250);
        assert_eq!(value["memory_mb"], 1.5);
    }
}
