//! Host diagnostic counters.
//!
//! Reads process memory, free/total memory and load average from procfs
//! on Linux. Other platforms report only the core count.

use serde::Serialize;

/// Memory usage of the current process, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessMemory {
    /// Resident set size.
    pub rss: u64,
    /// Virtual memory size.
    #[serde(rename = "virtual")]
    pub virtual_size: u64,
    /// Data segment size.
    pub data: u64,
}

/// System-wide figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemInfo {
    /// Free memory in bytes.
    pub freemem: Option<u64>,
    /// Total memory in bytes.
    pub totalmem: Option<u64>,
    /// 1, 5 and 15 minute load averages.
    pub loadavg: Option<[f64; 3]>,
    /// Logical core count.
    pub cpus: usize,
}

/// A point-in-time reading of host counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMetrics {
    /// Process memory, when the platform exposes it.
    pub memory_usage: Option<ProcessMemory>,
    /// System figures.
    pub system_info: SystemInfo,
}

impl HostMetrics {
    /// Reads the current host counters.
    pub fn collect() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let mut metrics = Self {
            memory_usage: None,
            system_info: SystemInfo {
                cpus,
                ..Default::default()
            },
        };
        collect_platform(&mut metrics);
        metrics
    }
}

#[cfg(target_os = "linux")]
fn collect_platform(metrics: &mut HostMetrics) {
    if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
        metrics.memory_usage = parse_process_memory(&status);
    }

    if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
        metrics.system_info.freemem = parse_kb_field(&meminfo, "MemFree");
        metrics.system_info.totalmem = parse_kb_field(&meminfo, "MemTotal");
    }

    if let Ok(loadavg) = std::fs::read_to_string("/proc/loadavg") {
        metrics.system_info.loadavg = parse_loadavg(&loadavg);
    }
}

#[cfg(not(target_os = "linux"))]
fn collect_platform(_metrics: &mut HostMetrics) {}

/// Parses a `Key:   1234 kB` line from a procfs table, returning bytes.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_kb_field(text: &str, key: &str) -> Option<u64> {
    text.lines().find_map(|line| {
        let (name, rest) = line.split_once(':')?;
        if name.trim() != key {
            return None;
        }
        let kb = rest.split_whitespace().next()?.parse::<u64>().ok()?;
        Some(kb.saturating_mul(1024))
    })
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_process_memory(status: &str) -> Option<ProcessMemory> {
    Some(ProcessMemory {
        rss: parse_kb_field(status, "VmRSS")?,
        virtual_size: parse_kb_field(status, "VmSize")?,
        data: parse_kb_field(status, "VmData").unwrap_or(0),
    })
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_loadavg(text: &str) -> Option<[f64; 3]> {
    let mut fields = text.split_whitespace().map(|v| v.parse::<f64>().ok());
    Some([fields.next()??, fields.next()??, fields.next()??])
}
