//! System telemetry - CPU clock, die temperature, uptime.
//!
//! The hardware side only hands back raw numbers; the text shown on the
//! Stats and Uptime views is produced here with fixed precision so the
//! rendered output is deterministic:
//!
//! ```text
//! CPU Stats
//! 125.0/125.0 MHz      (one decimal per core)
//! 27.45/27.45 C        (two decimals per core)
//! ```
//!
//! A reading that could not be taken renders as [`PLACEHOLDER`].

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{MAX_CORES, PLACEHOLDER};
use crate::error::Error;

/// Room for the three-line CPU block.
pub const CPU_TEXT_CAPACITY: usize = 64;

/// Room for `"Board: <name>"`.
pub const PLATFORM_TEXT_CAPACITY: usize = 24;

/// Room for `"<d>d HH:MM:SS"`.
pub const UPTIME_TEXT_CAPACITY: usize = 20;

/// One sample of per-core clock and temperature.
///
/// An empty vector means that reading is unavailable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuStats {
    pub freq_mhz: Vec<f32, MAX_CORES>,
    pub temp_c: Vec<f32, MAX_CORES>,
}

/// Source of the numbers shown on the Stats and Uptime views.
///
/// Implementations must not block for more than a few milliseconds.
pub trait TelemetrySource {
    /// Current per-core frequency and temperature.
    fn read_cpu_stats(&mut self) -> Result<CpuStats, Error>;

    /// Monotonic time since boot (ms).
    fn read_uptime_ms(&mut self) -> u64;

    /// Short board / chip name.
    fn platform_name(&self) -> &str;
}

/// Format the CPU block of the Stats view.
pub fn cpu_text(stats: &Result<CpuStats, Error>) -> String<CPU_TEXT_CAPACITY> {
    let mut out = String::new();
    let _ = out.push_str("CPU Stats\n");
    match stats {
        Ok(stats) => {
            push_joined(&mut out, &stats.freq_mhz, 1, " MHz");
            let _ = out.push('\n');
            push_joined(&mut out, &stats.temp_c, 2, " C");
        }
        Err(_) => {
            let _ = out.push_str(PLACEHOLDER);
            let _ = out.push('\n');
            let _ = out.push_str(PLACEHOLDER);
        }
    }
    out
}

/// Format the platform line of the Stats view.
pub fn platform_text(name: &str) -> String<PLATFORM_TEXT_CAPACITY> {
    let mut out = String::new();
    let _ = out.push_str("Board: ");
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Format an uptime as `"<d>d HH:MM:SS"`.
pub fn uptime_text(elapsed_ms: u64) -> String<UPTIME_TEXT_CAPACITY> {
    let secs = elapsed_ms / 1_000;
    let days = secs / 86_400;
    let hours = (secs / 3_600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;

    let mut out = String::new();
    let _ = write!(out, "{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds);
    out
}

/// Append `values` joined by `/` with `decimals` places, then `unit`.
///
/// An empty slice is written as the placeholder without a unit.
fn push_joined<const N: usize>(out: &mut String<N>, values: &[f32], decimals: usize, unit: &str) {
    if values.is_empty() {
        let _ = out.push_str(PLACEHOLDER);
        return;
    }
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            let _ = out.push('/');
        }
        let _ = write!(out, "{:.*}", decimals, value);
    }
    let _ = out.push_str(unit);
}
