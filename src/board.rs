//! RP2040 board services - telemetry readings and chip reset.
//!
//! The RP2040 has two Cortex-M0+ cores on one `clk_sys` and a single
//! on-die temperature sensor on ADC channel 4, so both "cores" report the
//! same frequency and temperature.

use defmt::warn;
use embassy_rp::adc::{self, Adc, Blocking, Channel};
use embassy_rp::clocks::clk_sys_freq;
use embassy_time::Instant;

use crate::config::{MAX_CORES, PLATFORM_NAME};
use crate::error::Error;
use crate::status::DeviceControl;
use crate::telemetry::{CpuStats, TelemetrySource};

/// ADC reference voltage (V).
const ADC_VREF: f32 = 3.3;

/// 12-bit ADC full scale.
const ADC_FULL_SCALE: f32 = 4096.0;

/// Sensor voltage at 27 °C and slope (V/°C), from the RP2040 datasheet.
const TEMP_SENSOR_V27: f32 = 0.706;
const TEMP_SENSOR_SLOPE: f32 = 0.001721;

/// Convert a raw temperature-channel reading to °C.
pub fn die_temperature(raw: u16) -> f32 {
    let volts = f32::from(raw) * ADC_VREF / ADC_FULL_SCALE;
    27.0 - (volts - TEMP_SENSOR_V27) / TEMP_SENSOR_SLOPE
}

pub struct Rp2040Telemetry {
    adc: Adc<'static, Blocking>,
    sensor: Channel<'static>,
}

impl Rp2040Telemetry {
    pub fn new(adc: Adc<'static, Blocking>, sensor: Channel<'static>) -> Self {
        Self { adc, sensor }
    }

    fn read_temperature(&mut self) -> Result<f32, adc::Error> {
        self.adc.blocking_read(&mut self.sensor).map(die_temperature)
    }
}

impl TelemetrySource for Rp2040Telemetry {
    fn read_cpu_stats(&mut self) -> Result<CpuStats, Error> {
        let freq_mhz = clk_sys_freq() as f32 / 1_000_000.0;
        let temp_c = match self.read_temperature() {
            Ok(t) => Some(t),
            Err(_) => {
                warn!("Telemetry: temperature read failed");
                None
            }
        };

        let mut stats = CpuStats::default();
        for _ in 0..MAX_CORES {
            stats
                .freq_mhz
                .push(freq_mhz)
                .map_err(|_| Error::TelemetryUnavailable)?;
            if let Some(t) = temp_c {
                stats
                    .temp_c
                    .push(t)
                    .map_err(|_| Error::TelemetryUnavailable)?;
            }
        }
        Ok(stats)
    }

    fn read_uptime_ms(&mut self) -> u64 {
        Instant::now().as_millis()
    }

    fn platform_name(&self) -> &str {
        PLATFORM_NAME
    }
}

/// Whole-chip reset through the Cortex-M system control block.
pub struct Chip;

impl DeviceControl for Chip {
    fn reset(&mut self) {
        cortex_m::peripheral::SCB::sys_reset();
    }
}
