//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, display geometry and labels
//! live here so they can be tuned in one place.

// Timing

/// Main loop sleep between iterations (ms).
pub const POLL_INTERVAL_MS: u64 = 100;

/// Telemetry / uptime redraw cadence (ms).
pub const REFRESH_PERIOD_MS: u64 = 1_000;

/// Automatic Stats <-> Uptime switch cadence (ms).
pub const TOGGLE_PERIOD_MS: u64 = 5_000;

/// Minimum hold on the reboot key that counts as a long press (ms).
pub const HOLD_THRESHOLD_MS: u64 = 3_000;

/// Time the "Rebooting..." message stays on screen before reset (ms).
pub const REBOOT_SETTLE_MS: u64 = 500;

/// When `true`, a short press on the reboot key also restarts the
/// automatic toggle cadence. When `false` the periodic flip keeps its
/// existing schedule, so the view can flip twice in quick succession.
pub const MANUAL_FLIP_RESETS_TOGGLE: bool = false;

/// Timing parameters for the status state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub refresh_ms: u64,
    pub toggle_ms: u64,
    pub hold_threshold_ms: u64,
    pub reboot_settle_ms: u64,
    pub manual_flip_resets_toggle: bool,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        refresh_ms: REFRESH_PERIOD_MS,
        toggle_ms: TOGGLE_PERIOD_MS,
        hold_threshold_ms: HOLD_THRESHOLD_MS,
        reboot_settle_ms: REBOOT_SETTLE_MS,
        manual_flip_resets_toggle: MANUAL_FLIP_RESETS_TOGGLE,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// Display geometry

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// Height of the inverted strip at the top of the panel (px).
pub const STATUS_BAR_HEIGHT: u32 = 12;

/// Top-left of the status bar label.
pub const STATUS_LABEL_ORIGIN: (i32, i32) = (2, 1);

/// Top-left of the first line of main content.
pub const MAIN_TEXT_ORIGIN: (i32, i32) = (10, 14);

/// Vertical step between main content lines (FONT_6X10).
pub const LINE_HEIGHT: i32 = 10;

/// Lines that fit below the status bar at `LINE_HEIGHT`.
pub const MAX_MAIN_LINES: usize = 5;

/// Characters kept per line; anything beyond is dropped.
pub const LINE_CAPACITY: usize = 24;

/// Initial status bar visibility.
pub const STATUS_BAR_ENABLED: bool = true;

/// SH1107 contrast level.
pub const DISPLAY_CONTRAST: u8 = 0x6F;

/// Panel SPI clock (Hz).
pub const DISPLAY_SPI_HZ: u32 = 10_000_000;

// Labels

pub const DEVICE_LABEL: &str = "Kraken";
pub const SPLASH_TEXT: &str = "Kraken Machine";
pub const REBOOT_TEXT: &str = "Rebooting...";

/// Shown in place of a reading that could not be taken.
pub const PLACEHOLDER: &str = "N/A";

// GPIO pin assignments (Pico + 1.3" 128x64 OLED hat)
//
// These are logical names; the `embassy_rp::peripherals::*` pins are
// picked in `main.rs`.
//
//   OLED DC    → GP8
//   OLED CS    → GP9
//   OLED CLK   → GP10 (SPI1 SCK)
//   OLED DIN   → GP11 (SPI1 TX)
//   OLED RST   → GP12
//   KEY0       → GP15 (reboot, hold to reset)
//   KEY1       → GP17 (display sleep/wake)

/// Key number of the reboot / view-flip button.
pub const KEY_REBOOT: u8 = 0;

/// Key number of the display power button.
pub const KEY_POWER: u8 = 1;

/// Number of scanned keys.
pub const KEY_COUNT: usize = 2;

/// Pending key events kept before new ones are dropped.
pub const KEY_QUEUE_DEPTH: usize = 8;

// Telemetry

/// CPU cores reported on the Stats view (RP2040 is dual core).
pub const MAX_CORES: usize = 2;

pub const PLATFORM_NAME: &str = "RP2040";
