//! Status display firmware for an RP2040 with a 128×64 SH1107 OLED.
//!
//! Everything that decides what the panel shows - the status state
//! machine, the renderer, telemetry formatting, the key queue and the
//! SH1107 frame buffer - is plain `no_std` logic that builds and tests on
//! the host.
//!
//! Usage: `cargo test` (host) or `cargo build --release --features embedded
//! --target thumbv6m-none-eabi` (firmware).
//!
//! Note: the hardware shims (`board`, `ui::buttons`) and
//! the `kraken-status` binary are only compiled with the `embedded`
//! feature.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod status;
pub mod telemetry;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod board;

pub use error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
