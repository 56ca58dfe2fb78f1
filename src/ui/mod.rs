//! User interface subsystem - OLED panel + two physical keys.
//!
//! The status machine decides *what* is shown (a [`View`] plus an
//! optional [`StatusBar`]); this module describes it, turns it into draw
//! commands and defines the seams to the hardware.
//!
//! ## Components
//!
//! - **Display**: 128×64 SH1107 OLED via SPI
//! - **Keys**: 2 tactile switches, scanned once per poll interval
//!   (KEY0 = reboot / view flip, KEY1 = display sleep/wake)

pub mod canvas;
pub mod display;
pub mod keys;
pub mod render;
pub mod sh1107;

#[cfg(feature = "embedded")]
pub mod buttons;

use heapless::String;

use crate::config::{KEY_POWER, KEY_REBOOT, LINE_CAPACITY};
use crate::error::Error;
use crate::telemetry::{CPU_TEXT_CAPACITY, PLATFORM_TEXT_CAPACITY};
use keys::KeyEvent;
use render::DrawCommand;

/// Room for a transient message.
pub const MESSAGE_CAPACITY: usize = 32;

/// The two periodic views the firmware rotates between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewKind {
    Stats,
    Uptime,
}

impl ViewKind {
    /// The view shown after a flip.
    pub const fn other(self) -> Self {
        match self {
            ViewKind::Stats => ViewKind::Uptime,
            ViewKind::Uptime => ViewKind::Stats,
        }
    }

    /// Short name used in the status bar.
    pub const fn title(self) -> &'static str {
        match self {
            ViewKind::Stats => "Stats",
            ViewKind::Uptime => "Uptime",
        }
    }
}

/// What is currently on screen. Replaced wholesale, never edited.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    /// CPU clock / temperature block plus the board line.
    Stats {
        cpu_text: String<CPU_TEXT_CAPACITY>,
        platform_text: String<PLATFORM_TEXT_CAPACITY>,
    },
    /// Time since boot.
    Uptime { elapsed_ms: u64 },
    /// Transient message (splash, "Rebooting...").
    Message { text: String<MESSAGE_CAPACITY> },
}

impl View {
    /// Build a message view, truncating to [`MESSAGE_CAPACITY`].
    pub fn message(text: &str) -> Self {
        View::Message {
            text: truncated(text),
        }
    }

    /// The periodic kind this view belongs to, if any.
    pub fn kind(&self) -> Option<ViewKind> {
        match self {
            View::Stats { .. } => Some(ViewKind::Stats),
            View::Uptime { .. } => Some(ViewKind::Uptime),
            View::Message { .. } => None,
        }
    }
}

/// Inverted strip across the top of the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBar {
    pub label: String<LINE_CAPACITY>,
    pub visible: bool,
}

impl StatusBar {
    pub fn new(label: &str, visible: bool) -> Self {
        Self {
            label: truncated(label),
            visible,
        }
    }
}

/// Copy as much of `text` as fits into a fixed-capacity string.
pub fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Physical keys, after mapping from key numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// KEY0 - short press flips the view, long press reboots.
    Reboot,
    /// KEY1 - toggles display sleep.
    Power,
}

impl TryFrom<u8> for ButtonId {
    type Error = Error;

    fn try_from(key_number: u8) -> Result<Self, Error> {
        match key_number {
            KEY_REBOOT => Ok(ButtonId::Reboot),
            KEY_POWER => Ok(ButtonId::Power),
            other => Err(Error::InputDecode(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    Pressed,
    Released,
}

/// A decoded key transition with its timestamp (ms since boot).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub kind: Press,
    pub time_ms: u64,
}

impl ButtonEvent {
    /// Map a raw key event onto a button.
    pub fn decode(raw: KeyEvent) -> Result<Self, Error> {
        let button = ButtonId::try_from(raw.key_number)?;
        let kind = if raw.pressed {
            Press::Pressed
        } else {
            Press::Released
        };
        Ok(Self {
            button,
            kind,
            time_ms: raw.time_ms,
        })
    }
}

/// Non-blocking source of button events, at most one per call.
pub trait InputSource {
    fn poll_event(&mut self) -> Option<ButtonEvent>;
}

/// The panel as seen by the status machine.
///
/// `sleep` and `wake` are idempotent. `is_awake` only changes when a power
/// command succeeds.
pub trait Surface {
    /// Draw one command into the frame buffer.
    fn paint(&mut self, command: &DrawCommand) -> Result<(), Error>;

    /// Push the frame buffer to the panel.
    fn flush(&mut self) -> Result<(), Error>;

    fn sleep(&mut self) -> Result<(), Error>;

    fn wake(&mut self) -> Result<(), Error>;

    fn is_awake(&self) -> bool;
}
