//! Display state machine - what is on screen and when it changes.
//!
//! Three concerns share the one frame buffer, all driven from the main
//! loop on a single thread:
//!
//! - **Refresh** (1 s): re-read telemetry and repaint the main region.
//! - **Toggle** (5 s): flip between the Stats and Uptime views.
//! - **Keys**: KEY1 toggles display sleep; KEY0 flips the view on a short
//!   press and reboots the board when held for 3 s or more.
//!
//! ```text
//! Booting ──first refresh──► Running{Stats ⇄ Uptime} ──long hold──► Rebooting
//! ```
//!
//! Sleep/wake is an orthogonal flag: timers keep counting and the frame
//! buffer keeps updating while the panel is dark. Once the reboot latch is
//! set nothing on screen changes again; key events are still drained.


use heapless::String;

use crate::config::{
    Timing, DEVICE_LABEL, LINE_CAPACITY, REBOOT_TEXT, SPLASH_TEXT, STATUS_BAR_ENABLED,
};
use crate::error::Error;
use crate::telemetry::{cpu_text, platform_text, TelemetrySource};
use crate::ui::render::{render, Dirty};
use crate::ui::{ButtonEvent, ButtonId, Press, StatusBar, Surface, View, ViewKind};

/// Board-level side effects that are not part of the panel.
pub trait DeviceControl {
    /// Reset the microcontroller. The hardware implementation never returns.
    fn reset(&mut self);
}

/// Top-level phase, derived from the machine's fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Splash shown, no telemetry painted yet.
    Booting,
    Running(ViewKind),
    /// Terminal: the reboot message is up and a reset is pending or issued.
    Rebooting,
}

/// Mirror of the panel's power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Awake,
    Asleep,
}

/// What one `on_tick` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    pub toggled: bool,
    pub refreshed: bool,
    pub reset: bool,
    pub paint_error: Option<Error>,
}

/// What one `on_button_event` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Event consumed without effect.
    Ignored,
    Slept,
    Woke,
    /// Reboot key went down; hold timing started.
    HoldStarted,
    /// Reboot key released early: view flipped.
    PreviewFlip { held_ms: u64 },
    /// The panel rejected a sleep or wake command; power state unchanged.
    PowerFailed { error: Error },
    /// Reboot key held past the threshold: reset scheduled. `paint_error`
    /// is set if the reboot message could not be shown.
    Reboot {
        held_ms: u64,
        paint_error: Option<Error>,
    },
}

/// A periodic deadline anchored to its last firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Periodic {
    pub last_fired_ms: u64,
    pub period_ms: u64,
}

impl Periodic {
    pub const fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            last_fired_ms: now_ms,
            period_ms,
        }
    }

    pub fn due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fired_ms) >= self.period_ms
    }

    /// Move the anchor one period forward, or to `now_ms` if more than a
    /// period was missed. Keeps boundaries fixed despite poll jitter.
    pub fn advance(&mut self, now_ms: u64) {
        self.last_fired_ms += self.period_ms;
        if self.due(now_ms) {
            self.last_fired_ms = now_ms;
        }
    }

    pub fn restart(&mut self, now_ms: u64) {
        self.last_fired_ms = now_ms;
    }
}

/// Refresh and toggle cadences plus the reboot key hold start.
///
/// `hold_started_ms` is `Some` only while the reboot key is down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSet {
    pub refresh: Periodic,
    pub toggle: Periodic,
    pub hold_started_ms: Option<u64>,
}

pub struct StatusMachine {
    timing: Timing,
    kind: ViewKind,
    view: View,
    status_bar: StatusBar,
    timers: TimerSet,
    power: PowerState,
    booting: bool,
    reboot_latch: bool,
    reset_at_ms: Option<u64>,
    force_repaint: bool,
    status_bar_dirty: bool,
}

impl StatusMachine {
    /// Start in the booting phase with the splash as the current view.
    pub fn new(timing: Timing, now_ms: u64) -> Self {
        Self {
            timing,
            kind: ViewKind::Stats,
            view: View::message(SPLASH_TEXT),
            status_bar: StatusBar::new(DEVICE_LABEL, STATUS_BAR_ENABLED),
            timers: TimerSet {
                refresh: Periodic::new(timing.refresh_ms, now_ms),
                toggle: Periodic::new(timing.toggle_ms, now_ms),
                hold_started_ms: None,
            },
            power: PowerState::Awake,
            booting: true,
            reboot_latch: false,
            reset_at_ms: None,
            force_repaint: false,
            status_bar_dirty: true,
        }
    }

    /// Paint the boot view over the whole panel.
    pub fn show_splash<S: Surface>(&mut self, surface: &mut S) -> Result<(), Error> {
        self.status_bar_dirty = true;
        self.repaint(surface)
    }

    /// Advance the timers; called once per poll iteration.
    ///
    /// A toggle is applied before a refresh in the same tick, and there is
    /// at most one repaint per tick.
    pub fn on_tick<T, S, D>(
        &mut self,
        now_ms: u64,
        telemetry: &mut T,
        surface: &mut S,
        device: &mut D,
    ) -> Tick
    where
        T: TelemetrySource,
        S: Surface,
        D: DeviceControl,
    {
        let mut tick = Tick::default();

        if self.reboot_latch {
            if let Some(reset_at) = self.reset_at_ms {
                if now_ms >= reset_at {
                    self.reset_at_ms = None;
                    tick.reset = true;
                    device.reset();
                }
            }
            return tick;
        }

        if self.timers.toggle.due(now_ms) {
            self.timers.toggle.advance(now_ms);
            self.flip();
            tick.toggled = true;
        }

        let refresh_due = self.timers.refresh.due(now_ms);
        if refresh_due {
            self.timers.refresh.advance(now_ms);
        }

        if refresh_due || self.force_repaint {
            self.force_repaint = false;
            self.booting = false;
            self.view = self.compose(telemetry);
            self.sync_label();
            tick.refreshed = true;
            tick.paint_error = self.repaint(surface).err();
        }

        tick
    }

    /// Handle one decoded key event.
    pub fn on_button_event<S: Surface>(&mut self, event: ButtonEvent, surface: &mut S) -> Action {
        if self.reboot_latch {
            return Action::Ignored;
        }

        match (event.button, event.kind) {
            (ButtonId::Power, Press::Pressed) => self.toggle_power(surface),
            (ButtonId::Power, Press::Released) => Action::Ignored,
            (ButtonId::Reboot, Press::Pressed) => {
                self.timers.hold_started_ms = Some(event.time_ms);
                Action::HoldStarted
            }
            (ButtonId::Reboot, Press::Released) => {
                let Some(started) = self.timers.hold_started_ms.take() else {
                    return Action::Ignored;
                };
                let held_ms = event.time_ms.saturating_sub(started);

                if held_ms >= self.timing.hold_threshold_ms {
                    let paint_error = self.begin_reboot(event.time_ms, surface).err();
                    Action::Reboot {
                        held_ms,
                        paint_error,
                    }
                } else {
                    self.flip();
                    if self.timing.manual_flip_resets_toggle {
                        self.timers.toggle.restart(event.time_ms);
                    }
                    Action::PreviewFlip { held_ms }
                }
            }
        }
    }

    /// Show or hide the status bar; repainted on the next tick.
    pub fn set_status_bar_visible(&mut self, visible: bool) {
        if self.status_bar.visible != visible {
            self.status_bar.visible = visible;
            self.status_bar_dirty = true;
            self.force_repaint = true;
        }
    }

    pub fn phase(&self) -> Phase {
        if self.reboot_latch {
            Phase::Rebooting
        } else if self.booting {
            Phase::Booting
        } else {
            Phase::Running(self.kind)
        }
    }

    /// The periodic view that is (or will next be) shown.
    pub fn active_kind(&self) -> ViewKind {
        self.kind
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn reboot_latched(&self) -> bool {
        self.reboot_latch
    }

    fn flip(&mut self) {
        self.kind = self.kind.other();
        self.force_repaint = true;
    }

    fn compose<T: TelemetrySource>(&self, telemetry: &mut T) -> View {
        match self.kind {
            ViewKind::Stats => {
                let stats = telemetry.read_cpu_stats();
                View::Stats {
                    cpu_text: cpu_text(&stats),
                    platform_text: platform_text(telemetry.platform_name()),
                }
            }
            ViewKind::Uptime => View::Uptime {
                elapsed_ms: telemetry.read_uptime_ms(),
            },
        }
    }

    /// Point the status bar label at the current view.
    fn sync_label(&mut self) {
        let label = status_label(self.view.kind());
        if label != self.status_bar.label {
            self.status_bar.label = label;
            self.status_bar_dirty = true;
        }
    }

    /// Latch the reboot and schedule the reset. A failed paint of the
    /// message is returned but still reboots.
    fn begin_reboot<S: Surface>(&mut self, now_ms: u64, surface: &mut S) -> Result<(), Error> {
        self.view = View::message(REBOOT_TEXT);
        self.sync_label();
        let painted = self.repaint(surface);
        self.reboot_latch = true;
        self.force_repaint = false;
        self.reset_at_ms = Some(now_ms + self.timing.reboot_settle_ms);
        painted
    }

    /// Flip the panel power based on what the panel reports, and mirror
    /// the result.
    fn toggle_power<S: Surface>(&mut self, surface: &mut S) -> Action {
        let waking = !surface.is_awake();
        let result = if waking { surface.wake() } else { surface.sleep() };
        self.power = if surface.is_awake() {
            PowerState::Awake
        } else {
            PowerState::Asleep
        };

        match result {
            Ok(()) if waking => Action::Woke,
            Ok(()) => Action::Slept,
            Err(error) => Action::PowerFailed { error },
        }
    }

    /// Repaint the main region, plus the status bar if it changed.
    fn repaint<S: Surface>(&mut self, surface: &mut S) -> Result<(), Error> {
        let dirty = Dirty {
            status_bar: self.status_bar_dirty,
            main: true,
        };
        let commands = render(&self.view, &self.status_bar, dirty);

        let result = commands
            .iter()
            .try_for_each(|command| surface.paint(command))
            .and_then(|()| surface.flush());

        // On failure repaint everything next time so nothing stays stale.
        self.status_bar_dirty = result.is_err();
        result
    }
}

/// Status bar text for a view: `"Kraken | Stats"`, or just `"Kraken"`.
pub fn status_label(kind: Option<ViewKind>) -> String<LINE_CAPACITY> {
    let mut label = String::new();
    let _ = label.push_str(DEVICE_LABEL);
    if let Some(kind) = kind {
        let _ = label.push_str(" | ");
        let _ = label.push_str(kind.title());
    }
    label
}
