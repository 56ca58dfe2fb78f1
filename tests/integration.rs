//! Integration tests for kraken-status host-testable logic.
//!
//! Drives the public API end to end: raw key levels go through the key
//! queue and decoder into the status machine, which paints onto a
//! recording surface.

use kraken_status::config::{
    Timing, HOLD_THRESHOLD_MS, KEY_COUNT, KEY_POWER, KEY_REBOOT, POLL_INTERVAL_MS,
    REBOOT_SETTLE_MS, REFRESH_PERIOD_MS, TOGGLE_PERIOD_MS,
};
use kraken_status::status::{Action, DeviceControl, Phase, PowerState, StatusMachine};
use kraken_status::telemetry::{CpuStats, TelemetrySource};
use kraken_status::ui::keys::Keys;
use kraken_status::ui::render::DrawCommand;
use kraken_status::ui::{ButtonEvent, ButtonId, InputSource, Press, Surface, View, ViewKind};
use kraken_status::Error;
use proptest::prelude::*;
use std::collections::VecDeque;

// ════════════════════════════════════════════════════════════════════════
// Harness
// ════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Recorder {
    frames: usize,
    last_texts: Vec<String>,
    pending: Vec<String>,
    awake_toggles: u32,
    awake: bool,
}

impl Surface for Recorder {
    fn paint(&mut self, command: &DrawCommand) -> Result<(), Error> {
        if let DrawCommand::Text { text, .. } = command {
            self.pending.push(text.as_str().to_owned());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.frames += 1;
        self.last_texts = std::mem::take(&mut self.pending);
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), Error> {
        self.awake_toggles += 1;
        self.awake = false;
        Ok(())
    }

    fn wake(&mut self) -> Result<(), Error> {
        self.awake_toggles += 1;
        self.awake = true;
        Ok(())
    }

    fn is_awake(&self) -> bool {
        self.awake
    }
}

struct Sensors {
    now_ms: u64,
}

impl TelemetrySource for Sensors {
    fn read_cpu_stats(&mut self) -> Result<CpuStats, Error> {
        let mut stats = CpuStats::default();
        stats.freq_mhz.push(133.0).map_err(|_| Error::TelemetryUnavailable)?;
        stats.temp_c.push(31.5).map_err(|_| Error::TelemetryUnavailable)?;
        Ok(stats)
    }

    fn read_uptime_ms(&mut self) -> u64 {
        self.now_ms
    }

    fn platform_name(&self) -> &str {
        "RP2040"
    }
}

#[derive(Default)]
struct Board {
    resets: u32,
}

impl DeviceControl for Board {
    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// A machine plus fake hardware, advanced in poll-interval steps.
struct Device {
    machine: StatusMachine,
    panel: Recorder,
    sensors: Sensors,
    board: Board,
    keys: Keys<KEY_COUNT, 8>,
    levels: [bool; KEY_COUNT],
    refreshes: u32,
}

impl Device {
    fn boot() -> Self {
        let mut panel = Recorder {
            awake: true,
            ..Recorder::default()
        };
        let mut machine = StatusMachine::new(Timing::DEFAULT, 0);
        machine.show_splash(&mut panel).unwrap();
        Self {
            machine,
            panel,
            sensors: Sensors { now_ms: 0 },
            board: Board::default(),
            keys: Keys::new(),
            levels: [false; KEY_COUNT],
            refreshes: 0,
        }
    }

    fn set_key(&mut self, key: u8, down: bool) {
        self.levels[usize::from(key)] = down;
    }

    /// One main-loop iteration at `now_ms`.
    fn step(&mut self, now_ms: u64) -> Option<Action> {
        self.sensors.now_ms = now_ms;
        self.keys.scan(self.levels, now_ms);

        let action = self
            .keys
            .next_event()
            .and_then(|raw| ButtonEvent::decode(raw).ok())
            .map(|event| self.machine.on_button_event(event, &mut self.panel));

        let tick = self.machine.on_tick(
            now_ms,
            &mut self.sensors,
            &mut self.panel,
            &mut self.board,
        );
        if tick.refreshed {
            self.refreshes += 1;
        }
        action
    }

    fn run_until(&mut self, from: u64, to: u64) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut now = from + POLL_INTERVAL_MS;
        while now <= to {
            actions.extend(self.step(now));
            now += POLL_INTERVAL_MS;
        }
        actions
    }
}

/// Replays timestamped events, releasing each once the clock reaches it.
struct Script {
    events: VecDeque<ButtonEvent>,
    now_ms: u64,
}

impl Script {
    fn new(events: &[ButtonEvent]) -> Self {
        Self {
            events: events.iter().copied().collect(),
            now_ms: 0,
        }
    }
}

impl InputSource for Script {
    fn poll_event(&mut self) -> Option<ButtonEvent> {
        match self.events.front() {
            Some(next) if next.time_ms <= self.now_ms => self.events.pop_front(),
            _ => None,
        }
    }
}

/// Main loop with a scripted input source; returns the reset time if any.
fn replay(dev: &mut Device, script: &mut Script, until_ms: u64) -> Option<u64> {
    let mut now = 0;
    while now < until_ms {
        now += POLL_INTERVAL_MS;
        script.now_ms = now;
        dev.sensors.now_ms = now;
        if let Some(event) = script.poll_event() {
            dev.machine.on_button_event(event, &mut dev.panel);
        }
        let tick = dev
            .machine
            .on_tick(now, &mut dev.sensors, &mut dev.panel, &mut dev.board);
        if tick.reset {
            return Some(now);
        }
    }
    None
}

fn event(button: ButtonId, kind: Press, time_ms: u64) -> ButtonEvent {
    ButtonEvent {
        button,
        kind,
        time_ms,
    }
}

// ════════════════════════════════════════════════════════════════════════
// Scenarios
// ════════════════════════════════════════════════════════════════════════

#[test]
fn boot_shows_splash_then_stats() {
    let mut dev = Device::boot();
    assert_eq!(dev.panel.last_texts, ["Kraken", "Kraken Machine"]);
    assert_eq!(dev.machine.phase(), Phase::Booting);

    dev.run_until(0, 1_000);
    assert_eq!(dev.machine.phase(), Phase::Running(ViewKind::Stats));
    assert_eq!(
        dev.panel.last_texts,
        [
            "Kraken | Stats",
            "CPU Stats",
            "133.0 MHz",
            "31.50 C",
            "Board: RP2040"
        ]
    );
}

#[test]
fn uptime_view_after_five_seconds() {
    let mut dev = Device::boot();
    dev.run_until(0, 5_000);

    assert_eq!(dev.machine.phase(), Phase::Running(ViewKind::Uptime));
    assert_eq!(dev.machine.view(), &View::Uptime { elapsed_ms: 5_000 });
    assert_eq!(
        dev.panel.last_texts,
        ["Kraken | Uptime", "Uptime", "0d 00:00:05"]
    );

    dev.run_until(5_000, 10_000);
    assert_eq!(dev.machine.active_kind(), ViewKind::Stats);
}

#[test]
fn key0_tap_flips_view_through_key_queue() {
    let mut dev = Device::boot();
    dev.run_until(0, 1_000);

    dev.set_key(KEY_REBOOT, true);
    assert_eq!(dev.step(1_100), Some(Action::HoldStarted));
    dev.set_key(KEY_REBOOT, false);
    assert_eq!(
        dev.step(1_300),
        Some(Action::PreviewFlip { held_ms: 200 })
    );

    assert_eq!(dev.machine.active_kind(), ViewKind::Uptime);
    assert_eq!(dev.panel.last_texts[0], "Kraken | Uptime");
    assert!(!dev.machine.reboot_latched());
}

#[test]
fn key0_hold_reboots_once_after_settle() {
    let mut dev = Device::boot();
    dev.run_until(0, 1_000);

    dev.set_key(KEY_REBOOT, true);
    dev.step(1_100);
    dev.run_until(1_100, 4_000);
    dev.set_key(KEY_REBOOT, false);
    assert_eq!(
        dev.step(4_100),
        Some(Action::Reboot {
            held_ms: 3_000,
            paint_error: None
        })
    );

    assert_eq!(dev.machine.phase(), Phase::Rebooting);
    assert_eq!(dev.panel.last_texts, ["Kraken", "Rebooting..."]);

    dev.run_until(4_100, 4_500);
    assert_eq!(dev.board.resets, 0);
    dev.step(4_600);
    assert_eq!(dev.board.resets, 1);
    dev.run_until(4_600, 10_000);
    assert_eq!(dev.board.resets, 1);
}

#[test]
fn key1_sleeps_and_wakes_panel() {
    let mut dev = Device::boot();

    dev.set_key(KEY_POWER, true);
    assert_eq!(dev.step(100), Some(Action::Slept));
    dev.set_key(KEY_POWER, false);
    assert_eq!(dev.step(200), Some(Action::Ignored));
    assert_eq!(dev.machine.power(), PowerState::Asleep);
    assert!(!dev.panel.is_awake());

    // Frames keep being produced while dark.
    let frames = dev.panel.frames;
    dev.run_until(200, 2_000);
    assert!(dev.panel.frames > frames);

    dev.set_key(KEY_POWER, true);
    assert_eq!(dev.step(2_100), Some(Action::Woke));
    assert!(dev.panel.is_awake());
    assert_eq!(dev.panel.awake_toggles, 2);
}

#[test]
fn scripted_short_press_flips_without_reset() {
    let mut dev = Device::boot();
    let mut script = Script::new(&[
        event(ButtonId::Reboot, Press::Pressed, 2_000),
        event(ButtonId::Reboot, Press::Released, 2_400),
    ]);

    assert_eq!(replay(&mut dev, &mut script, 4_900), None);
    assert_eq!(dev.machine.active_kind(), ViewKind::Uptime);
    assert!(!dev.machine.reboot_latched());
}

#[test]
fn scripted_long_press_resets_after_settle() {
    let mut dev = Device::boot();
    let mut script = Script::new(&[
        event(ButtonId::Reboot, Press::Pressed, 2_000),
        event(ButtonId::Reboot, Press::Released, 5_500),
    ]);

    assert_eq!(replay(&mut dev, &mut script, 10_000), Some(6_000));
    assert_eq!(dev.board.resets, 1);
    assert!(dev.machine.reboot_latched());
}

// ════════════════════════════════════════════════════════════════════════
// Properties
// ════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cadence_follows_wall_clock(polls in 1u64..400) {
        let end = polls * POLL_INTERVAL_MS;
        let mut dev = Device::boot();
        dev.run_until(0, end);

        prop_assert_eq!(u64::from(dev.refreshes), end / REFRESH_PERIOD_MS);
        let expected = if (end / TOGGLE_PERIOD_MS) % 2 == 0 {
            ViewKind::Stats
        } else {
            ViewKind::Uptime
        };
        prop_assert_eq!(dev.machine.active_kind(), expected);
    }

    #[test]
    fn short_holds_never_reboot(start in 0u64..60_000, held in 0u64..HOLD_THRESHOLD_MS) {
        let mut dev = Device::boot();
        dev.machine.on_button_event(event(ButtonId::Reboot, Press::Pressed, start), &mut dev.panel);
        let action = dev
            .machine
            .on_button_event(event(ButtonId::Reboot, Press::Released, start + held), &mut dev.panel);

        prop_assert_eq!(action, Action::PreviewFlip { held_ms: held });
        prop_assert!(!dev.machine.reboot_latched());
        dev.run_until(start + held, start + held + 2_000);
        prop_assert_eq!(dev.board.resets, 0);
    }

    #[test]
    fn long_holds_reset_exactly_once(start in 0u64..60_000, extra in 0u64..20_000) {
        let held = HOLD_THRESHOLD_MS + extra;
        let release = start + held;
        let mut dev = Device::boot();
        dev.machine.on_button_event(event(ButtonId::Reboot, Press::Pressed, start), &mut dev.panel);
        let action = dev
            .machine
            .on_button_event(event(ButtonId::Reboot, Press::Released, release), &mut dev.panel);

        prop_assert_eq!(
            action,
            Action::Reboot {
                held_ms: held,
                paint_error: None
            }
        );
        dev.step(release + REBOOT_SETTLE_MS - 1);
        prop_assert_eq!(dev.board.resets, 0);
        dev.step(release + REBOOT_SETTLE_MS);
        dev.step(release + REBOOT_SETTLE_MS + 1_000);
        prop_assert_eq!(dev.board.resets, 1);
    }

    #[test]
    fn double_power_toggle_restores_state(time in 0u64..100_000) {
        let mut dev = Device::boot();
        let before = dev.machine.power();
        for offset in [0, 10] {
            dev.machine.on_button_event(event(ButtonId::Power, Press::Pressed, time + offset), &mut dev.panel);
        }
        prop_assert_eq!(dev.machine.power(), before);
        prop_assert!(dev.panel.is_awake());
    }

    #[test]
    fn latched_machine_is_frozen(
        presses in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..20),
    ) {
        let mut dev = Device::boot();
        dev.run_until(0, 1_000);
        dev.machine.on_button_event(event(ButtonId::Reboot, Press::Pressed, 1_000), &mut dev.panel);
        dev.machine.on_button_event(event(ButtonId::Reboot, Press::Released, 4_000), &mut dev.panel);

        let frames = dev.panel.frames;
        let view = dev.machine.view().clone();
        let power = dev.machine.power();

        for (i, (power_key, pressed)) in presses.into_iter().enumerate() {
            let button = if power_key { ButtonId::Power } else { ButtonId::Reboot };
            let kind = if pressed { Press::Pressed } else { Press::Released };
            let at = 4_100 + i as u64 * 100;
            let action = dev.machine.on_button_event(event(button, kind, at), &mut dev.panel);
            prop_assert_eq!(action, Action::Ignored);
            dev.step(at);
        }

        prop_assert_eq!(dev.panel.frames, frames);
        prop_assert_eq!(dev.machine.view(), &view);
        prop_assert_eq!(dev.machine.power(), power);
        prop_assert!(dev.board.resets <= 1);
    }
}
