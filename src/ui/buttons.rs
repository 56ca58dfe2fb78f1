//! GPIO key input.
//!
//! Two physical keys (active-low with internal pull-up):
//!   - KEY0 (GP15) - short press flips the view, hold 3 s to reboot
//!   - KEY1 (GP17) - display sleep / wake
//!
//! Keys are sampled once per main loop iteration; edges go through the
//! bounded [`Keys`] queue and come out one at a time as `ButtonEvent`s.

use defmt::{trace, warn};
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use super::keys::{KeyEvent, Keys};
use super::{ButtonEvent, InputSource};
use crate::config::{KEY_COUNT, KEY_QUEUE_DEPTH};

pub struct KeyPins {
    pins: [Input<'static>; KEY_COUNT],
    keys: Keys<KEY_COUNT, KEY_QUEUE_DEPTH>,
}

impl KeyPins {
    /// `pins` are ordered by key number and already configured `Pull::Up`.
    pub fn new(pins: [Input<'static>; KEY_COUNT]) -> Self {
        Self {
            pins,
            keys: Keys::new(),
        }
    }

    fn scan(&mut self) {
        let mut pressed = [false; KEY_COUNT];
        for (level, pin) in pressed.iter_mut().zip(self.pins.iter()) {
            *level = pin.is_low();
        }
        self.keys.scan(pressed, Instant::now().as_millis());

        if self.keys.take_overflow() {
            warn!("Keys: queue full, events dropped");
        }
    }
}

impl InputSource for KeyPins {
    fn poll_event(&mut self) -> Option<ButtonEvent> {
        self.scan();

        while let Some(raw) = self.keys.next_event() {
            match ButtonEvent::decode(raw) {
                Ok(event) => return Some(event),
                Err(_) => log_dropped(raw),
            }
        }
        None
    }
}

fn log_dropped(raw: KeyEvent) {
    trace!("Keys: dropped undecodable {}", raw);
}
