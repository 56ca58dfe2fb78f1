//! Key scanner with a bounded event queue.
//!
//! Each scan compares the current pressed-levels against the previous
//! scan and queues one [`KeyEvent`] per edge. Scanning once per poll
//! interval (100 ms) is slower than any contact bounce, so a level seen
//! on two consecutive scans is already debounced.
//!
//! When the queue is full new events are dropped and an overflow flag is
//! latched until [`Keys::take_overflow`] is called.

use heapless::Deque;

/// Raw key transition as seen by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key_number: u8,
    pub pressed: bool,
    pub time_ms: u64,
}

/// Scanner state for `N` keys with room for `Q` pending events.
pub struct Keys<const N: usize, const Q: usize> {
    held: [bool; N],
    queue: Deque<KeyEvent, Q>,
    overflowed: bool,
}

impl<const N: usize, const Q: usize> Keys<N, Q> {
    /// All keys start released.
    pub const fn new() -> Self {
        Self {
            held: [false; N],
            queue: Deque::new(),
            overflowed: false,
        }
    }

    /// Record the pressed-level of every key at `now_ms`.
    pub fn scan(&mut self, pressed: [bool; N], now_ms: u64) {
        for (key_number, (&now_down, was_down)) in
            pressed.iter().zip(self.held.iter_mut()).enumerate()
        {
            if now_down == *was_down {
                continue;
            }
            *was_down = now_down;

            let event = KeyEvent {
                key_number: key_number as u8,
                pressed: now_down,
                time_ms: now_ms,
            };
            if self.queue.push_back(event).is_err() {
                self.overflowed = true;
            }
        }
    }

    /// Oldest pending event.
    pub fn next_event(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }

    /// Whether events were dropped since the last call; clears the flag.
    pub fn take_overflow(&mut self) -> bool {
        core::mem::take(&mut self.overflowed)
    }

    /// Whether key `key_number` was down at the last scan.
    pub fn is_held(&self, key_number: usize) -> bool {
        self.held.get(key_number).copied().unwrap_or(false)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<const N: usize, const Q: usize> Default for Keys<N, Q> {
    fn default() -> Self {
        Self::new()
    }
}
