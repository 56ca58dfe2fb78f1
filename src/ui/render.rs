//! View → draw command translation.
//!
//! The panel is split into two regions: the status bar strip at the top
//! and the main text area below it. Only dirty regions are repainted;
//! a full-screen clear happens only when both are dirty.
//!
//! ```text
//! y=0   ┌────────────────────────────┐
//!       │ Kraken | Stats             │  status bar (lit, dark text)
//! y=12  ├────────────────────────────┤
//!       │   CPU Stats                │  main text, 10 px per line
//!       │   125.0/125.0 MHz          │
//!       │   27.45/27.45 C            │
//!       │   Board: RP2040            │
//! y=64  └────────────────────────────┘
//! ```

use heapless::{String, Vec};

use super::{truncated, StatusBar, View};
use crate::config::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, LINE_CAPACITY, LINE_HEIGHT, MAIN_TEXT_ORIGIN, MAX_MAIN_LINES,
    STATUS_BAR_HEIGHT, STATUS_LABEL_ORIGIN,
};
use crate::telemetry::uptime_text;

/// Upper bound on commands for one frame: clear, bar fill, label, main lines.
pub const MAX_COMMANDS: usize = 3 + MAX_MAIN_LINES;

pub type Commands = Vec<DrawCommand, MAX_COMMANDS>;

/// Panel areas that are repainted independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    StatusBar,
    Main,
    Full,
}

impl Region {
    /// `(x, y, width, height)` in pixels.
    pub const fn bounds(self) -> (i32, i32, u32, u32) {
        match self {
            Region::StatusBar => (0, 0, DISPLAY_WIDTH, STATUS_BAR_HEIGHT),
            Region::Main => (
                0,
                STATUS_BAR_HEIGHT as i32,
                DISPLAY_WIDTH,
                DISPLAY_HEIGHT - STATUS_BAR_HEIGHT,
            ),
            Region::Full => (0, 0, DISPLAY_WIDTH, DISPLAY_HEIGHT),
        }
    }
}

/// One drawing step against the frame buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    /// Fill a region lit (`on`) or dark.
    Fill { region: Region, on: bool },
    /// Single line of text, top-left at `(x, y)`. `inverted` draws dark
    /// glyphs for use on a lit background.
    Text {
        text: String<LINE_CAPACITY>,
        x: i32,
        y: i32,
        inverted: bool,
    },
}

/// Which regions changed since the last successful paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    pub status_bar: bool,
    pub main: bool,
}

impl Dirty {
    pub const ALL: Self = Self {
        status_bar: true,
        main: true,
    };

    pub const fn any(self) -> bool {
        self.status_bar || self.main
    }
}

/// Produce the commands that repaint the dirty regions of the panel.
pub fn render(view: &View, status_bar: &StatusBar, dirty: Dirty) -> Commands {
    let mut commands = Commands::new();

    if dirty.status_bar && dirty.main {
        push(&mut commands, DrawCommand::Fill {
            region: Region::Full,
            on: false,
        });
        if status_bar.visible {
            push_status_bar(&mut commands, status_bar);
        }
    } else if dirty.status_bar {
        push_status_bar(&mut commands, status_bar);
    } else if dirty.main {
        push(&mut commands, DrawCommand::Fill {
            region: Region::Main,
            on: false,
        });
    }

    if dirty.main {
        push_main_text(&mut commands, view);
    }

    commands
}

fn push(commands: &mut Commands, command: DrawCommand) {
    // Capacity covers the worst case; extra commands would only be clipped text.
    let _ = commands.push(command);
}

fn push_status_bar(commands: &mut Commands, status_bar: &StatusBar) {
    push(commands, DrawCommand::Fill {
        region: Region::StatusBar,
        on: status_bar.visible,
    });
    if status_bar.visible {
        let (x, y) = STATUS_LABEL_ORIGIN;
        push(commands, DrawCommand::Text {
            text: status_bar.label.clone(),
            x,
            y,
            inverted: true,
        });
    }
}

fn push_main_text(commands: &mut Commands, view: &View) {
    let (x, mut y) = MAIN_TEXT_ORIGIN;
    let mut lines = 0;
    let mut emit = |commands: &mut Commands, line: &str| {
        if lines >= MAX_MAIN_LINES {
            return;
        }
        push(commands, DrawCommand::Text {
            text: truncated(line),
            x,
            y,
            inverted: false,
        });
        y += LINE_HEIGHT;
        lines += 1;
    };

    match view {
        View::Stats {
            cpu_text,
            platform_text,
        } => {
            for line in cpu_text.lines().chain(platform_text.lines()) {
                emit(commands, line);
            }
        }
        View::Uptime { elapsed_ms } => {
            emit(commands, "Uptime");
            emit(commands, &uptime_text(*elapsed_ms));
        }
        View::Message { text } => {
            for line in text.lines() {
                emit(commands, line);
            }
        }
    }
}
