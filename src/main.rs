//! kraken-status - status display firmware for RP2040 + 128×64 SH1107 OLED.
//!
//! Single cooperative loop: sleep one poll interval, take at most one key
//! event, hand it to the status machine, then let the machine advance its
//! refresh / toggle / reboot timers.

#![no_std]
#![no_main]

use defmt::{info, warn};
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use {defmt_rtt as _, panic_probe as _};

use kraken_status::board::{Chip, Rp2040Telemetry};
use kraken_status::config::{Timing, DISPLAY_SPI_HZ, POLL_INTERVAL_MS};
use kraken_status::status::{Action, StatusMachine, Tick};
use kraken_status::ui::buttons::KeyPins;
use kraken_status::ui::display::Panel;
use kraken_status::ui::sh1107;
use kraken_status::ui::InputSource;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("kraken-status starting");

    let p = embassy_rp::init(Default::default());

    // Display: SPI1 (CLK=GP10, DIN=GP11), CS=GP9, DC=GP8, RST=GP12
    let mut spi_config = spi::Config::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::High);
    let mut rst = Output::new(p.PIN_12, Level::High);

    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(device) => device,
        Err(never) => match never {},
    };
    if sh1107::reset(&mut rst, &mut Delay).is_err() {
        warn!("Display: reset pulse failed");
    }

    let mut panel = Panel::new(SPIInterface::new(spi_device, dc));
    if let Err(e) = panel.init() {
        warn!("Display: init failed: {}", e);
    }

    // Keys: KEY0=GP15 (reboot), KEY1=GP17 (power), active-low
    let mut keys = KeyPins::new([
        Input::new(p.PIN_15, Pull::Up),
        Input::new(p.PIN_17, Pull::Up),
    ]);

    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let sensor = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let mut telemetry = Rp2040Telemetry::new(adc, sensor);
    let mut chip = Chip;

    let mut status = StatusMachine::new(Timing::DEFAULT, now_ms());
    if let Err(e) = status.show_splash(&mut panel) {
        warn!("Display: splash failed: {}", e);
    }
    info!("Status loop running (poll {} ms)", POLL_INTERVAL_MS);

    loop {
        Timer::after_millis(POLL_INTERVAL_MS).await;

        if let Some(event) = keys.poll_event() {
            let action = status.on_button_event(event, &mut panel);
            log_action(action);
        }

        let tick = status.on_tick(now_ms(), &mut telemetry, &mut panel, &mut chip);
        log_tick(&status, tick);
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

fn log_action(action: Action) {
    match action {
        Action::Ignored | Action::HoldStarted => {}
        Action::Slept => info!("Display: sleep"),
        Action::Woke => info!("Display: wake"),
        Action::PreviewFlip { held_ms } => info!("KEY0 short press ({} ms): flip view", held_ms),
        Action::PowerFailed { error } => warn!("Display: power command failed: {}", error),
        Action::Reboot {
            held_ms,
            paint_error,
        } => {
            info!("KEY0 held {} ms: rebooting", held_ms);
            if let Some(e) = paint_error {
                warn!("Display: reboot message not shown: {}", e);
            }
        }
    }
}

fn log_tick(status: &StatusMachine, tick: Tick) {
    if tick.toggled {
        info!("View -> {}", status.active_kind());
    }
    if let Some(e) = tick.paint_error {
        warn!("Display: repaint skipped: {}", e);
    }
}
