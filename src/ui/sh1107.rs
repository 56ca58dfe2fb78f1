//! SH1107 OLED driver
//!
//! Driver for the 128x64 SH1107 panel on the Pico OLED hat, over any
//! `display-interface` (4-wire SPI on the board). The SH1107 has no
//! column/page window commands, so the frame buffer is pushed one page at
//! a time in page addressing mode.
//!
//! Frame buffer layout: 8 pages of 128 columns, one byte per column with
//! bit 0 at the top row of the page.

use core::convert::Infallible;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{DISPLAY_CONTRAST, DISPLAY_HEIGHT, DISPLAY_WIDTH};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const PAGES: usize = DISPLAY_HEIGHT as usize / 8;

/// SH1107 commands
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const PAGE_ADDRESSING: u8 = 0x20;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_SEG_REMAP: u8 = 0xA0;
    pub const ENTIRE_DISPLAY_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DC_DC: u8 = 0xAD;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    /// Two-byte command; the second byte is the start line.
    pub const SET_START_LINE: u8 = 0xDC;
}

pub struct Sh1107<DI> {
    interface: DI,
    buffer: [[u8; WIDTH]; PAGES],
}

impl<DI> Sh1107<DI>
where
    DI: WriteOnlyDataCommand,
{
    pub fn new(interface: DI) -> Self {
        Self {
            interface,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Send the power-up sequence and switch the panel on.
    ///
    /// The panel's 64 COM lines sit at offset 0x60 of the controller's 128.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.command(&[
            cmd::DISPLAY_OFF,
            cmd::SET_LOW_COLUMN,
            cmd::SET_HIGH_COLUMN,
            cmd::SET_PAGE_ADDR,
            cmd::SET_START_LINE,
            0x00,
            cmd::SET_CONTRAST,
            DISPLAY_CONTRAST,
            cmd::PAGE_ADDRESSING,
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_INC,
            cmd::ENTIRE_DISPLAY_RAM,
            cmd::SET_NORMAL,
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x60,
            cmd::SET_CLOCK_DIV,
            0x41,
            cmd::SET_PRECHARGE,
            0x22,
            cmd::SET_VCOM_DETECT,
            0x35,
            cmd::SET_DC_DC,
            0x8A, // internal DC-DC on
            cmd::DISPLAY_ON,
        ])
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(bytes))
    }

    pub fn clear(&mut self) {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
    }

    /// Push the whole frame buffer, page by page.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        for page in 0..PAGES {
            self.command(&[
                cmd::SET_PAGE_ADDR | page as u8,
                cmd::SET_LOW_COLUMN,
                cmd::SET_HIGH_COLUMN,
            ])?;
            self.interface
                .send_data(DataFormat::U8(&self.buffer[page]))?;
        }
        Ok(())
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.command(&[if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }])
    }

    pub fn interface(&self) -> &DI {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut DI {
        &mut self.interface
    }

    /// Frame buffer byte for column `x` of `page`.
    pub fn page_byte(&self, page: usize, x: usize) -> u8 {
        self.buffer[page][x]
    }

    fn set_pixel(&mut self, point: Point, on: bool) {
        let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
            return;
        };
        if x >= WIDTH || y >= PAGES * 8 {
            return;
        }
        let mask = 1 << (y % 8);
        let byte = &mut self.buffer[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}

/// Hardware reset pulse; call before [`Sh1107::init`].
#[cfg(feature = "embedded")]
pub fn reset<RST, DELAY>(rst: &mut RST, delay: &mut DELAY) -> Result<(), RST::Error>
where
    RST: embedded_hal::digital::OutputPin,
    DELAY: embedded_hal::delay::DelayNs,
{
    rst.set_low()?;
    delay.delay_ms(1);
    rst.set_high()?;
    delay.delay_ms(10);
    Ok(())
}

impl<DI> OriginDimensions for Sh1107<DI> {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl<DI> DrawTarget for Sh1107<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color.is_on());
        }
        Ok(())
    }
}
