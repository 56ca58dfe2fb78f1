//! The OLED panel as a [`Surface`].

use display_interface::WriteOnlyDataCommand;

use super::canvas;
use super::render::DrawCommand;
use super::sh1107::Sh1107;
use super::Surface;
use crate::error::Error;

/// SH1107 driver plus the panel's power state. The state only changes
/// once the controller has accepted the command.
pub struct Panel<DI> {
    display: Sh1107<DI>,
    awake: bool,
}

impl<DI> Panel<DI>
where
    DI: WriteOnlyDataCommand,
{
    pub fn new(interface: DI) -> Self {
        Self {
            display: Sh1107::new(interface),
            awake: false,
        }
    }

    /// Initialise the controller, clear the screen and switch it on.
    pub fn init(&mut self) -> Result<(), Error> {
        self.display.init().map_err(|_| Error::DisplayWrite)?;
        self.awake = true;
        self.display.clear();
        self.display.flush().map_err(|_| Error::DisplayWrite)
    }

    pub fn driver(&self) -> &Sh1107<DI> {
        &self.display
    }

    pub fn driver_mut(&mut self) -> &mut Sh1107<DI> {
        &mut self.display
    }

    fn set_on(&mut self, on: bool) -> Result<(), Error> {
        if self.awake == on {
            return Ok(());
        }
        self.display
            .set_display_on(on)
            .map_err(|_| Error::DisplayWrite)?;
        self.awake = on;
        Ok(())
    }
}

impl<DI> Surface for Panel<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn paint(&mut self, command: &DrawCommand) -> Result<(), Error> {
        canvas::draw(&mut self.display, command).map_err(|never| match never {})
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.display.flush().map_err(|_| Error::DisplayWrite)
    }

    fn sleep(&mut self) -> Result<(), Error> {
        self.set_on(false)
    }

    fn wake(&mut self) -> Result<(), Error> {
        self.set_on(true)
    }

    fn is_awake(&self) -> bool {
        self.awake
    }
}
