//! Paint [`DrawCommand`]s onto any monochrome `embedded-graphics` target.
//!
//! Text uses `FONT_6X10` with a top baseline, so a command's `(x, y)` is
//! the top-left of the glyph cell. Pixels outside the target are clipped
//! by the target itself; over-long lines simply run off the right edge.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::render::DrawCommand;

fn text_style(inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
    let color = if inverted {
        BinaryColor::Off
    } else {
        BinaryColor::On
    };
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

/// Draw one command into `target`.
pub fn draw<D>(target: &mut D, command: &DrawCommand) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match command {
        DrawCommand::Fill { region, on } => {
            let (x, y, width, height) = region.bounds();
            let color = if *on { BinaryColor::On } else { BinaryColor::Off };
            Rectangle::new(Point::new(x, y), Size::new(width, height))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target)
        }
        DrawCommand::Text {
            text,
            x,
            y,
            inverted,
        } => Text::with_baseline(
            text.as_str(),
            Point::new(*x, *y),
            text_style(*inverted),
            Baseline::Top,
        )
        .draw(target)
        .map(|_| ()),
    }
}
