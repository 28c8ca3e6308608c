use core::ops::BitXor;

use super::traits::Led;
use crate::error::Error;

/// Combination of the three LED channels, one bit per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Color {
    Black = 0b000,
    Red = 0b001,
    Green = 0b010,
    Yellow = 0b011,
    Blue = 0b100,
    Magenta = 0b101,
    Cyan = 0b110,
    White = 0b111,
}

impl Color {
    const RED_BIT: u8 = 0b001;
    const GREEN_BIT: u8 = 0b010;
    const BLUE_BIT: u8 = 0b100;

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Only the low three bits are significant.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Color::Black,
            0b001 => Color::Red,
            0b010 => Color::Green,
            0b011 => Color::Yellow,
            0b100 => Color::Blue,
            0b101 => Color::Magenta,
            0b110 => Color::Cyan,
            _ => Color::White,
        }
    }

    pub const fn contains(self, other: Color) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    pub const fn red(self) -> bool {
        self.bits() & Self::RED_BIT != 0
    }

    pub const fn green(self) -> bool {
        self.bits() & Self::GREEN_BIT != 0
    }

    pub const fn blue(self) -> bool {
        self.bits() & Self::BLUE_BIT != 0
    }
}

impl BitXor for Color {
    type Output = Color;

    fn bitxor(self, rhs: Color) -> Color {
        Color::from_bits(self.bits() ^ rhs.bits())
    }
}

/// The board LED as seen by the boot sequence and the interrupt handlers.
pub trait ColorLed {
    fn init(&mut self) -> Result<(), Error>;
    fn set_color(&mut self, color: Color);
    /// Flip every channel present in `color`, leave the others alone.
    fn toggle(&mut self, color: Color);
    fn color(&self) -> Color;
}

/// RGB LED built from three independent channels.
pub struct RgbLed<L> {
    red: L,
    green: L,
    blue: L,
    color: Color,
}

impl<L: Led> RgbLed<L> {
    pub fn new(red: L, green: L, blue: L) -> Self {
        Self {
            red,
            green,
            blue,
            color: Color::Black,
        }
    }

    pub fn release(self) -> (L, L, L) {
        (self.red, self.green, self.blue)
    }

    fn drive(led: &mut L, on: bool) {
        if on {
            led.on();
        } else {
            led.off();
        }
    }
}

impl<L: Led> ColorLed for RgbLed<L> {
    fn init(&mut self) -> Result<(), Error> {
        self.set_color(Color::Black);
        Ok(())
    }

    fn set_color(&mut self, color: Color) {
        Self::drive(&mut self.red, color.red());
        Self::drive(&mut self.green, color.green());
        Self::drive(&mut self.blue, color.blue());
        self.color = color;
    }

    fn toggle(&mut self, color: Color) {
        if color.red() {
            self.red.toggle();
        }
        if color.green() {
            self.green.toggle();
        }
        if color.blue() {
            self.blue.toggle();
        }
        self.color = self.color ^ color;
    }

    fn color(&self) -> Color {
        self.color
    }
}
