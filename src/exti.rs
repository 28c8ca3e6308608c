//! Edge-detector (EXTI) setup for the boot button.

use crate::error::Error;
use crate::hardware::traits::ExtiRegs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    /// AFIO source-select encoding.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: Port,
    index: u8,
}

impl Pin {
    pub const fn new(port: Port, index: u8) -> Result<Self, Error> {
        if index > 15 {
            return Err(Error::InvalidPin(index));
        }
        Ok(Self { port, index })
    }

    pub const fn port(&self) -> Port {
        self.port
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    /// GPIO pins only ever reach the EXTI line with the same number.
    pub const fn exti_line(&self) -> ExtiLine {
        ExtiLine(self.index)
    }
}

/// One of the 19 EXTI lines. Lines 0..=15 come from GPIO, 16..=18 from internal sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtiLine(u8);

impl ExtiLine {
    pub const COUNT: u8 = 19;

    pub const fn new(line: u8) -> Option<Self> {
        if line < Self::COUNT {
            Some(Self(line))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    Floating,
    PullUp,
    PullDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Mhz2,
    Mhz10,
    Mhz50,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Rising,
    Falling,
    Both,
}

impl Trigger {
    pub const fn rising(self) -> bool {
        matches!(self, Trigger::Rising | Trigger::Both)
    }

    pub const fn falling(self) -> bool {
        matches!(self, Trigger::Falling | Trigger::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtiMode {
    Interrupt,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtiConfig {
    pub pin: Pin,
    pub input: InputMode,
    pub speed: Speed,
    pub mode: ExtiMode,
    pub trigger: Trigger,
}

impl ExtiConfig {
    /// PA8, the Longan Nano BOOT0 button.
    pub const BOOT_BUTTON: Pin = Pin {
        port: Port::A,
        index: 8,
    };

    /// Floating input on `pin`, interrupting on both edges.
    pub const fn button(pin: Pin) -> Self {
        Self {
            pin,
            input: InputMode::Floating,
            speed: Speed::Mhz50,
            mode: ExtiMode::Interrupt,
            trigger: Trigger::Both,
        }
    }

    pub const fn line(&self) -> ExtiLine {
        self.pin.exti_line()
    }
}

impl Default for ExtiConfig {
    fn default() -> Self {
        Self::button(Self::BOOT_BUTTON)
    }
}

/// Configure `config.pin` as an edge-detector input and arm its EXTI line.
///
/// The line's pending flag is cleared last, so an edge latched before or during setup
/// does not fire once the interrupt controller is enabled. Running this twice leaves the
/// same register state.
pub fn configure<E: ExtiRegs>(regs: &mut E, config: &ExtiConfig) -> Result<(), Error> {
    let pin = config.pin;
    let line = config.line();

    regs.enable_port_clock(pin.port());
    regs.configure_input(pin, config.input, config.speed);

    regs.enable_afio_clock();
    regs.select_source(pin);
    regs.configure_line(line, config.mode, config.trigger);

    regs.clear_pending(line);

    debug!(
        "EXTI line {} armed on P{}{} ({})",
        line.number(),
        pin.port(),
        pin.index(),
        config.trigger
    );
    Ok(())
}
