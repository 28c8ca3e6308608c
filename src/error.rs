use core::fmt;

use crate::irq::Irq;

/// Hardware condition a configurator polls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitCondition {
    /// LXTAL oscillator stabilization flag.
    LxtalStable,
    /// RTC shadow registers resynchronized with the APB clock.
    RegisterSync,
    /// Last RTC register write finished.
    WriteComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A hardware flag did not set within its poll budget.
    TimedOut(WaitCondition),
    /// Level or priority does not fit the selected priority group.
    PriorityOutOfRange { irq: Irq, level: u8, priority: u8 },
    /// An interrupt line is enabled but the vector table has no handler for it.
    MissingHandler(Irq),
    /// The button's EXTI line raises a vector the controller configuration leaves disabled.
    VectorDisabled(Irq),
    /// Pin index outside 0..=15.
    InvalidPin(u8),
    /// RTC divider outside 1..=2^20.
    InvalidPrescaler(u32),
    /// The LED driver has not been installed.
    LedUnavailable,
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitCondition::LxtalStable => f.write_str("LXTAL stabilization"),
            WaitCondition::RegisterSync => f.write_str("RTC register synchronization"),
            WaitCondition::WriteComplete => f.write_str("RTC write completion"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TimedOut(cond) => write!(f, "timed out waiting for {}", cond),
            Error::PriorityOutOfRange {
                irq,
                level,
                priority,
            } => write!(
                f,
                "level {} / priority {} out of range for {:?}",
                level, priority, irq
            ),
            Error::MissingHandler(irq) => write!(f, "no handler registered for {:?}", irq),
            Error::VectorDisabled(irq) => write!(f, "button vector {:?} is not enabled", irq),
            Error::InvalidPin(index) => write!(f, "pin index {} out of range", index),
            Error::InvalidPrescaler(divider) => {
                write!(f, "RTC divider {} out of range", divider)
            }
            Error::LedUnavailable => f.write_str("LED driver not installed"),
        }
    }
}

impl core::error::Error for Error {}
