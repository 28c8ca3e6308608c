//! Longan Nano style peripheral bring-up and interrupt dispatch
//! =============================================================================================
//!
//! Board support for a GD32VF103 / STM32F103 class part with:
//! - An RGB LED on three active-low GPIO channels
//! - A push button routed to an EXTI edge detector
//! - A backup-domain RTC clocked from the 32768 Hz LXTAL
//!
//! The boot sequence ([`board::init`]) runs the EXTI, RTC and interrupt controller
//! configurators in a fixed order; the interrupt handlers in [`irq`] are reached through a
//! static [`irq::VectorTable`]. Register access goes through the traits in
//! [`hardware::traits`], so everything here except [`hardware::stm32f1`] runs on the host.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod board;
pub mod eclic;
pub mod error;
pub mod exti;
pub mod hardware;
pub mod irq;
pub mod rtc;
pub mod wait;

pub use board::{BoardConfig, InitError, Peripherals, Step};
pub use error::{Error, WaitCondition};
pub use hardware::rgb_led::{Color, ColorLed, RgbLed};
pub use irq::{Irq, IrqContext, VectorTable};
pub use wait::Timeout;
