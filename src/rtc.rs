//! Backup-domain RTC bring-up.
//!
//! RTC Interrupts:
//! - `Second`:   generated every time the counter changes (after the prescaler)
//! - `Alarm`:    generated when the counter equals the alarm register
//! - `Overflow`: generated when the 32-bit counter wraps to zero

use crate::error::{Error, WaitCondition};
use crate::hardware::traits::RtcRegs;
use crate::wait::{Timeout, poll_until};

/// LXTAL frequency in Hz.
pub const LXTAL_HZ: u32 = 32_768;

/// Largest divider the 20-bit reload register can express.
pub const MAX_DIVIDER: u32 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcEvent {
    Second,
    Alarm,
    Overflow,
}

impl RtcEvent {
    pub const ALL: [RtcEvent; 3] = [RtcEvent::Second, RtcEvent::Alarm, RtcEvent::Overflow];

    const fn bit(self) -> u8 {
        match self {
            RtcEvent::Second => 0b001,
            RtcEvent::Alarm => 0b010,
            RtcEvent::Overflow => 0b100,
        }
    }
}

/// Set of RTC interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcEvents(u8);

impl RtcEvents {
    pub const NONE: RtcEvents = RtcEvents(0);
    pub const SECOND: RtcEvents = RtcEvents(0b001);
    pub const ALL: RtcEvents = RtcEvents(0b111);

    pub const fn with(self, event: RtcEvent) -> Self {
        RtcEvents(self.0 | event.bit())
    }

    pub const fn without(self, event: RtcEvent) -> Self {
        RtcEvents(self.0 & !event.bit())
    }

    pub const fn contains(self, event: RtcEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = RtcEvent> {
        RtcEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcConfig {
    /// LXTAL cycles per counter tick.
    pub divider: u32,
    pub interrupts: RtcEvents,
    /// Counter value that raises the alarm flag. Enables the `Alarm` interrupt when set.
    pub alarm: Option<u32>,
    /// Crystal start-up budget. The LXTAL can take well over a second to settle.
    pub lxtal_timeout: Timeout,
    /// Budget for register sync and every write-complete barrier.
    pub write_timeout: Timeout,
}

impl RtcConfig {
    /// Counter ticks per second for this divider, rounded down.
    pub const fn tick_hz(&self) -> u32 {
        match self.divider {
            0 => 0,
            divider => LXTAL_HZ / divider,
        }
    }

    /// Value programmed into the reload register.
    pub const fn reload(&self) -> Result<u32, Error> {
        if self.divider == 0 || self.divider > MAX_DIVIDER {
            return Err(Error::InvalidPrescaler(self.divider));
        }
        Ok(self.divider - 1)
    }
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            divider: 8192,
            interrupts: RtcEvents::SECOND,
            alarm: None,
            lxtal_timeout: Timeout::polls(20_000_000),
            write_timeout: Timeout::polls(100_000),
        }
    }
}

/// Holds the "no overlapping RTC writes" rule: every write waits for the previous one to
/// land and for itself to land before returning.
struct Writer<'a, R> {
    regs: &'a mut R,
    timeout: Timeout,
}

impl<R: RtcRegs> Writer<'_, R> {
    fn wait(&self) -> Result<(), Error> {
        poll_until(self.timeout, WaitCondition::WriteComplete, || {
            self.regs.write_complete()
        })?;
        Ok(())
    }

    fn write(&mut self, f: impl FnOnce(&mut R)) -> Result<(), Error> {
        self.wait()?;
        f(&mut *self.regs);
        self.wait()
    }
}

/// Bring up the LXTAL, attach it to the RTC and program the prescaler and interrupts.
///
/// Stops at the first wait that runs out of budget; nothing after it is written.
pub fn configure<R: RtcRegs>(regs: &mut R, config: &RtcConfig) -> Result<(), Error> {
    let reload = config.reload()?;

    regs.enable_backup_clocks();
    regs.unlock_backup_domain();
    regs.reset_backup_domain();

    regs.start_lxtal();
    let polls = poll_until(config.lxtal_timeout, WaitCondition::LxtalStable, || {
        regs.lxtal_stable()
    })?;
    trace!("LXTAL stable after {} polls", polls);

    regs.select_lxtal_clock();
    regs.enable_rtc_clock();

    regs.clear_sync_flag();
    poll_until(config.write_timeout, WaitCondition::RegisterSync, || {
        regs.registers_synced()
    })?;

    let mut writer = Writer {
        regs,
        timeout: config.write_timeout,
    };

    writer.write(|r| r.write_prescaler(reload))?;

    if let Some(alarm) = config.alarm {
        writer.write(|r| r.write_alarm(alarm))?;
    }

    let interrupts = match config.alarm {
        Some(_) => config.interrupts.with(RtcEvent::Alarm),
        None => config.interrupts,
    };
    for event in interrupts.iter() {
        writer.write(|r| r.enable_interrupt(event))?;
    }

    debug!(
        "RTC running from LXTAL, divider {} ({} Hz)",
        config.divider,
        config.tick_hz()
    );
    Ok(())
}
