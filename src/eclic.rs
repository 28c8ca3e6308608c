//! Interrupt controller setup.
//!
//! Each line has a 4-bit control field split into a preemption level (high bits) and a
//! priority (low bits) by the priority group. A higher level preempts a lower one; the
//! priority only orders pending requests of the same level.

use heapless::Vec;

use crate::error::Error;
use crate::hardware::traits::IrqController;
use crate::irq::{Irq, VectorTable};

/// Implemented control bits per interrupt line.
pub const CTL_BITS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PriorityGroup {
    Level0Prio4,
    Level1Prio3,
    Level2Prio2,
    Level3Prio1,
    Level4Prio0,
}

impl PriorityGroup {
    pub const fn level_bits(self) -> u8 {
        match self {
            PriorityGroup::Level0Prio4 => 0,
            PriorityGroup::Level1Prio3 => 1,
            PriorityGroup::Level2Prio2 => 2,
            PriorityGroup::Level3Prio1 => 3,
            PriorityGroup::Level4Prio0 => 4,
        }
    }

    pub const fn priority_bits(self) -> u8 {
        CTL_BITS - self.level_bits()
    }

    pub const fn max_level(self) -> u8 {
        (1 << self.level_bits()) - 1
    }

    pub const fn max_priority(self) -> u8 {
        (1 << self.priority_bits()) - 1
    }

    pub const fn check(self, irq: Irq, level: u8, priority: u8) -> Result<(), Error> {
        if level > self.max_level() || priority > self.max_priority() {
            return Err(Error::PriorityOutOfRange {
                irq,
                level,
                priority,
            });
        }
        Ok(())
    }

    /// Pack a checked (level, priority) pair into the 4-bit control field.
    pub const fn encode(self, level: u8, priority: u8) -> u8 {
        (level << self.priority_bits()) | priority
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqLine {
    pub irq: Irq,
    pub level: u8,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EclicConfig {
    pub group: PriorityGroup,
    pub lines: Vec<IrqLine, { Irq::COUNT }>,
}

impl EclicConfig {
    pub fn new(group: PriorityGroup) -> Self {
        Self {
            group,
            lines: Vec::new(),
        }
    }

    /// Adds `irq`, replacing an earlier entry for the same line.
    pub fn line(mut self, irq: Irq, level: u8, priority: u8) -> Self {
        let entry = IrqLine {
            irq,
            level,
            priority,
        };
        match self.lines.iter_mut().find(|l| l.irq == irq) {
            Some(existing) => *existing = entry,
            // Capacity is one slot per `Irq` and entries are unique, so this cannot fail.
            None => {
                let _ = self.lines.push(entry);
            }
        }
        self
    }
}

impl Default for EclicConfig {
    /// Button and RTC on the same level, so neither handler preempts the other. The button
    /// has the higher priority and is taken first when both are pending.
    fn default() -> Self {
        EclicConfig::new(PriorityGroup::Level1Prio3)
            .line(Irq::Exti5To9, 1, 1)
            .line(Irq::Rtc, 1, 0)
    }
}

/// Select the priority group, enable every configured line, then enable interrupts globally.
///
/// The whole configuration is checked before the first register write, so a rejected
/// configuration leaves interrupts disabled.
pub fn configure<C, Ctx>(
    ctl: &mut C,
    config: &EclicConfig,
    vectors: &VectorTable<Ctx>,
) -> Result<(), Error>
where
    C: IrqController,
{
    for line in &config.lines {
        if !vectors.has_handler(line.irq) {
            return Err(Error::MissingHandler(line.irq));
        }
        config.group.check(line.irq, line.level, line.priority)?;
    }

    ctl.set_priority_group(config.group);
    for line in &config.lines {
        ctl.enable_irq(line.irq, line.level, line.priority);
        debug!(
            "{} enabled at level {} priority {}",
            line.irq,
            line.level,
            line.priority
        );
    }

    ctl.enable_global();
    info!("interrupts enabled");
    Ok(())
}
