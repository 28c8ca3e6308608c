use crate::eclic::PriorityGroup;
use crate::exti::{ExtiLine, ExtiMode, InputMode, Pin, Port, Speed, Trigger};
use crate::irq::Irq;
use crate::rtc::RtcEvent;

/// One LED channel.
pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
}

/// GPIO, AFIO and EXTI register primitives used by the edge-detector setup and handler.
pub trait ExtiRegs {
    fn enable_port_clock(&mut self, port: Port);
    fn configure_input(&mut self, pin: Pin, mode: InputMode, speed: Speed);
    /// Clock for the AFIO block holding the EXTI source mux.
    fn enable_afio_clock(&mut self);
    /// Route `pin` to the EXTI line with the same index.
    fn select_source(&mut self, pin: Pin);
    fn configure_line(&mut self, line: ExtiLine, mode: ExtiMode, trigger: Trigger);
    fn is_pending(&self, line: ExtiLine) -> bool;
    fn clear_pending(&mut self, line: ExtiLine);
}

/// RCU/PMU/BKP/RTC register primitives.
///
/// Writes to RTC registers go through an asynchronous pipeline; callers must poll
/// [`RtcRegs::write_complete`] before and after each of [`RtcRegs::write_prescaler`],
/// [`RtcRegs::write_alarm`] and [`RtcRegs::enable_interrupt`].
pub trait RtcRegs {
    fn enable_backup_clocks(&mut self);
    fn unlock_backup_domain(&mut self);
    fn reset_backup_domain(&mut self);
    fn start_lxtal(&mut self);
    fn lxtal_stable(&self) -> bool;
    fn select_lxtal_clock(&mut self);
    fn enable_rtc_clock(&mut self);
    fn clear_sync_flag(&mut self);
    fn registers_synced(&self) -> bool;
    fn write_complete(&self) -> bool;
    /// Program the 20-bit reload value. The counter ticks every `reload + 1` LXTAL cycles.
    fn write_prescaler(&mut self, reload: u32);
    fn write_alarm(&mut self, value: u32);
    fn enable_interrupt(&mut self, event: RtcEvent);
    fn flag(&self, event: RtcEvent) -> bool;
    fn clear_flag(&mut self, event: RtcEvent);
    fn counter(&self) -> u32;
}

/// Interrupt controller primitives.
pub trait IrqController {
    fn set_priority_group(&mut self, group: PriorityGroup);
    /// `level` and `priority` are already validated against the current group.
    fn enable_irq(&mut self, irq: Irq, level: u8, priority: u8);
    fn enable_global(&mut self);
}
