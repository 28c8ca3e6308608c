//! Recording register mocks shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use longan_irq::eclic::PriorityGroup;
use longan_irq::exti::{ExtiLine, ExtiMode, InputMode, Pin, Port, Speed, Trigger};
use longan_irq::hardware::gpio_led::GpioLed;
use longan_irq::hardware::traits::{ExtiRegs, IrqController, RtcRegs};
use longan_irq::rtc::RtcEvent;
use longan_irq::{Color, ColorLed, Error, Irq, IrqContext, RgbLed, VectorTable, irq};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PortClock(Port),
    ConfigureInput(Pin, InputMode, Speed),
    AfioClock,
    SelectSource(Pin),
    ConfigureLine(ExtiLine, ExtiMode, Trigger),
    ClearPending(ExtiLine),

    BackupClocks,
    UnlockBackup,
    ResetBackup,
    StartLxtal,
    SelectLxtal,
    RtcClock,
    ClearSync,
    Prescaler(u32),
    Alarm(u32),
    RtcInterrupt(RtcEvent),
    ClearFlag(RtcEvent),

    PriorityGroup(PriorityGroup),
    EnableIrq(Irq, u8, u8),
    GlobalEnable,

    LedInit,
    SetColor(Color),
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn position(&self, event: Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| *e == event)
    }

    pub fn count(&self, event: Event) -> usize {
        self.0.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Output pin whose level stays observable after it is moved into a driver.
#[derive(Clone)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
}

impl MockPin {
    /// Starts high, which is "off" for an active-low LED.
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
        }
    }

    pub fn lit(&self) -> bool {
        !self.high.get()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high.set(true);
        Ok(())
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

pub type BoardLed = RgbLed<GpioLed<MockPin>>;

/// RGB LED over mock pins, plus probes on the three channels.
pub struct TestLed {
    pub log: Log,
    pub inner: BoardLed,
    pub red: MockPin,
    pub green: MockPin,
    pub blue: MockPin,
}

impl TestLed {
    pub fn new(log: Log) -> Self {
        let (red, green, blue) = (MockPin::new(), MockPin::new(), MockPin::new());
        let inner = RgbLed::new(
            GpioLed::new(red.clone()),
            GpioLed::new(green.clone()),
            GpioLed::new(blue.clone()),
        );
        Self {
            log,
            inner,
            red,
            green,
            blue,
        }
    }

    pub fn lit(&self) -> (bool, bool, bool) {
        (self.red.lit(), self.green.lit(), self.blue.lit())
    }
}

impl ColorLed for TestLed {
    fn init(&mut self) -> Result<(), Error> {
        self.log.push(Event::LedInit);
        self.inner.init()
    }

    fn set_color(&mut self, color: Color) {
        self.log.push(Event::SetColor(color));
        self.inner.set_color(color);
    }

    fn toggle(&mut self, color: Color) {
        self.inner.toggle(color);
    }

    fn color(&self) -> Color {
        self.inner.color()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    pub mode: Option<ExtiMode>,
    pub trigger: Option<Trigger>,
}

pub struct MockExti {
    pub log: Log,
    pub pending: u32,
    pub lines: [LineState; ExtiLine::COUNT as usize],
    pub sources: [Option<Port>; 16],
    pub inputs: [Option<InputMode>; 16],
    pub afio_clock: bool,
}

impl MockExti {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            pending: 0,
            lines: [LineState::default(); ExtiLine::COUNT as usize],
            sources: [None; 16],
            inputs: [None; 16],
            afio_clock: false,
        }
    }

    /// Latch an edge on `line`, as the edge detector would.
    pub fn raise(&mut self, line: u8) {
        self.pending |= 1 << line;
    }

    pub fn line(&self, line: u8) -> LineState {
        self.lines[line as usize]
    }

    pub fn is_pending_line(&self, line: u8) -> bool {
        self.pending & (1 << line) != 0
    }
}

impl ExtiRegs for MockExti {
    fn enable_port_clock(&mut self, port: Port) {
        self.log.push(Event::PortClock(port));
    }

    fn configure_input(&mut self, pin: Pin, mode: InputMode, speed: Speed) {
        self.log.push(Event::ConfigureInput(pin, mode, speed));
        self.inputs[pin.index() as usize] = Some(mode);
    }

    fn enable_afio_clock(&mut self) {
        self.log.push(Event::AfioClock);
        self.afio_clock = true;
    }

    fn select_source(&mut self, pin: Pin) {
        self.log.push(Event::SelectSource(pin));
        self.sources[pin.index() as usize] = Some(pin.port());
    }

    fn configure_line(&mut self, line: ExtiLine, mode: ExtiMode, trigger: Trigger) {
        self.log.push(Event::ConfigureLine(line, mode, trigger));
        self.lines[line.number() as usize] = LineState {
            mode: Some(mode),
            trigger: Some(trigger),
        };
    }

    fn is_pending(&self, line: ExtiLine) -> bool {
        self.pending & line.mask() != 0
    }

    fn clear_pending(&mut self, line: ExtiLine) {
        self.log.push(Event::ClearPending(line));
        self.pending &= !line.mask();
    }
}

pub struct MockRtc {
    pub log: Log,
    /// Polls before the LXTAL reports stable; `None` means never.
    pub lxtal_ready_after: Option<u32>,
    pub lxtal_polls: Cell<u32>,
    pub lxtal_on: bool,
    pub synced: Cell<bool>,
    /// Polls a write stays in flight.
    pub write_latency: u32,
    pub busy: Cell<u32>,
    /// Writes issued while the previous one was still in flight.
    pub overlapping_writes: u32,
    /// Writes issued without a completed poll since the previous write.
    pub unbarriered_writes: u32,
    pub completed_since_write: Cell<bool>,
    pub flags: u8,
    pub counter: u32,
}

impl MockRtc {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            lxtal_ready_after: Some(3),
            lxtal_polls: Cell::new(0),
            lxtal_on: false,
            synced: Cell::new(true),
            write_latency: 2,
            busy: Cell::new(0),
            overlapping_writes: 0,
            unbarriered_writes: 0,
            completed_since_write: Cell::new(true),
            flags: 0,
            counter: 0,
        }
    }

    fn bit(event: RtcEvent) -> u8 {
        match event {
            RtcEvent::Second => 0b001,
            RtcEvent::Alarm => 0b010,
            RtcEvent::Overflow => 0b100,
        }
    }

    pub fn raise(&mut self, event: RtcEvent) {
        self.flags |= Self::bit(event);
        if event == RtcEvent::Second {
            self.counter += 1;
        }
    }

    pub fn flags_set(&self, event: RtcEvent) -> bool {
        self.flags & Self::bit(event) != 0
    }

    fn begin_write(&mut self) {
        if self.busy.get() > 0 {
            self.overlapping_writes += 1;
        }
        if !self.completed_since_write.get() {
            self.unbarriered_writes += 1;
        }
        self.busy.set(self.write_latency);
        self.completed_since_write.set(false);
    }
}

impl RtcRegs for MockRtc {
    fn enable_backup_clocks(&mut self) {
        self.log.push(Event::BackupClocks);
    }

    fn unlock_backup_domain(&mut self) {
        self.log.push(Event::UnlockBackup);
    }

    fn reset_backup_domain(&mut self) {
        self.log.push(Event::ResetBackup);
    }

    fn start_lxtal(&mut self) {
        self.log.push(Event::StartLxtal);
        self.lxtal_on = true;
    }

    fn lxtal_stable(&self) -> bool {
        let polls = self.lxtal_polls.get() + 1;
        self.lxtal_polls.set(polls);
        match self.lxtal_ready_after {
            Some(after) => self.lxtal_on && polls >= after,
            None => false,
        }
    }

    fn select_lxtal_clock(&mut self) {
        self.log.push(Event::SelectLxtal);
    }

    fn enable_rtc_clock(&mut self) {
        self.log.push(Event::RtcClock);
    }

    fn clear_sync_flag(&mut self) {
        self.log.push(Event::ClearSync);
    }

    fn registers_synced(&self) -> bool {
        self.synced.get()
    }

    fn write_complete(&self) -> bool {
        let busy = self.busy.get();
        if busy > 0 {
            self.busy.set(busy - 1);
            return false;
        }
        self.completed_since_write.set(true);
        true
    }

    fn write_prescaler(&mut self, reload: u32) {
        self.begin_write();
        self.log.push(Event::Prescaler(reload));
    }

    fn write_alarm(&mut self, value: u32) {
        self.begin_write();
        self.log.push(Event::Alarm(value));
    }

    fn enable_interrupt(&mut self, event: RtcEvent) {
        self.begin_write();
        self.log.push(Event::RtcInterrupt(event));
    }

    fn flag(&self, event: RtcEvent) -> bool {
        self.flags & Self::bit(event) != 0
    }

    fn clear_flag(&mut self, event: RtcEvent) {
        self.log.push(Event::ClearFlag(event));
        self.flags &= !Self::bit(event);
    }

    fn counter(&self) -> u32 {
        self.counter
    }
}

pub struct MockIrq {
    pub log: Log,
}

impl IrqController for MockIrq {
    fn set_priority_group(&mut self, group: PriorityGroup) {
        self.log.push(Event::PriorityGroup(group));
    }

    fn enable_irq(&mut self, irq: Irq, level: u8, priority: u8) {
        self.log.push(Event::EnableIrq(irq, level, priority));
    }

    fn enable_global(&mut self) {
        self.log.push(Event::GlobalEnable);
    }
}

pub type Context = IrqContext<MockExti, MockRtc, TestLed>;

pub fn vectors() -> VectorTable<Context> {
    irq::default_table()
}

/// Handler context with its own log and the LED already off.
pub fn context() -> Context {
    let log = Log::default();
    let mut led = TestLed::new(log.clone());
    led.set_color(Color::Black);
    log.clear();
    IrqContext::new(MockExti::new(log.clone()), MockRtc::new(log.clone()), led)
}

pub fn line(n: u8) -> ExtiLine {
    ExtiLine::new(n).expect("valid EXTI line")
}
