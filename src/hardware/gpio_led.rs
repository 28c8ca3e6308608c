use super::traits::Led;
use core::convert::Infallible;
use embedded_hal::digital::StatefulOutputPin;

/// Active-low LED on a GPIO output.
pub struct GpioLed<P> {
    pin: P,
}

impl<P> GpioLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> Led for GpioLed<P>
where
    P: StatefulOutputPin<Error = Infallible>,
{
    fn on(&mut self) {
        let Ok(()) = self.pin.set_low();
    }

    fn off(&mut self) {
        let Ok(()) = self.pin.set_high();
    }

    fn toggle(&mut self) {
        let Ok(()) = self.pin.toggle();
    }
}
