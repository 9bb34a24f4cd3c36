// Taster-Eingang (GPIO9, active-low mit internem Pull-Up)

use esp_core::ButtonInput;
use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};

pub struct ButtonPin<'a> {
    pin: Input<'a>,
}

impl<'a> ButtonPin<'a> {
    pub fn new(pin: impl InputPin + 'a) -> Self {
        let pin = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
        Self { pin }
    }
}

impl ButtonInput for ButtonPin<'_> {
    /// Gedrückt = Pegel LOW
    fn is_active(&mut self) -> bool {
        self.pin.is_low()
    }
}
