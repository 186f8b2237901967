//! PWM tone buzzer
//!
//! A passive piezo driven by a PWM channel whose period is already set to
//! the tone frequency. On means 50% duty, off means 0%.

use embedded_hal::pwm::SetDutyCycle;
use repcount_core::traits::BuzzerOutput;

/// Piezo buzzer on a PWM channel
pub struct PwmBuzzer<C> {
    channel: C,
    on: bool,
}

impl<C: SetDutyCycle> PwmBuzzer<C> {
    /// Create a buzzer and make sure it starts silent
    pub fn new(channel: C) -> Self {
        let mut buzzer = Self { channel, on: false };
        buzzer.set_on(false);
        buzzer
    }

    /// Release the PWM channel
    pub fn release(self) -> C {
        self.channel
    }
}

impl<C: SetDutyCycle> BuzzerOutput for PwmBuzzer<C> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        let _ = if on {
            self.channel.set_duty_cycle_fraction(1, 2)
        } else {
            self.channel.set_duty_cycle_fully_off()
        };
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
