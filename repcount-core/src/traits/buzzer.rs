//! Buzzer output trait

/// Trait for the repetition buzzer
///
/// Implementations drive a piezo via PWM tone or a plain GPIO.
pub trait BuzzerOutput {
    /// Start or stop the tone
    fn set_on(&mut self, on: bool);

    /// Check if the buzzer is currently sounding
    fn is_on(&self) -> bool;
}
