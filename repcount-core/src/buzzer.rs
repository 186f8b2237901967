//! Buzzer pulse timer
//!
//! The beep is a countdown in control ticks, so starting one never blocks
//! the loop. Retriggering during a beep restarts the countdown.

/// Fixed-length buzzer pulse
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerPulse {
    pulse_ticks: u32,
    remaining: u32,
}

impl BuzzerPulse {
    /// Create a pulse timer; `pulse_ticks` is at least 1
    pub fn new(pulse_ticks: u32) -> Self {
        Self {
            pulse_ticks: pulse_ticks.max(1),
            remaining: 0,
        }
    }

    /// Start the pulse from the beginning
    pub fn trigger(&mut self) {
        self.remaining = self.pulse_ticks;
    }

    /// Consume one tick; returns whether the buzzer should sound this tick
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Check if a pulse is in progress
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}
