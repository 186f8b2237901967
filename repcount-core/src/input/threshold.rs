//! Potentiometer threshold source
//!
//! Maps the knob's ADC reading linearly onto the configured threshold range.
//! A deadband keeps ADC noise on a stationary knob from flickering the
//! displayed value or nudging the detector.

use crate::config::{DisplayUnit, ThresholdConfig};

/// Distance that counts as "near" once crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threshold {
    /// Distance in millimeters
    pub mm: u16,
}

impl Threshold {
    /// Create a threshold from millimeters
    pub const fn from_mm(mm: u16) -> Self {
        Self { mm }
    }

    /// Create a threshold from whole centimeters
    pub const fn from_cm(cm: u16) -> Self {
        Self { mm: cm * 10 }
    }

    /// Value in whole display units (truncated)
    pub fn in_units(&self, unit: DisplayUnit) -> u16 {
        self.mm / unit.mm_per_unit()
    }
}

/// Result of one potentiometer read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdReading {
    /// Threshold in effect after this read
    pub threshold: Threshold,
    /// The applied threshold moved on this read
    pub changed: bool,
    /// Raw reading exceeded the ADC full scale and was clamped
    pub clamped: bool,
}

/// Potentiometer-driven threshold with deadband
#[derive(Debug, Clone)]
pub struct ThresholdSource {
    config: ThresholdConfig,
    current: Option<Threshold>,
}

impl ThresholdSource {
    /// Create a threshold source
    pub fn new(config: ThresholdConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Map a raw ADC reading to millimeters, ignoring the deadband
    ///
    /// Returns the mapped distance and whether the raw value was clamped.
    pub fn map_raw(&self, raw: u16) -> (u16, bool) {
        let adc_max = self.config.adc_max.max(1);
        let clamped = raw > adc_max;
        let raw = raw.min(adc_max) as u32;

        let min = self.config.min_mm as u32;
        let max = self.config.max_mm.max(self.config.min_mm) as u32;
        let mm = min + raw * (max - min) / adc_max as u32;

        (mm.clamp(min, max) as u16, clamped)
    }

    /// Read the knob and apply the deadband
    pub fn update(&mut self, raw: u16) -> ThresholdReading {
        let (mm, clamped) = self.map_raw(raw);

        let apply = match self.current {
            None => true,
            Some(current) if current.mm == mm => false,
            Some(current) => {
                let at_end = mm == self.config.min_mm || mm == self.config.max_mm;
                mm.abs_diff(current.mm) >= self.config.deadband_mm || at_end
            }
        };

        if apply {
            self.current = Some(Threshold::from_mm(mm));
        }

        ThresholdReading {
            threshold: self.current.unwrap_or(Threshold::from_mm(mm)),
            changed: apply,
            clamped,
        }
    }

    /// Read the knob and return the threshold in effect
    pub fn read(&mut self, raw: u16) -> Threshold {
        self.update(raw).threshold
    }

    /// Threshold currently in effect, if the knob has been read
    pub fn current(&self) -> Option<Threshold> {
        self.current
    }
}
