//! Configuration type definitions
//!
//! Every tunable of the counter lives here. Values are compiled into the
//! firmware image (see `counter.toml`); the end user only ever touches the
//! potentiometer and the reset button.

/// Smallest hysteresis margin that still rejects HC-SR04 jitter (mm)
pub const MIN_HYSTERESIS_MM: u16 = 5;

/// Largest supported median filter window
pub const MAX_FILTER_WINDOW: usize = 5;

/// Control loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopConfig {
    /// Control tick period in milliseconds
    pub tick_ms: u16,
    /// Ranging period expressed in control ticks
    pub sample_interval_ticks: u8,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            sample_interval_ticks: 4, // 25 Hz
        }
    }
}

impl LoopConfig {
    /// Ranging period in milliseconds
    pub fn sample_period_ms(&self) -> u32 {
        self.tick_ms as u32 * self.sample_interval_ticks as u32
    }

    /// Convert a duration in milliseconds to whole control ticks (at least 1)
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        let tick = self.tick_ms.max(1) as u32;
        ms.div_ceil(tick).max(1)
    }
}

/// Ultrasonic ranging sensor limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Closest distance the sensor resolves (mm)
    pub min_mm: u16,
    /// Farthest distance the sensor resolves (mm)
    pub max_mm: u16,
    /// How long to wait for each echo edge (µs)
    pub echo_timeout_us: u32,
    /// Median filter window (samples)
    pub filter_window: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            min_mm: 20,
            max_mm: 4000,
            echo_timeout_us: 25_000, // ~4.3 m round trip
            filter_window: 3,
        }
    }
}

/// Potentiometer to threshold mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThresholdConfig {
    /// Threshold at the knob's low end (mm)
    pub min_mm: u16,
    /// Threshold at the knob's high end (mm)
    pub max_mm: u16,
    /// Minimum change before a new threshold is applied (mm)
    pub deadband_mm: u16,
    /// ADC full-scale reading
    pub adc_max: u16,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_mm: 50,
            max_mm: 920,
            deadband_mm: 10,
            adc_max: 4095, // RP2040 12-bit ADC
        }
    }
}

/// Repetition detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectorConfig {
    /// Dead zone on each side of the threshold (mm)
    pub hysteresis_mm: u16,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { hysteresis_mm: 30 }
    }
}

/// Reset button settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Ticks the raw level must hold before it is accepted
    pub debounce_ticks: u8,
    /// Button pulls the pin low when pressed
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: 3,
            active_low: true,
        }
    }
}

/// Buzzer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuzzerConfig {
    /// Length of the beep on each repetition (ms)
    pub pulse_ms: u16,
    /// Tone frequency (Hz)
    pub frequency_hz: u32,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            pulse_ms: 100,
            frequency_hz: 4000,
        }
    }
}

/// Unit used for the threshold digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayUnit {
    /// Whole centimeters
    #[default]
    Centimeters,
    /// Inches, rounded to 2.5 cm steps so the digits don't flicker
    Inches,
}

impl DisplayUnit {
    /// Millimeters per displayed unit
    pub fn mm_per_unit(&self) -> u16 {
        match self {
            DisplayUnit::Centimeters => 10,
            DisplayUnit::Inches => 25,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            DisplayUnit::Centimeters => "cm",
            DisplayUnit::Inches => "in",
        }
    }
}

/// 7-segment display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// How long each digit stays lit per multiplex step (µs)
    pub digit_dwell_us: u32,
    /// Unit for the threshold digits
    pub unit: DisplayUnit,
    /// Show a leading zero ("05") instead of blanking it (" 5")
    pub leading_zeros: bool,
    /// Common-anode module (active-low segments, active-high digit select)
    pub common_anode: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            digit_dwell_us: 2000, // 125 Hz full-frame rate
            unit: DisplayUnit::Centimeters,
            leading_zeros: true,
            common_anode: true,
        }
    }
}

impl DisplayConfig {
    /// Full 4-digit frame rate in Hz
    pub fn frame_rate_hz(&self) -> u32 {
        1_000_000 / self.digit_dwell_us.max(1).saturating_mul(4)
    }
}

/// Complete counter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterConfig {
    pub control: LoopConfig,
    pub sensor: SensorConfig,
    pub threshold: ThresholdConfig,
    pub detector: DetectorConfig,
    pub button: ButtonConfig,
    pub buzzer: BuzzerConfig,
    pub display: DisplayConfig,
}

/// Configuration constraint violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period or sample interval is zero
    ZeroTick,
    /// Ranging faster than the sensor can settle (< 20 ms)
    SampleTooFast,
    /// Sensor range is empty
    SensorRange,
    /// Filter window outside 1..=MAX_FILTER_WINDOW
    FilterWindow,
    /// Threshold range empty or outside the sensor range
    ThresholdRange,
    /// ADC full scale is zero
    AdcMax,
    /// Hysteresis below the noise floor or wider than the threshold range
    Hysteresis,
    /// Debounce must be at least one tick
    Debounce,
    /// Buzzer pulse is zero or tone frequency is zero
    Buzzer,
    /// Dwell too long for a flicker-free (>= 60 Hz) frame
    FrameRate,
}

impl CounterConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control.tick_ms == 0 || self.control.sample_interval_ticks == 0 {
            return Err(ConfigError::ZeroTick);
        }
        // HC-SR04 needs ~20 ms for echoes to die down
        if self.control.sample_period_ms() < 20 {
            return Err(ConfigError::SampleTooFast);
        }

        let sensor = &self.sensor;
        if sensor.min_mm >= sensor.max_mm || sensor.echo_timeout_us == 0 {
            return Err(ConfigError::SensorRange);
        }
        if sensor.filter_window == 0 || sensor.filter_window as usize > MAX_FILTER_WINDOW {
            return Err(ConfigError::FilterWindow);
        }

        let threshold = &self.threshold;
        if threshold.min_mm >= threshold.max_mm
            || threshold.min_mm < sensor.min_mm
            || threshold.max_mm > sensor.max_mm
        {
            return Err(ConfigError::ThresholdRange);
        }
        if threshold.adc_max == 0 {
            return Err(ConfigError::AdcMax);
        }

        let margin = self.detector.hysteresis_mm;
        if margin < MIN_HYSTERESIS_MM
            || margin as u32 * 2 >= (threshold.max_mm - threshold.min_mm) as u32
        {
            return Err(ConfigError::Hysteresis);
        }

        if self.button.debounce_ticks == 0 {
            return Err(ConfigError::Debounce);
        }

        if self.buzzer.pulse_ms == 0 || self.buzzer.frequency_hz == 0 {
            return Err(ConfigError::Buzzer);
        }

        if self.display.digit_dwell_us == 0 || self.display.frame_rate_hz() < 60 {
            return Err(ConfigError::FrameRate);
        }

        Ok(())
    }
}
