//! Repcount - Exercise Repetition Counter Firmware
//!
//! Main firmware binary for RP2040-based repetition counters. An HC-SR04
//! watches the user, a potentiometer sets the threshold, a button resets
//! the count, and a 4-digit 7-segment display shows threshold and count.
//!
//! Pinout:
//! - GPIO2 trigger, GPIO3 echo (HC-SR04)
//! - GPIO4 reset button
//! - GPIO26 / ADC0 threshold potentiometer
//! - GPIO15 piezo buzzer (PWM slice 7, channel B)
//! - GPIO6..GPIO12 segments a..g, GPIO16..GPIO19 digit selects

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use repcount_core::config::CounterConfig;
use repcount_drivers::buzzer::PwmBuzzer;
use repcount_drivers::display::{Polarity, SevenSegment};
use repcount_drivers::sensor::Hcsr04;

use crate::config::load_config;
use crate::tasks::{ControlPeripherals, InstantClock};

/// Embedded configuration (compiled into firmware)
/// Edit counter.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../counter.toml");

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Configuration must live forever for task references
static COUNTER_CONFIG: StaticCell<CounterConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Repcount firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static CounterConfig = COUNTER_CONFIG.init(load_config(EMBEDDED_CONFIG));
    info!(
        "Tick {}ms, ranging every {}ms, hysteresis {}mm, unit {}",
        config.control.tick_ms,
        config.control.sample_period_ms(),
        config.detector.hysteresis_mm,
        config.display.unit.label()
    );

    // Ultrasonic sensor
    let sensor = Hcsr04::new(
        Output::new(p.PIN_2, Level::Low),
        Input::new(p.PIN_3, Pull::None),
        Delay,
        InstantClock,
        config.sensor.echo_timeout_us,
    );

    // Potentiometer on ADC0
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let pot = Channel::new_pin(p.PIN_26, Pull::None);

    // Reset button
    let button_pull = if config.button.active_low {
        Pull::Up
    } else {
        Pull::Down
    };
    let button = Input::new(p.PIN_4, button_pull);

    // Buzzer tone on PWM slice 7 B
    let pwm = Pwm::new_output_b(
        p.PWM_SLICE7,
        p.PIN_15,
        tone_config(config.buzzer.frequency_hz),
    );
    let buzzer = pwm.split().1.map(PwmBuzzer::new);
    if buzzer.is_none() {
        error!("Buzzer PWM channel unavailable, counting silently");
    }

    // 7-segment display
    let segments = [
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
    ];
    let digits = [
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
    ];
    let polarity = Polarity::from_common_anode(config.display.common_anode);
    let display = SevenSegment::new(segments, digits, polarity);

    info!("I/O initialized");

    // Spawn tasks
    spawner
        .spawn(tasks::display_task(display, config.display.digit_dwell_us))
        .unwrap();
    spawner
        .spawn(tasks::ranging_task(sensor, config.control.sample_period_ms()))
        .unwrap();
    spawner
        .spawn(tasks::control_task(
            config,
            ControlPeripherals {
                adc,
                pot,
                button,
                buzzer,
            },
        ))
        .unwrap();

    info!("All tasks spawned, counter running");
}

/// PWM configuration for a square wave at `frequency_hz`
///
/// Starts with zero duty; the buzzer driver sets 50% while sounding.
fn tone_config(frequency_hz: u32) -> PwmConfig {
    let clk = embassy_rp::clocks::clk_sys_freq();
    let frequency_hz = frequency_hz.max(1);

    // Smallest integer divider that keeps TOP within 16 bits
    let divider = clk.div_ceil(frequency_hz.saturating_mul(u16::MAX as u32 + 1)).clamp(1, 255);
    let top = (clk / (divider * frequency_hz)).saturating_sub(1).min(u16::MAX as u32);

    let mut cfg = PwmConfig::default();
    cfg.divider = (divider as u8).into();
    cfg.top = top as u16;
    cfg.compare_b = 0;
    cfg
}
