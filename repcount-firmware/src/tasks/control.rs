//! Control task
//!
//! Runs `ControlLoop` on a fixed tick: picks up the latest echo, reads the
//! knob on sampling ticks, polls the reset button, publishes the frame and
//! drives the buzzer.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Input;
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Ticker};

use repcount_core::config::CounterConfig;
use repcount_core::control::{ControlLoop, TickInputs, TickReport};
use repcount_core::traits::BuzzerOutput;
use repcount_drivers::buzzer::PwmBuzzer;

use crate::channels::{publish_frame, RANGE};

/// Interval between diagnostics summaries (ms)
const DIAGNOSTICS_INTERVAL_MS: u32 = 10_000;

/// Hardware owned by the control task
pub struct ControlPeripherals {
    pub adc: Adc<'static, Async>,
    pub pot: Channel<'static>,
    pub button: Input<'static>,
    pub buzzer: Option<PwmBuzzer<PwmOutput<'static>>>,
}

/// Control task
#[embassy_executor::task]
pub async fn control_task(config: &'static CounterConfig, mut hw: ControlPeripherals) {
    info!("Control task started, tick {}ms", config.control.tick_ms);

    let mut control = ControlLoop::new(config);
    publish_frame(&control.frame());

    let sample_interval = config.control.sample_interval_ticks.max(1) as u32;
    let diagnostics_ticks = config.control.ms_to_ticks(DIAGNOSTICS_INTERVAL_MS);
    let mut ticker = Ticker::every(Duration::from_millis(config.control.tick_ms as u64));

    loop {
        let tick = control.ticks();

        let pot_raw = if tick % sample_interval == 0 {
            match hw.adc.read(&mut hw.pot).await {
                Ok(raw) => Some(raw),
                Err(e) => {
                    warn!("Potentiometer read failed: {:?}", e);
                    None
                }
            }
        } else {
            None
        };

        let button_pressed = if config.button.active_low {
            hw.button.is_low()
        } else {
            hw.button.is_high()
        };

        let report = control.tick(TickInputs {
            button_pressed,
            pot_raw,
            echo: RANGE.try_take(),
        });

        publish_frame(&report.frame);
        if let Some(buzzer) = hw.buzzer.as_mut() {
            if report.buzzer_on != buzzer.is_on() {
                buzzer.set_on(report.buzzer_on);
            }
        }
        log_report(config, &report);

        if tick % diagnostics_ticks == diagnostics_ticks - 1 {
            let d = control.diagnostics();
            info!(
                "Diagnostics: count={} samples={} timeouts={} out_of_range={} clamped={} saturated={} resets={}",
                control.count(),
                d.samples,
                d.sensor_timeouts,
                d.out_of_range,
                d.clamped_inputs,
                d.saturated_repetitions,
                d.resets
            );
        }

        ticker.next().await;
    }
}

fn log_report(config: &CounterConfig, report: &TickReport) {
    if let Some(threshold) = report.threshold_changed {
        let unit = config.display.unit;
        info!(
            "Threshold {}mm ({}{})",
            threshold.mm,
            threshold.in_units(unit),
            unit.label()
        );
    }
    if let Some(event) = report.repetition {
        if event.saturated {
            info!("Repetition at display maximum, count stays {}", event.count);
        } else {
            info!("Repetition {}", event.count);
        }
    }
    if report.reset.is_some() {
        info!("Count reset");
    }
}
