//! Ultrasonic ranging task
//!
//! Fires the HC-SR04 at a fixed period and signals each result to the
//! control task. Waiting on an echo only blocks this task, never the
//! display refresh.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Delay, Duration, Instant, Ticker};

use repcount_drivers::sensor::{Hcsr04, MicrosClock};

use crate::channels::RANGE;

/// Microsecond clock backed by the embassy time driver
pub struct InstantClock;

impl MicrosClock for InstantClock {
    fn now_us(&mut self) -> u32 {
        Instant::now().as_micros() as u32
    }
}

/// Concrete sensor type on the RP2040
pub type Sensor = Hcsr04<Output<'static>, Input<'static>, Delay, InstantClock>;

/// Ranging task
#[embassy_executor::task]
pub async fn ranging_task(mut sensor: Sensor, period_ms: u32) {
    info!("Ranging task started, period {}ms", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));

    loop {
        let result = sensor.measure().await;
        if let Err(e) = result {
            debug!("Ranging failed: {:?}", e);
        }
        RANGE.signal(result);

        ticker.next().await;
    }
}
