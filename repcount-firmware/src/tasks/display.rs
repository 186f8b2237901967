//! Display refresh task
//!
//! Lights one digit per dwell period from the latest published frame.
//! Runs on its own ticker so a slow echo never causes flicker.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use repcount_core::display::Multiplexer;
use repcount_drivers::display::SevenSegment;

use crate::channels::current_frame;

/// Concrete display type on the RP2040
pub type Display = SevenSegment<Output<'static>, Output<'static>>;

/// Display refresh task
#[embassy_executor::task]
pub async fn display_task(mut display: Display, dwell_us: u32) {
    info!("Display task started, {}us per digit", dwell_us);

    let mut ticker = Ticker::every(Duration::from_micros(dwell_us as u64));
    let mut mux = Multiplexer::new();

    loop {
        let frame = current_frame();
        mux.refresh(&frame, &mut display);

        ticker.next().await;
    }
}
