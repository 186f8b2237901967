//! Inter-task communication
//!
//! The ranging task hands echo results to the control task through a
//! signal; the control task publishes the display frame through a single
//! atomic word that the refresh task reads without locking.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use repcount_core::display::DisplayFrame;
use repcount_core::sensor::EchoResult;

/// Latest ranging result (overwritten if the control task falls behind)
pub static RANGE: Signal<CriticalSectionRawMutex, EchoResult> = Signal::new();

/// Current display frame, packed with `DisplayFrame::to_bits`
static FRAME: AtomicU32 = AtomicU32::new(DisplayFrame::blank_bits());

/// Publish a new frame for the refresh task
pub fn publish_frame(frame: &DisplayFrame) {
    FRAME.store(frame.to_bits(), Ordering::Relaxed);
}

/// Snapshot of the current frame
pub fn current_frame() -> DisplayFrame {
    DisplayFrame::from_bits(FRAME.load(Ordering::Relaxed))
}
