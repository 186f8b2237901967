//! Moving median filter
//!
//! A median rejects single-sample spikes (a stray reflection off an arm or
//! a missed echo that still produced a pulse) without smearing real
//! movement the way an average does.

use heapless::Deque;

use crate::config::MAX_FILTER_WINDOW;

/// Moving median over the last `window` samples
#[derive(Debug, Clone)]
pub struct MedianFilter {
    samples: Deque<u16, MAX_FILTER_WINDOW>,
    window: usize,
}

impl MedianFilter {
    /// Create a filter; `window` is clamped to 1..=MAX_FILTER_WINDOW
    pub fn new(window: usize) -> Self {
        Self {
            samples: Deque::new(),
            window: window.clamp(1, MAX_FILTER_WINDOW),
        }
    }

    /// Configured window length
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True before the first sample
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Push a sample and return the median of the current window
    pub fn push(&mut self, value: u16) -> u16 {
        if self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        // Capacity is MAX_FILTER_WINDOW and window never exceeds it
        let _ = self.samples.push_back(value);
        self.median().unwrap_or(value)
    }

    /// Median of the held samples
    ///
    /// With an even count the two middle values are averaged.
    pub fn median(&self) -> Option<u16> {
        let len = self.samples.len();
        if len == 0 {
            return None;
        }

        let mut sorted = [0u16; MAX_FILTER_WINDOW];
        for (slot, value) in sorted.iter_mut().zip(self.samples.iter()) {
            *slot = *value;
        }
        let sorted = &mut sorted[..len];
        sorted.sort_unstable();

        let mid = len / 2;
        if len % 2 == 1 {
            Some(sorted[mid])
        } else {
            let sum = sorted[mid - 1] as u32 + sorted[mid] as u32;
            Some((sum / 2) as u16)
        }
    }
}
