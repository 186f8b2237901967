//! Reset button debouncer
//!
//! A level change is accepted only after the raw signal has held the new
//! level for `debounce_ticks` consecutive ticks. Only the pressed edge of
//! the accepted signal produces an event.

use crate::Tick;

/// A clean button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressEvent {
    /// Tick on which the press was accepted
    pub tick: Tick,
}

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Last raw level seen (true = pressed)
    pub raw: bool,
    /// Accepted level
    pub stable: bool,
    /// Tick on which `raw` last changed
    pub last_change_tick: Tick,
}

/// Push-button debouncer
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    state: ButtonState,
    debounce_ticks: u32,
}

impl ButtonDebouncer {
    /// Create a debouncer; `debounce_ticks` is at least 1
    pub fn new(debounce_ticks: u8) -> Self {
        Self {
            state: ButtonState::default(),
            debounce_ticks: debounce_ticks.max(1) as u32,
        }
    }

    /// Feed the raw level for this tick (true = pressed)
    ///
    /// Returns a press event on the tick the pressed level becomes stable.
    pub fn update(&mut self, raw: bool, tick: Tick) -> Option<PressEvent> {
        if raw != self.state.raw {
            self.state.raw = raw;
            self.state.last_change_tick = tick;
        }

        if self.state.raw == self.state.stable {
            return None;
        }

        let held = tick.wrapping_sub(self.state.last_change_tick) + 1;
        if held < self.debounce_ticks {
            return None;
        }

        self.state.stable = self.state.raw;
        if self.state.stable {
            Some(PressEvent { tick })
        } else {
            None
        }
    }

    /// Accepted level
    pub fn is_pressed(&self) -> bool {
        self.state.stable
    }

    /// Snapshot of the debouncer state
    pub fn state(&self) -> ButtonState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed levels starting at tick 1, collect the ticks of press events
    fn press_ticks(debouncer: &mut ButtonDebouncer, levels: &[bool]) -> [Option<Tick>; 4] {
        let mut out = [None; 4];
        let mut n = 0;
        for (i, &level) in levels.iter().enumerate() {
            if let Some(event) = debouncer.update(level, i as Tick + 1) {
                out[n] = Some(event.tick);
                n += 1;
            }
        }
        out
    }

    #[test]
    fn test_held_press_emits_once() {
        let mut debouncer = ButtonDebouncer::new(3);
        let levels = [true, true, true, true, true, false, false, false];
        let presses = press_ticks(&mut debouncer, &levels);
        assert_eq!(presses, [Some(3), None, None, None]);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_short_bounce_ignored() {
        let mut debouncer = ButtonDebouncer::new(3);
        let levels = [true, false, true, true, false, true, false, false];
        let presses = press_ticks(&mut debouncer, &levels);
        assert_eq!(presses, [None; 4]);
    }

    #[test]
    fn test_no_event_on_release() {
        let mut debouncer = ButtonDebouncer::new(2);
        let levels = [true, true, false, false, false];
        let presses = press_ticks(&mut debouncer, &levels);
        assert_eq!(presses, [Some(2), None, None, None]);
    }

    #[test]
    fn test_two_presses() {
        let mut debouncer = ButtonDebouncer::new(2);
        let levels = [true, true, false, false, true, true];
        let presses = press_ticks(&mut debouncer, &levels);
        assert_eq!(presses, [Some(2), Some(6), None, None]);
    }

    #[test]
    fn test_single_tick_debounce() {
        let mut debouncer = ButtonDebouncer::new(1);
        assert_eq!(debouncer.update(true, 5), Some(PressEvent { tick: 5 }));
        assert_eq!(debouncer.update(true, 6), None);
    }

    #[test]
    fn test_state_tracks_last_change() {
        let mut debouncer = ButtonDebouncer::new(3);
        debouncer.update(true, 10);
        debouncer.update(true, 11);
        let state = debouncer.state();
        assert!(state.raw);
        assert!(!state.stable);
        assert_eq!(state.last_change_tick, 10);
    }
}
