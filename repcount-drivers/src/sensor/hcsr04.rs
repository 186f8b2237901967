//! HC-SR04 ultrasonic ranging driver
//!
//! One measurement: a 10 µs trigger pulse, then the width of the echo pulse
//! is timed. Both echo edges are awaited with a timeout so a missing or
//! endless echo never stalls the caller.
//!
//! # Usage
//!
//! ```ignore
//! let mut sensor = Hcsr04::new(trigger, echo, Delay, clock, 25_000);
//! match sensor.measure().await {
//!     Ok(echo_us) => { /* hand to DistanceSampler */ }
//!     Err(e) => { /* out of range this cycle */ }
//! }
//! ```

use embassy_futures::select::{select, Either};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use repcount_core::sensor::{EchoResult, RangingError};

/// Trigger pulse width (µs); datasheet minimum is 10
const TRIGGER_PULSE_US: u32 = 10;

/// Settle time with the trigger low before each pulse (µs)
const TRIGGER_SETTLE_US: u32 = 2;

/// Free-running microsecond time source
pub trait MicrosClock {
    /// Current time in microseconds; may wrap
    fn now_us(&mut self) -> u32;
}

/// HC-SR04 driver
pub struct Hcsr04<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u32,
}

impl<T, E, D, C> Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: Wait,
    D: DelayNs,
    C: MicrosClock,
{
    /// Create a driver; `timeout_us` bounds the wait for each echo edge
    pub fn new(trigger: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us,
        }
    }

    /// Run one ranging cycle and return the echo pulse width in µs
    pub async fn measure(&mut self) -> EchoResult {
        self.pulse_trigger().await?;

        match select(self.echo.wait_for_high(), self.delay.delay_us(self.timeout_us)).await {
            Either::First(Ok(())) => {}
            Either::First(Err(_)) => return Err(RangingError::Pin),
            Either::Second(()) => return Err(RangingError::NoEcho),
        }
        let start = self.clock.now_us();

        match select(self.echo.wait_for_low(), self.delay.delay_us(self.timeout_us)).await {
            Either::First(Ok(())) => {}
            Either::First(Err(_)) => return Err(RangingError::Pin),
            Either::Second(()) => return Err(RangingError::Timeout),
        }
        let end = self.clock.now_us();

        Ok(end.wrapping_sub(start))
    }

    async fn pulse_trigger(&mut self) -> Result<(), RangingError> {
        self.trigger.set_low().map_err(|_| RangingError::Pin)?;
        self.delay.delay_us(TRIGGER_SETTLE_US).await;
        self.trigger.set_high().map_err(|_| RangingError::Pin)?;
        self.delay.delay_us(TRIGGER_PULSE_US).await;
        self.trigger.set_low().map_err(|_| RangingError::Pin)
    }

    /// Echo edge timeout (µs)
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    #[derive(Debug)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Records trigger levels
    struct MockTrigger {
        levels: heapless::Vec<bool, 8>,
    }

    impl ErrorType for MockTrigger {
        type Error = Infallible;
    }

    impl OutputPin for MockTrigger {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let _ = self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            let _ = self.levels.push(true);
            Ok(())
        }
    }

    /// How the echo line behaves after a trigger
    #[derive(Clone, Copy)]
    enum Echo {
        Pulse,
        Silent,
        StuckHigh,
        Fault,
    }

    struct MockEcho(Echo);

    impl ErrorType for MockEcho {
        type Error = PinFault;
    }

    impl Wait for MockEcho {
        async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
            match self.0 {
                Echo::Pulse | Echo::StuckHigh => Ok(()),
                Echo::Silent => core::future::pending().await,
                Echo::Fault => Err(PinFault),
            }
        }

        async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
            match self.0 {
                Echo::Pulse => Ok(()),
                Echo::StuckHigh | Echo::Silent => core::future::pending().await,
                Echo::Fault => Err(PinFault),
            }
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
            self.wait_for_high().await
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
            self.wait_for_low().await
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
            self.wait_for_high().await
        }
    }

    /// Delay that completes immediately and sums the requested time
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    /// Clock advancing a fixed step per read
    struct MockClock {
        now: u32,
        step: u32,
    }

    impl MicrosClock for MockClock {
        fn now_us(&mut self) -> u32 {
            let now = self.now;
            self.now = self.now.wrapping_add(self.step);
            now
        }
    }

    fn sensor(
        echo: Echo,
        start_us: u32,
        width_us: u32,
    ) -> Hcsr04<MockTrigger, MockEcho, MockDelay, MockClock> {
        Hcsr04::new(
            MockTrigger {
                levels: heapless::Vec::new(),
            },
            MockEcho(echo),
            MockDelay { total_ns: 0 },
            MockClock {
                now: start_us,
                step: width_us,
            },
            25_000,
        )
    }

    #[test]
    fn test_pulse_width_measured() {
        let mut s = sensor(Echo::Pulse, 1_000, 1_749);
        assert_eq!(block_on(s.measure()), Ok(1_749));
    }

    #[test]
    fn test_trigger_sequence() {
        let mut s = sensor(Echo::Pulse, 0, 100);
        let _ = block_on(s.measure());
        assert_eq!(s.trigger.levels.as_slice(), &[false, true, false]);
        // Settle and pulse only; the echo waits won
        assert_eq!(s.delay.total_ns, 12_000);
    }

    #[test]
    fn test_clock_wrap() {
        let mut s = sensor(Echo::Pulse, u32::MAX - 99, 500);
        assert_eq!(block_on(s.measure()), Ok(500));
    }

    #[test]
    fn test_missing_echo() {
        let mut s = sensor(Echo::Silent, 0, 100);
        assert_eq!(block_on(s.measure()), Err(RangingError::NoEcho));
    }

    #[test]
    fn test_endless_echo_times_out() {
        let mut s = sensor(Echo::StuckHigh, 0, 100);
        assert_eq!(block_on(s.measure()), Err(RangingError::Timeout));
    }

    #[test]
    fn test_pin_fault() {
        let mut s = sensor(Echo::Fault, 0, 100);
        assert_eq!(block_on(s.measure()), Err(RangingError::Pin));
    }
}
