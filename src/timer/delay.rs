use crate::player::InfoLed;
use crate::timer::MicrosClock;
use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided player.
///
/// This is a simple timing loop for use in environments where interrupts are unavailable
/// or undesired. Each iteration reads `clock`, ticks the player, then waits `tick_us`
/// using a delay provider implementing `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `led`: A mutable reference to an `InfoLed` instance.
/// - `clock`: The free-running microsecond counter.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `tick_us`: The delay between each tick call, in microseconds. Keep it at or
///   below [`MAX_TICK_MICROS`](crate::timer::MAX_TICK_MICROS).
///
/// # Example
/// ```rust,ignore
/// use infoled::timer::run_tick_loop;
/// let mut led = InfoLed::with_defaults([pwm0, pwm1, pwm2], micros())?;
/// run_tick_loop(&mut led, &mut micros, &mut delay, 1000);
/// ```
///
/// # Notes
/// - This loop will never return; it is intended for single-purpose polling firmware.
/// - For more efficient or concurrent applications, prefer interrupt-driven tick scheduling.
pub fn run_tick_loop<D, C, P, const N: usize>(
    led: &mut InfoLed<P, N>,
    clock: &mut C,
    delay: &mut D,
    tick_us: u32,
) -> !
where
    D: DelayNs,
    C: MicrosClock,
    P: SetDutyCycle,
{
    loop {
        let _ = led.tick(clock.now_micros());
        delay.delay_us(tick_us);
    }
}

/// Like [`run_tick_loop`], but returns after `count` ticks.
///
/// Useful when the poll loop shares the main loop with other work, e.g. a
/// [`Rotation`](crate::schedule::Rotation) poll between batches.
pub fn run_ticks<D, C, P, const N: usize>(
    led: &mut InfoLed<P, N>,
    clock: &mut C,
    delay: &mut D,
    tick_us: u32,
    count: usize,
) where
    D: DelayNs,
    C: MicrosClock,
    P: SetDutyCycle,
{
    for _ in 0..count {
        let _ = led.tick(clock.now_micros());
        delay.delay_us(tick_us);
    }
}
