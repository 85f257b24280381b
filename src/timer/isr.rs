use crate::error::Result;
use crate::frame::Frame;
use crate::pattern::Pattern;
use crate::player::InfoLed;
use crate::render::Output;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::pwm::SetDutyCycle;

/// Shared slot for a player driven from an interrupt.
pub type GlobalInfoLed<P, const N: usize> = Mutex<RefCell<Option<InfoLed<P, N>>>>;

/// Used to initialize the global static `InfoLed` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use infoled::timer::{global_info_led_init, GlobalInfoLed};
/// use some_hal::PwmChannel;
///
/// static INFO_LED: GlobalInfoLed<PwmChannel, 3> = global_info_led_init();
/// ```
pub const fn global_info_led_init<P: SetDutyCycle, const N: usize>() -> GlobalInfoLed<P, N> {
    Mutex::new(RefCell::new(None))
}

/// Builds a player and stores it in the global slot, replacing any previous one.
///
/// # Arguments
/// * The global static `InfoLed`
/// * The PWM channels, one per LED
/// * The pattern and frame to play
/// * The current microsecond counter value; the timeline starts here
///
/// # Errors
/// Anything [`InfoLed::new`] rejects; the slot is left untouched.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_info_led_setup(&INFO_LED, [red, green, blue], Pattern::FastBlink, frame, micros())
///         .unwrap();
/// }
/// ```
pub fn global_info_led_setup<P: SetDutyCycle, const N: usize>(
    global_led: &'static GlobalInfoLed<P, N>,
    channels: [P; N],
    pattern: Pattern,
    frame: Frame,
    now: u32,
) -> Result<()> {
    let led = InfoLed::new(channels, pattern, frame, now)?;
    critical_section::with(|cs| {
        let _ = global_led.borrow(cs).replace(Some(led));
    });
    Ok(())
}

/// Runs the tick at each interrupt.
///
/// Returns `None` until the slot has been set up, or while the player is
/// disabled.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     let _ = global_info_led_tick(&INFO_LED, micros());
/// }
/// ```
pub fn global_info_led_tick<P: SetDutyCycle, const N: usize>(
    global_led: &'static GlobalInfoLed<P, N>,
    now: u32,
) -> Option<Output> {
    critical_section::with(|cs| {
        global_led
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .and_then(|led| led.tick(now))
    })
}

/// Runs `f` against the global player, if it has been set up.
///
/// For main-loop work such as applying a scheduler selection while the
/// interrupt keeps ticking.
pub fn with_global_info_led<P, const N: usize, R>(
    global_led: &'static GlobalInfoLed<P, N>,
    f: impl FnOnce(&mut InfoLed<P, N>) -> R,
) -> Option<R>
where
    P: SetDutyCycle,
{
    critical_section::with(|cs| global_led.borrow(cs).borrow_mut().as_mut().map(f))
}
