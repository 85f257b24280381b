/// Declares a static global `INFO_LED` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `INFO_LED` suitable for use in
/// interrupt-based environments, where both the main thread and an ISR need
/// to safely access the shared player state.
///
/// # Arguments
/// - `$pwm`: The concrete type of one PWM channel (must implement `SetDutyCycle`)
/// - `$n`: The number of channels
///
/// # Example
/// ```rust,ignore
/// init_info_led!(MyPwmChannel, 3);
/// ```
#[macro_export]
macro_rules! init_info_led {
    ( $pwm:ty, $n:expr ) => {
        pub static INFO_LED: $crate::timer::GlobalInfoLed<$pwm, $n> =
            $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Initializes the global `INFO_LED` singleton with a new player.
///
/// Evaluates to the `Result` of [`InfoLed::new`](crate::player::InfoLed::new).
///
/// # Arguments
/// - `$channels`: The array of PWM channels
/// - `$pattern`: Optional pattern, defaults to `Pattern::Constant`
/// - `$frame`: Optional frame, defaults to the default payload
/// - `$now`: The current microsecond counter value
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_info_led!([red, green, blue], micros()).unwrap();
///     // or
///     setup_info_led!([red], Pattern::Breathing, frame, micros()).unwrap();
/// }
/// ```
///
/// # Notes
/// - Requires `init_info_led!` to have been used earlier.
#[macro_export]
macro_rules! setup_info_led {
    ( $channels:expr, $now:expr ) => {
        $crate::setup_info_led!(
            $channels,
            $crate::pattern::Pattern::Constant,
            $crate::frame::Frame::default(),
            $now
        )
    };
    ( $channels:expr, $pattern:expr, $frame:expr, $now:expr ) => {
        $crate::timer::global_info_led_setup(&INFO_LED, $channels, $pattern, $frame, $now)
    };
}

/// Calls `tick()` on the global `INFO_LED` if it has been initialized.
///
/// Evaluates to the rendered `Option<Output>`.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     let _ = tick_info_led!(micros());
/// }
/// ```
///
/// # Notes
/// - This macro assumes `INFO_LED` was declared with `init_info_led!`
///   and initialized via `setup_info_led!`.
/// - Does nothing until the player has been set up.
#[macro_export]
macro_rules! tick_info_led {
    ( $now:expr ) => {
        $crate::timer::global_info_led_tick(&INFO_LED, $now)
    };
}
