//! Encoder diagnostics
//!
//! The `debug` feature sends text to the host console over semihosting: call [`init`]
//! once at startup, then use [`print!`] and [`println!`]. The `defmt` feature routes the
//! driver's own events (encoder configured, counter loaded) to `defmt`. With neither
//! feature the driver emits nothing and the macros are not exported.
//!
//! Semihosting halts the core on every call until a debug probe answers. Firmware built
//! with `debug` will hang when no debugger is attached.

#[cfg(feature = "debug")]
use core::cell::RefCell;

#[cfg(feature = "debug")]
use cortex_m::interrupt::Mutex;
#[cfg(feature = "debug")]
use cortex_m_semihosting::hio::HStdout;

/// Host console handle, filled in by [`init`]
#[cfg(feature = "debug")]
pub static STDOUT: Mutex<RefCell<Option<HStdout>>> = Mutex::new(RefCell::new(None));

/// Opens the host console
///
/// Output printed before this call is dropped. A no-op without the `debug` feature.
pub fn init() {
    #[cfg(feature = "debug")]
    {
        use cortex_m::interrupt;
        use cortex_m_semihosting::hio;

        interrupt::free(|cs| {
            // No host attached means no output; the program keeps running.
            *STDOUT.borrow(cs).borrow_mut() = hio::hstdout().ok();
        });
    }
}

/// Formats to the host console
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::cortex_m::interrupt::free(|cs| {
            if let Some(ref mut stdout) =
                *$crate::debug::STDOUT.borrow(cs).borrow_mut()
            {
                use core::fmt::Write;
                // Output is best effort, a failed host write is dropped
                let _ = write!(stdout, $($arg)*);
            }
        })
    }
}

/// Formats a line to the host console
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! println {
    ($fmt:expr) => {
        $crate::print!(concat!($fmt, "\n"));
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::print!(concat!($fmt, "\n"), $($arg)*);
    };
}

/// Traces a driver event
///
/// Format strings must be understood by both `defmt` and `core::fmt`, so stick to
/// plain `{}` placeholders.
macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($fmt $(, $arg)*);
        #[cfg(feature = "debug")]
        $crate::println!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "debug")))]
        {
            $(let _ = &($arg);)*
        }
    }};
}
