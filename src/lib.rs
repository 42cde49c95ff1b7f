//! Quadrature encoder interface for STM32F1 series timers
//!
//! Turns a general purpose or advanced timer into a hardware quadrature decoder fed by
//! two pulled-up GPIO inputs, and gives read/write access to its position counter.
//! Clocks and alternate function routing are left to the application.
#![no_std]
#![allow(non_camel_case_types)]

#[cfg(test)]
extern crate std;

pub extern crate cortex_m;
pub extern crate embedded_hal as hal;
pub extern crate stm32f1;

pub use stm32f1::stm32f103 as pac;

#[cfg(feature = "rt")]
pub use crate::pac::interrupt;

#[macro_use]
pub mod debug;

pub mod gpio;
pub mod mmio;
pub mod prelude;
pub mod timer;

#[cfg(test)]
mod mock;

mod sealed {
    pub trait Sealed {}
}
pub(crate) use sealed::Sealed;
