//! Prints the position of an encoder wired to PA8 (channel A) and PA9 (channel B)
//! of a Maple Mini whenever it changes.
#![deny(warnings)]
#![no_main]
#![no_std]

extern crate cortex_m_rt as rt;
extern crate panic_semihosting;
#[macro_use]
extern crate stm32f1_qei as hal;

use hal::gpio::gpioa::{PA8, PA9};
use hal::mmio::Mmio;
use hal::pac;
use hal::prelude::*;
use rt::entry;

#[entry]
fn main() -> ! {
    hal::debug::init();

    let dp = pac::Peripherals::take().unwrap();

    // Clocks are the application's business, not the driver's
    dp.RCC
        .apb2enr
        .modify(|_, w| w.iopaen().set_bit().tim1en().set_bit());

    // NOTE(unsafe) this program is the only user of GPIOA and TIM1
    let bus = unsafe { Mmio::steal() };

    let mut encoder = dp.TIM1.qei((PA8, PA9), &bus, false);
    encoder.load_counter(1000);

    let mut last = encoder.position();
    loop {
        let position = encoder.position();
        if position != last {
            println!("{}", position);
            last = position;
        }
    }
}
