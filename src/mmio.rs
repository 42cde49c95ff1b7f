//! Register access
//!
//! Every register the encoder touches is named by a [`Register`] value: a GPIO port or
//! timer paired with one of its registers. Drivers go through a [`RegisterBus`] rather
//! than the peripheral access crate directly; on the device that bus is [`Mmio`], which
//! resolves each [`Register`] to the matching `stm32f1` register block.
#![allow(unused_unsafe)]

use crate::gpio::{Port, PortRegister};
use crate::pac;
use crate::timer::{Timer, TimerRegister};

/// A 32-bit peripheral register
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    Gpio(Port, PortRegister),
    Timer(Timer, TimerRegister),
}

impl Register {
    /// Physical address of the register
    pub fn address(&self) -> usize {
        match *self {
            Register::Gpio(port, reg) => port.base() + reg.offset(),
            Register::Timer(tim, reg) => tim.base() + reg.offset(),
        }
    }
}

/// Word access to peripheral registers
///
/// Reads and writes may have hardware side effects; a bus must perform exactly the
/// accesses it is asked for, in order, without caching.
pub trait RegisterBus {
    /// Reads the current register value
    fn read(&self, reg: Register) -> u32;

    /// Writes `value` to the register
    fn write(&self, reg: Register, value: u32);

    /// Read-modify-write
    #[inline(always)]
    fn modify<F>(&self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let bits = self.read(reg);
        self.write(reg, f(bits));
    }

    /// Sets the bits of `mask`, leaving the others untouched
    #[inline(always)]
    fn set_bits(&self, reg: Register, mask: u32) {
        self.modify(reg, |bits| bits | mask);
    }

    /// Clears the bits of `mask`, leaving the others untouched
    #[inline(always)]
    fn clear_bits(&self, reg: Register, mask: u32) {
        self.modify(reg, |bits| bits & !mask);
    }
}

impl<B> RegisterBus for &B
where
    B: RegisterBus + ?Sized,
{
    #[inline(always)]
    fn read(&self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    #[inline(always)]
    fn write(&self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}

/// Bus to the device's GPIO and timer register blocks
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Returns the device bus
    ///
    /// # Safety
    ///
    /// No other code may drive the GPIO ports or timers reached through this bus
    /// concurrently.
    pub const unsafe fn steal() -> Self {
        Mmio { _private: () }
    }
}

macro_rules! port_access {
    ($gpio:expr, $reg:expr, $($access:tt)+) => {
        match $reg {
            PortRegister::Crl => $gpio.crl.$($access)+,
            PortRegister::Crh => $gpio.crh.$($access)+,
            PortRegister::Odr => $gpio.odr.$($access)+,
        }
    };
}

macro_rules! timer_access {
    ($tim:expr, $reg:expr, $($access:tt)+) => {
        match $reg {
            TimerRegister::Cr1 => $tim.cr1.$($access)+,
            TimerRegister::Smcr => $tim.smcr.$($access)+,
            TimerRegister::Ccmr1 => $tim.ccmr1_input().$($access)+,
            TimerRegister::Ccer => $tim.ccer.$($access)+,
            TimerRegister::Cnt => $tim.cnt.$($access)+,
        }
    };
}

impl RegisterBus for Mmio {
    fn read(&self, reg: Register) -> u32 {
        // NOTE(unsafe) reads through the PAC's register blocks, see `Mmio::steal`
        unsafe {
            match reg {
                Register::Gpio(Port::A, r) => port_access!(*pac::GPIOA::ptr(), r, read().bits()),
                Register::Gpio(Port::B, r) => port_access!(*pac::GPIOB::ptr(), r, read().bits()),
                Register::Timer(Timer::Tim1, r) => {
                    timer_access!(*pac::TIM1::ptr(), r, read().bits())
                }
                Register::Timer(Timer::Tim2, r) => {
                    timer_access!(*pac::TIM2::ptr(), r, read().bits())
                }
                Register::Timer(Timer::Tim3, r) => {
                    timer_access!(*pac::TIM3::ptr(), r, read().bits())
                }
                Register::Timer(Timer::Tim4, r) => {
                    timer_access!(*pac::TIM4::ptr(), r, read().bits())
                }
            }
        }
    }

    fn write(&self, reg: Register, value: u32) {
        // NOTE(unsafe) writes through the PAC's register blocks, see `Mmio::steal`
        unsafe {
            match reg {
                Register::Gpio(Port::A, r) => {
                    port_access!(*pac::GPIOA::ptr(), r, write(|w| w.bits(value)))
                }
                Register::Gpio(Port::B, r) => {
                    port_access!(*pac::GPIOB::ptr(), r, write(|w| w.bits(value)))
                }
                Register::Timer(Timer::Tim1, r) => {
                    timer_access!(*pac::TIM1::ptr(), r, write(|w| w.bits(value)))
                }
                Register::Timer(Timer::Tim2, r) => {
                    timer_access!(*pac::TIM2::ptr(), r, write(|w| w.bits(value)))
                }
                Register::Timer(Timer::Tim3, r) => {
                    timer_access!(*pac::TIM3::ptr(), r, write(|w| w.bits(value)))
                }
                Register::Timer(Timer::Tim4, r) => {
                    timer_access!(*pac::TIM4::ptr(), r, write(|w| w.bits(value)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRegisters;

    const CNT1: Register = Register::Timer(Timer::Tim1, TimerRegister::Cnt);
    const SMCR1: Register = Register::Timer(Timer::Tim1, TimerRegister::Smcr);

    #[test]
    fn addresses_come_from_the_device_memory_map() {
        assert_eq!(CNT1.address(), 0x4001_2C24);
        assert_eq!(SMCR1.address(), 0x4001_2C08);
        assert_eq!(Register::Timer(Timer::Tim4, TimerRegister::Cr1).address(), 0x4000_0800);
        assert_eq!(Register::Gpio(Port::A, PortRegister::Crh).address(), 0x4001_0804);
        assert_eq!(Register::Gpio(Port::B, PortRegister::Odr).address(), 0x4001_0C0C);
    }

    #[test]
    fn modify_helpers_only_touch_masked_bits() {
        let regs = MockRegisters::new();
        regs.preset(SMCR1, 0xF0F0);

        regs.set_bits(SMCR1, 0x000F);
        assert_eq!(regs.peek(SMCR1), 0xF0FF);

        regs.clear_bits(SMCR1, 0xF000);
        assert_eq!(regs.peek(SMCR1), 0x00FF);

        regs.modify(SMCR1, |bits| (bits & !0x7) | 0x3);
        assert_eq!(regs.peek(SMCR1), 0x00FB);
    }

    #[test]
    fn borrowed_bus_forwards_accesses() {
        let regs = MockRegisters::new();
        let bus = &regs;

        bus.write(CNT1, 42);
        assert_eq!(bus.read(CNT1), 42);
        assert_eq!(regs.writes(), [(CNT1, 42)]);
    }
}
