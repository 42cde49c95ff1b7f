//! Timers
use crate::mmio::{Register, RegisterBus};
use crate::pac;

pub mod pins;
pub mod qei;

/// Counter enable
pub(crate) const CR1_CEN: u32 = 1 << 0;
/// Direction, set while counting down
pub(crate) const CR1_DIR: u32 = 1 << 4;
/// Slave mode selection
pub(crate) const SMCR_SMS: u32 = 0b111;
/// CC1S and CC2S channel selection fields
pub(crate) const CCMR1_CC12S: u32 = (0b11 << 8) | 0b11;
/// CC1S = 0b01 (IC1 mapped on TI1), CC2S = 0b01 (IC2 mapped on TI2)
pub(crate) const CCMR1_CC12S_TI: u32 = (0b01 << 8) | 0b01;
/// Capture/compare 1 polarity
pub(crate) const CCER_CC1P: u32 = 1 << 1;

/// Timer able to decode a quadrature encoder
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Timer {
    Tim1,
    Tim2,
    Tim3,
    Tim4,
}

impl Timer {
    /// Start of the timer's register block
    pub fn base(self) -> usize {
        match self {
            Timer::Tim1 => pac::TIM1::ptr() as usize,
            Timer::Tim2 => pac::TIM2::ptr() as usize,
            Timer::Tim3 => pac::TIM3::ptr() as usize,
            Timer::Tim4 => pac::TIM4::ptr() as usize,
        }
    }
}

/// Timer registers used in encoder mode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerRegister {
    /// Control register 1
    Cr1,
    /// Slave mode control register
    Smcr,
    /// Capture/compare mode register 1
    Ccmr1,
    /// Capture/compare enable register
    Ccer,
    /// Counter
    Cnt,
}

impl TimerRegister {
    pub const fn offset(self) -> usize {
        match self {
            TimerRegister::Cr1 => 0x00,
            TimerRegister::Smcr => 0x08,
            TimerRegister::Ccmr1 => 0x18,
            TimerRegister::Ccer => 0x20,
            TimerRegister::Cnt => 0x24,
        }
    }
}

/// Timer peripheral
pub trait Instance: crate::Sealed {
    const ID: Timer;

    const CR1: Register = Register::Timer(Self::ID, TimerRegister::Cr1);
    const SMCR: Register = Register::Timer(Self::ID, TimerRegister::Smcr);
    const CCMR1: Register = Register::Timer(Self::ID, TimerRegister::Ccmr1);
    const CCER: Register = Register::Timer(Self::ID, TimerRegister::Ccer);
    const CNT: Register = Register::Timer(Self::ID, TimerRegister::Cnt);
}

pub(super) mod private {
    use super::*;

    pub trait TimerBase {
        /// Pauses timer
        fn pause<B: RegisterBus>(bus: &B);

        /// Resumes timer
        fn resume<B: RegisterBus>(bus: &B);

        /// Whether the counter is enabled
        fn is_running<B: RegisterBus>(bus: &B) -> bool;
    }

    impl<TIM: Instance> TimerBase for TIM {
        fn pause<B: RegisterBus>(bus: &B) {
            bus.clear_bits(TIM::CR1, CR1_CEN);
        }

        fn resume<B: RegisterBus>(bus: &B) {
            bus.set_bits(TIM::CR1, CR1_CEN);
        }

        fn is_running<B: RegisterBus>(bus: &B) -> bool {
            bus.read(TIM::CR1) & CR1_CEN != 0
        }
    }
}

macro_rules! timers {
    ($($TIM:ident: $id:ident,)+) => {
        $(
            impl crate::Sealed for pac::$TIM {}

            impl Instance for pac::$TIM {
                const ID: Timer = Timer::$id;
            }
        )+
    }
}

timers! {
    TIM1: Tim1,
    TIM2: Tim2,
    TIM3: Tim3,
    TIM4: Tim4,
}

#[cfg(test)]
mod tests {
    use super::private::TimerBase;
    use super::*;
    use crate::mock::MockRegisters;
    use crate::pac::{TIM1, TIM2, TIM3, TIM4};

    #[test]
    fn bases_match_the_device_peripherals() {
        assert_eq!(Timer::Tim1.base(), 0x4001_2C00);
        assert_eq!(Timer::Tim2.base(), 0x4000_0000);
        assert_eq!(Timer::Tim3.base(), 0x4000_0400);
        assert_eq!(Timer::Tim4.base(), 0x4000_0800);
    }

    #[test]
    fn register_map() {
        assert_eq!(TIM1::CR1.address(), 0x4001_2C00);
        assert_eq!(TIM1::SMCR.address(), 0x4001_2C08);
        assert_eq!(TIM1::CCMR1.address(), 0x4001_2C18);
        assert_eq!(TIM1::CCER.address(), 0x4001_2C20);
        assert_eq!(TIM1::CNT.address(), 0x4001_2C24);
        assert_eq!(TIM2::CNT.address(), 0x4000_0024);
        assert_eq!(TIM3::CNT.address(), 0x4000_0424);
        assert_eq!(TIM4::CNT.address(), 0x4000_0824);
    }

    #[test]
    fn bit_patterns() {
        assert_eq!(!CCMR1_CC12S, 0xFFFF_FCFC);
        assert_eq!(CCMR1_CC12S_TI, 0x0101);
        assert_eq!(!SMCR_SMS, 0xFFFF_FFF8);
        assert_eq!(!CR1_CEN, 0xFFFF_FFFE);
    }

    #[test]
    fn pause_and_resume_only_touch_cen() {
        let regs = MockRegisters::new();
        regs.preset(TIM1::CR1, 0x0081);

        TIM1::pause(&regs);
        assert_eq!(regs.peek(TIM1::CR1), 0x0080);
        assert!(!TIM1::is_running(&regs));

        TIM1::resume(&regs);
        assert_eq!(regs.peek(TIM1::CR1), 0x0081);
        assert!(TIM1::is_running(&regs));
    }
}
