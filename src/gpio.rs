//! General Purpose Input / Output
//!
//! STM32F1 ports describe every pin with a 4-bit CNF/MODE nibble, pins 0-7 in CRL and
//! pins 8-15 in CRH. For inputs with pull resistors the matching ODR bit selects
//! pull-up (1) or pull-down (0).
use crate::mmio::{Register, RegisterBus};
use crate::pac;

/// CNF = 0b10 (input with pull-up / pull-down), MODE = 0b00 (input)
const INPUT_PULL: u32 = 0b1000;

/// GPIO port carrying encoder inputs
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
    A,
    B,
}

impl Port {
    /// Start of the port's register block
    pub fn base(self) -> usize {
        match self {
            Port::A => pac::GPIOA::ptr() as usize,
            Port::B => pac::GPIOB::ptr() as usize,
        }
    }
}

/// Port registers used to configure encoder inputs
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortRegister {
    /// Port configuration register low
    Crl,
    /// Port configuration register high
    Crh,
    /// Port output data register
    Odr,
}

impl PortRegister {
    pub const fn offset(self) -> usize {
        match self {
            PortRegister::Crl => 0x00,
            PortRegister::Crh => 0x04,
            PortRegister::Odr => 0x0C,
        }
    }
}

/// Port pin known at compile time
pub trait PinId: crate::Sealed {
    /// Port the pin belongs to
    const PORT: Port;

    /// Pin number within the port
    const N: u8;
}

/// Configuration register holding the CNF/MODE nibble of pin `n`
pub(crate) const fn config_register(port: Port, n: u8) -> Register {
    if n < 8 {
        Register::Gpio(port, PortRegister::Crl)
    } else {
        Register::Gpio(port, PortRegister::Crh)
    }
}

/// Configures pins `first` and `first + 1` of `port` as pulled-up inputs
///
/// Both nibbles live in the same configuration register, so the mode change is one
/// read-modify-write of CRL/CRH, followed by one read-modify-write of ODR.
pub(crate) fn into_pull_up_pair<B: RegisterBus>(bus: &B, port: Port, first: u8) {
    debug_assert!(first % 8 < 7, "pin pair straddles CRL and CRH");

    let offset = 4 * u32::from(first % 8);
    let mode = ((INPUT_PULL << 4) | INPUT_PULL) << offset;
    bus.modify(config_register(port, first), |r| {
        (r & !(0xFF << offset)) | mode
    });
    bus.set_bits(Register::Gpio(port, PortRegister::Odr), 0b11 << first);
}

macro_rules! gpio {
    ($PORT:ident, $gpiox:ident, [
        $($PXi:ident: $i:expr,)+
    ]) => {
        /// GPIO
        pub mod $gpiox {
            use super::{PinId, Port};

            $(
                /// Pin marker
                #[cfg_attr(feature = "defmt", derive(defmt::Format))]
                #[derive(Debug)]
                pub struct $PXi;

                impl crate::Sealed for $PXi {}

                impl PinId for $PXi {
                    const PORT: Port = Port::$PORT;
                    const N: u8 = $i;
                }
            )+
        }
    }
}

gpio!(A, gpioa, [
    PA0: 0,
    PA1: 1,
    PA6: 6,
    PA7: 7,
    PA8: 8,
    PA9: 9,
]);

gpio!(B, gpiob, [
    PB6: 6,
    PB7: 7,
]);

#[cfg(test)]
mod tests {
    use super::gpioa::{PA0, PA8};
    use super::gpiob::PB7;
    use super::*;
    use crate::mock::MockRegisters;

    const CRL_A: Register = Register::Gpio(Port::A, PortRegister::Crl);
    const CRH_A: Register = Register::Gpio(Port::A, PortRegister::Crh);
    const ODR_A: Register = Register::Gpio(Port::A, PortRegister::Odr);
    const CRL_B: Register = Register::Gpio(Port::B, PortRegister::Crl);
    const ODR_B: Register = Register::Gpio(Port::B, PortRegister::Odr);

    #[test]
    fn pins_know_their_port_and_number() {
        assert_eq!(PA8::PORT, Port::A);
        assert_eq!(PA8::N, 8);
        assert_eq!(PA0::N, 0);
        assert_eq!(PB7::PORT, Port::B);
        assert_eq!(PB7::N, 7);
    }

    #[test]
    fn port_bases() {
        assert_eq!(Port::A.base(), 0x4001_0800);
        assert_eq!(Port::B.base(), 0x4001_0C00);
    }

    #[test]
    fn low_pins_use_crl_and_high_pins_crh() {
        assert_eq!(config_register(Port::A, 7), CRL_A);
        assert_eq!(config_register(Port::A, 8), CRH_A);
        assert_eq!(config_register(Port::B, 6), CRL_B);
    }

    #[test]
    fn pull_up_pair_in_crh() {
        let regs = MockRegisters::new();
        regs.preset(CRH_A, 0x4444_4444);
        regs.preset(ODR_A, 0x0000_8001);

        into_pull_up_pair(&regs, Port::A, 8);

        assert_eq!(regs.peek(CRH_A), 0x4444_4488);
        assert_eq!(regs.peek(ODR_A), 0x0000_8301);
        assert_eq!(regs.written_registers(), [CRH_A, ODR_A]);
    }

    #[test]
    fn pull_up_pair_high_nibbles_of_crl() {
        let regs = MockRegisters::new();
        regs.preset(CRL_B, 0x4444_4444);

        into_pull_up_pair(&regs, Port::B, 6);

        assert_eq!(regs.peek(CRL_B), 0x8844_4444);
        assert_eq!(regs.peek(ODR_B), 0x0000_00C0);
        assert_eq!(regs.peek(CRL_A), 0);
    }
}
