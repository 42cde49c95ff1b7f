//! Quadrature Encoder Interface
//!
//! Puts a timer into encoder mode so that the counter follows the two phase-shifted
//! signals of a quadrature encoder without CPU involvement.
//!
//! ```no_run
//! use stm32f1_qei::gpio::gpioa::{PA8, PA9};
//! use stm32f1_qei::mmio::Mmio;
//! use stm32f1_qei::pac;
//! use stm32f1_qei::prelude::*;
//!
//! let dp = pac::Peripherals::take().unwrap();
//!
//! // GPIOA and TIM1 clocks must already be enabled
//! let bus = unsafe { Mmio::steal() };
//! let mut encoder = dp.TIM1.qei((PA8, PA9), bus, false);
//!
//! let position = encoder.position();
//! encoder.load_counter(0);
//! ```
use crate::hal::{self, Direction};
use crate::mmio::{Register, RegisterBus};
use crate::timer::pins::QeiPins;
use crate::timer::private::TimerBase;
use crate::timer::*;

/// SMS (slave mode selection) values that turn the timer into an encoder interface
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncoderMode {
    /// Counter counts up/down on TI2FP2 edges depending on TI1FP1 level.
    Mode1 = 0b001,

    /// Counter counts up/down on TI1FP1 edges depending on TI2FP2 level.
    Mode2 = 0b010,

    /// Counter counts up/down on both TI1FP1 and TI2FP2 edges depending on the
    /// level of the other input.
    Mode3 = 0b011,
}

/// Quadrature Encoder Interface (QEI) options
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QeiOptions {
    /// Encoder slave mode
    pub encoder_mode: EncoderMode,

    /// Invert the polarity of channel 1, which reverses the counting direction
    ///
    /// Inversion is only ever applied, never removed: configuring without it leaves
    /// a polarity set earlier in place.
    pub invert_direction: bool,
}

impl Default for QeiOptions {
    fn default() -> Self {
        Self {
            encoder_mode: EncoderMode::Mode3,
            invert_direction: false,
        }
    }
}

/// Timer in encoder mode
///
/// | TIMx | CH1 | CH2 |
/// |------|-----|-----|
/// | TIM1 | PA8 | PA9 |
/// | TIM2 | PA0 | PA1 |
/// | TIM3 | PA6 | PA7 |
/// | TIM4 | PB6 | PB7 |
///
/// The GPIO port and timer clocks are not managed here and must be running before
/// [`configure`](Self::configure) is called.
pub struct Qei<TIM, PINS, BUS> {
    tim: TIM,
    pins: PINS,
    bus: BUS,
}

pub trait QeiExt<TIM, PINS>
where
    PINS: QeiPins<TIM>,
{
    /// Creates the encoder interface and configures it right away
    fn qei<BUS: RegisterBus>(
        self,
        pins: PINS,
        bus: BUS,
        invert_direction: bool,
    ) -> Qei<TIM, PINS, BUS>;
}

impl<TIM, PINS, BUS> Qei<TIM, PINS, BUS>
where
    TIM: Instance,
    PINS: QeiPins<TIM>,
    BUS: RegisterBus,
{
    /// Wraps the timer without touching any register
    pub fn new(tim: TIM, pins: PINS, bus: BUS) -> Self {
        Qei { tim, pins, bus }
    }

    /// Configures pins and timer and starts counting from zero
    ///
    /// Equivalent to [`configure_with`](Self::configure_with) using encoder mode 3.
    pub fn configure(&mut self, invert_direction: bool) {
        self.configure_with(QeiOptions {
            invert_direction,
            ..QeiOptions::default()
        });
    }

    /// Configures pins and timer with explicit options and starts counting from zero
    pub fn configure_with(&mut self, options: QeiOptions) {
        self.pins.setup(&self.bus);

        self.bus.modify(TIM::SMCR, |r| {
            (r & !SMCR_SMS) | options.encoder_mode as u32
        });

        // Capture inputs: IC1 on TI1, IC2 on TI2
        self.bus.modify(TIM::CCMR1, |r| {
            (r & !CCMR1_CC12S) | CCMR1_CC12S_TI
        });

        if options.invert_direction {
            self.bus.set_bits(TIM::CCER, CCER_CC1P);
        }

        self.bus.write(TIM::CNT, 0);
        <TIM as TimerBase>::resume(&self.bus);

        trace!(
            "qei: configured at {}, mode {}, inverted {}",
            TIM::ID.base() as u32,
            options.encoder_mode as u32,
            options.invert_direction
        );
    }

    /// Raw value of the counter register
    ///
    /// The hardware counter is 16 bits wide and wraps around; interpreting the
    /// wrap is up to the caller.
    pub fn position(&self) -> u32 {
        self.bus.read(TIM::CNT)
    }

    /// Loads `value` into the counter
    ///
    /// The counter is stopped for the duration of the write so the load does not
    /// race a hardware count. Edges arriving in that window are lost.
    pub fn load_counter(&mut self, value: u32) {
        <TIM as TimerBase>::pause(&self.bus);
        self.bus.write(TIM::CNT, value);
        <TIM as TimerBase>::resume(&self.bus);

        trace!("qei: counter loaded with {}", value);
    }

    /// Current counting direction
    pub fn direction(&self) -> Direction {
        if self.bus.read(TIM::CR1) & CR1_DIR == 0 {
            Direction::Upcounting
        } else {
            Direction::Downcounting
        }
    }

    /// Whether the counter is enabled
    pub fn is_running(&self) -> bool {
        <TIM as TimerBase>::is_running(&self.bus)
    }

    /// The counter register read by [`position`](Self::position)
    pub fn counter_register(&self) -> Register {
        TIM::CNT
    }

    /// Releases the timer, the pins and the bus
    ///
    /// Registers are left as they are, so the hardware keeps counting.
    pub fn release(self) -> (TIM, PINS, BUS) {
        (self.tim, self.pins, self.bus)
    }
}

impl<TIM, PINS, BUS> hal::Qei for Qei<TIM, PINS, BUS>
where
    TIM: Instance,
    PINS: QeiPins<TIM>,
    BUS: RegisterBus,
{
    type Count = u16;

    fn count(&self) -> u16 {
        self.position() as u16
    }

    fn direction(&self) -> Direction {
        Qei::direction(self)
    }
}

impl<TIM, PINS> QeiExt<TIM, PINS> for TIM
where
    TIM: Instance,
    PINS: QeiPins<TIM>,
{
    fn qei<BUS: RegisterBus>(
        self,
        pins: PINS,
        bus: BUS,
        invert_direction: bool,
    ) -> Qei<TIM, PINS, BUS> {
        let mut qei = Qei::new(self, pins, bus);
        qei.configure(invert_direction);
        qei
    }
}
