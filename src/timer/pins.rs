use crate::gpio::gpioa::{PA0, PA1, PA6, PA7, PA8, PA9};
use crate::gpio::gpiob::{PB6, PB7};
use crate::gpio::{self, PinId};
use crate::mmio::RegisterBus;
use crate::pac::{TIM1, TIM2, TIM3, TIM4};

/// Pin pair feeding channel 1 and channel 2 of a timer
pub trait QeiPins<TIM> {
    /// Configures both pins as pulled-up inputs
    fn setup<B: RegisterBus>(&self, bus: &B);
}

macro_rules! qei_pins {
    ($($TIMX:ident: ($CH1:ident, $CH2:ident),)+) => {
        $(
            impl QeiPins<$TIMX> for ($CH1, $CH2) {
                fn setup<B: RegisterBus>(&self, bus: &B) {
                    const _: () = assert!(
                        $CH1::PORT as u8 == $CH2::PORT as u8 && $CH1::N + 1 == $CH2::N
                    );
                    gpio::into_pull_up_pair(bus, $CH1::PORT, $CH1::N);
                }
            }
        )+
    };
}

qei_pins! {
    TIM1: (PA8, PA9),
    TIM2: (PA0, PA1),
    TIM3: (PA6, PA7),
    TIM4: (PB6, PB7),
}
