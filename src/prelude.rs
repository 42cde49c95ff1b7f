pub use hal::Qei as _;

pub use crate::mmio::RegisterBus as _;
pub use crate::timer::qei::QeiExt as _;
