//! Simulated register file for host tests
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::vec::Vec;

use crate::mmio::{Register, RegisterBus};
use crate::pac;

/// Device peripheral singletons, for tests that need timer instances
///
/// The drivers under test never touch the peripherals directly, all register traffic
/// goes to a [`MockRegisters`] bus.
pub fn peripherals() -> pac::Peripherals {
    static STEAL: Mutex<()> = Mutex::new(());
    let _guard = STEAL.lock().unwrap_or_else(|e| e.into_inner());
    unsafe { pac::Peripherals::steal() }
}

/// Register file backed by host memory
///
/// Unwritten registers read as zero. Values placed with [`preset`](Self::preset)
/// stand in for hardware and are not recorded; everything written through the bus is
/// appended to the write log.
#[derive(Default)]
pub struct MockRegisters {
    values: RefCell<BTreeMap<Register, u32>>,
    writes: RefCell<Vec<(Register, u32)>>,
    reads: Cell<usize>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a register as the hardware would, bypassing the write log
    pub fn preset(&self, reg: Register, value: u32) {
        self.values.borrow_mut().insert(reg, value);
    }

    /// Current register value, without going through the bus
    pub fn peek(&self, reg: Register) -> u32 {
        self.values.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Writes performed through the bus, oldest first
    pub fn writes(&self) -> Vec<(Register, u32)> {
        self.writes.borrow().clone()
    }

    /// Registers written through the bus, oldest first
    pub fn written_registers(&self) -> Vec<Register> {
        self.writes.borrow().iter().map(|(reg, _)| *reg).collect()
    }

    /// Number of reads performed through the bus
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn clear_log(&self) {
        self.writes.borrow_mut().clear();
        self.reads.set(0);
    }
}

impl RegisterBus for MockRegisters {
    fn read(&self, reg: Register) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.peek(reg)
    }

    fn write(&self, reg: Register, value: u32) {
        self.values.borrow_mut().insert(reg, value);
        self.writes.borrow_mut().push((reg, value));
    }
}
