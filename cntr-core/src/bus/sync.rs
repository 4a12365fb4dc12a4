use super::error::BusError;

/// Address progression of a burst transaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BurstMode {
    /// Every beat of the burst targets the same address (FIFO ports).
    #[default]
    Fixed,
    /// The address advances by one bus word per beat (memory ports).
    Increment,
}

/// A trait that provides the register interface with the FPGA fabric.
///
/// All addresses are absolute; module register offsets are added to a
/// caller-supplied base address before they reach the bus.
pub trait Bus: Send {
    /// Reads a single 32-bit word.
    fn read(&mut self, addr: u32) -> Result<u32, BusError>;

    /// Writes a single 32-bit word.
    fn write(&mut self, addr: u32, data: u32) -> Result<(), BusError>;

    /// Reads `len` words in one burst transaction.
    ///
    /// `len` must not exceed [`Bus::max_burst_size`].
    fn burst_read(&mut self, addr: u32, len: usize, mode: BurstMode) -> Result<Vec<u32>, BusError>;

    /// Writes `data` in one burst transaction.
    ///
    /// `data.len()` must not exceed [`Bus::max_burst_size`].
    fn burst_write(&mut self, addr: u32, data: &[u32], mode: BurstMode) -> Result<(), BusError>;

    /// Maximum number of words a single burst transaction can carry.
    #[must_use]
    fn max_burst_size(&self) -> usize;
}

impl Bus for Box<dyn Bus> {
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        self.as_mut().read(addr)
    }

    fn write(&mut self, addr: u32, data: u32) -> Result<(), BusError> {
        self.as_mut().write(addr, data)
    }

    fn burst_read(&mut self, addr: u32, len: usize, mode: BurstMode) -> Result<Vec<u32>, BusError> {
        self.as_mut().burst_read(addr, len, mode)
    }

    fn burst_write(&mut self, addr: u32, data: &[u32], mode: BurstMode) -> Result<(), BusError> {
        self.as_mut().burst_write(addr, data, mode)
    }

    fn max_burst_size(&self) -> usize {
        self.as_ref().max_burst_size()
    }
}
