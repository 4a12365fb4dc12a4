use cntr_core::bus::{BurstMode, Bus, BusError};
use cntr_firmware_emulator::CounterEmulator;

use derive_more::{Deref, DerefMut};

/// Addressing parameters of an [`Emulated`] bus.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EmulatedOption {
    /// Base address the counter module is mapped at.
    pub base_address: u32,
    /// Burst size limit the transport advertises.
    pub max_burst_size: usize,
}

impl Default for EmulatedOption {
    fn default() -> Self {
        Self {
            base_address: 0x8000_6500,
            max_burst_size: 8191,
        }
    }
}

/// A [`Bus`] backed by a [`CounterEmulator`] instead of hardware.
///
/// Absolute addresses are translated through the configured base address;
/// `BurstMode::Increment` advances one 32-bit register per beat.
#[derive(Deref, DerefMut)]
pub struct Emulated {
    option: EmulatedOption,
    #[deref]
    #[deref_mut]
    fpga: CounterEmulator,
}

impl Emulated {
    pub fn new(fpga: CounterEmulator) -> Self {
        Self::with_option(fpga, EmulatedOption::default())
    }

    pub const fn with_option(fpga: CounterEmulator, option: EmulatedOption) -> Self {
        Self { option, fpga }
    }

    fn offset(&self, addr: u32) -> Result<u32, BusError> {
        addr.checked_sub(self.option.base_address)
            .ok_or_else(|| BusError::new(format!("address {addr:#010X} is below the module base")))
    }

    fn check_burst(&self, len: usize) -> Result<(), BusError> {
        if len > self.option.max_burst_size {
            return Err(BusError::new(format!(
                "burst of {len} words exceeds the transport limit of {}",
                self.option.max_burst_size
            )));
        }
        Ok(())
    }

    const fn stride(mode: BurstMode) -> u32 {
        match mode {
            BurstMode::Fixed => 0,
            BurstMode::Increment => 4,
        }
    }
}

impl Bus for Emulated {
    fn read(&mut self, addr: u32) -> Result<u32, BusError> {
        let offset = self.offset(addr)?;
        self.fpga
            .read(offset)
            .ok_or_else(|| BusError::new(format!("read from unmapped register {offset:#04X}")))
    }

    fn write(&mut self, addr: u32, data: u32) -> Result<(), BusError> {
        let offset = self.offset(addr)?;
        self.fpga
            .write(offset, data)
            .ok_or_else(|| BusError::new(format!("write to unmapped register {offset:#04X}")))
    }

    fn burst_read(&mut self, addr: u32, len: usize, mode: BurstMode) -> Result<Vec<u32>, BusError> {
        self.check_burst(len)?;
        (0..len as u32)
            .map(|i| self.read(addr + i * Self::stride(mode)))
            .collect()
    }

    fn burst_write(&mut self, addr: u32, data: &[u32], mode: BurstMode) -> Result<(), BusError> {
        self.check_burst(data.len())?;
        data.iter()
            .enumerate()
            .try_for_each(|(i, &word)| self.write(addr + i as u32 * Self::stride(mode), word))
    }

    fn max_burst_size(&self) -> usize {
        self.option.max_burst_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cntr_driver::firmware::registers;
    use cntr_firmware_emulator::FirmwareParams;

    fn bus() -> Emulated {
        Emulated::new(CounterEmulator::new(FirmwareParams::default()))
    }

    #[test]
    fn translates_through_base_address() {
        let mut bus = bus();
        assert_eq!(
            Ok(registers::MODULE_TAG),
            bus.read(0x8000_6500 + registers::MODULE)
        );
    }

    #[test]
    fn rejects_addresses_below_base() {
        let mut bus = bus();
        assert!(bus.read(0x100).is_err());
    }

    #[test]
    fn rejects_oversized_bursts() {
        let mut bus = Emulated::with_option(
            CounterEmulator::new(FirmwareParams::default()),
            EmulatedOption {
                max_burst_size: 4,
                ..Default::default()
            },
        );
        assert!(bus
            .burst_read(0x8000_6500 + registers::READ_DATA, 5, BurstMode::Fixed)
            .is_err());
        assert_eq!(4, bus.max_burst_size());
    }

    #[test]
    fn fixed_burst_streams_one_register() {
        let mut bus = bus();
        bus.feed_count(1);
        bus.feed_count(2);
        assert_eq!(
            Ok(vec![0x8000_0001, 0x8000_0002, 0, 0]),
            bus.burst_read(0x8000_6500 + registers::READ_DATA, 4, BurstMode::Fixed)
        );
    }

    #[test]
    fn incrementing_burst_walks_the_register_file() {
        let mut bus = bus();
        let params = FirmwareParams::default();
        assert_eq!(
            Ok(vec![
                registers::MODULE_TAG,
                params.fifo_depth,
                params.number_of_channels,
                params.lut_depth,
            ]),
            bus.burst_read(0x8000_6500, 4, BurstMode::Increment)
        );
    }
}
