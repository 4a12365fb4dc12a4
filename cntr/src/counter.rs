use std::collections::BTreeMap;

use cntr_core::bus::{BurstMode, Bus};
use cntr_driver::{
    error::CntrDriverError,
    firmware::{
        lut::{ChannelLut, SlotAssignment},
        registers,
        stream::StreamDecoder,
        window::WindowSize,
    },
};
use getset::{CopyGetters, Getters, MutGetters};
use nalgebra::DMatrix;

use crate::error::CntrError;

/// Opening parameters of a [`Counter`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CounterOption {
    /// Width of the rolling matrix in time bins.
    pub capture_size: usize,
    /// Base address the counter module is mapped at.
    pub base_address: u32,
}

impl Default for CounterOption {
    fn default() -> Self {
        Self {
            capture_size: 10_000,
            base_address: 0x8000_6500,
        }
    }
}

/// Host-side handle to one FPGA counter module.
///
/// Owns the module's decoder state; calls must be serialized by the caller,
/// and a measurement must not be reconfigured while a [`Counter::read_data`]
/// is in flight.
#[derive(Getters, CopyGetters, MutGetters)]
pub struct Counter<B: Bus> {
    #[getset(get = "pub", get_mut = "pub")]
    bus: B,
    #[getset(get_copy = "pub")]
    base_address: u32,
    #[getset(get_copy = "pub")]
    capture_size: usize,
    #[getset(get_copy = "pub")]
    fifo_depth: u32,
    #[getset(get_copy = "pub")]
    number_of_channels: u32,
    #[getset(get_copy = "pub")]
    lut_depth: u32,
    #[getset(get_copy = "pub")]
    read_length: usize,
    decoder: StreamDecoder,
}

impl<B: Bus> Counter<B> {
    /// Opens the counter at the default base address.
    pub fn open(bus: B) -> Result<Self, CntrError> {
        Self::open_with(bus, CounterOption::default())
    }

    /// Opens the counter module behind `bus`.
    ///
    /// Verifies the module identity, reads the capability registers and
    /// resets the module. Fails with
    /// [`CntrDriverError::ModuleMismatch`] when the bus is wired to
    /// anything other than a counter module.
    #[tracing::instrument(skip(bus))]
    pub fn open_with(mut bus: B, option: CounterOption) -> Result<Self, CntrError> {
        let base_address = option.base_address;

        let tag = bus.read(base_address + registers::MODULE)?;
        if tag != registers::MODULE_TAG {
            return Err(CntrDriverError::ModuleMismatch { tag }.into());
        }

        let fifo_depth = bus.read(base_address + registers::FIFO_DEPTH)?;
        let number_of_channels = bus.read(base_address + registers::NUM_OF_CHANNELS)?;
        let lut_depth = bus.read(base_address + registers::CHANNEL_LUT_DEPTH)?;

        // One read_data call drains at most read_length words; a FIFO
        // deeper than one burst is drained in whole bursts only.
        let max_burst = bus.max_burst_size();
        let read_length = if fifo_depth as usize <= max_burst {
            fifo_depth as usize
        } else {
            fifo_depth as usize / max_burst * max_burst
        };

        tracing::debug!(
            fifo_depth,
            number_of_channels,
            lut_depth,
            read_length,
            "counter module detected"
        );

        let mut counter = Self {
            bus,
            base_address,
            capture_size: option.capture_size,
            fifo_depth,
            number_of_channels,
            lut_depth,
            read_length,
            decoder: StreamDecoder::new(1, option.capture_size),
        };
        counter.reset()?;
        Ok(counter)
    }

    /// Resets the FPGA module and clears the decoder state.
    ///
    /// This is the only way to drop accumulated matrix history.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), CntrError> {
        self.bus
            .write(self.base_address + registers::RESET_FPGA_MODULE, 1)?;
        self.decoder.reset();
        Ok(())
    }

    /// Routes physical inputs to logical channels.
    ///
    /// The assignment is validated before anything is written, so a
    /// rejected assignment leaves the previous configuration in place. A
    /// valid one resets the module and replaces the decoder, sizing the
    /// matrix to the new channel count.
    #[tracing::instrument(skip(self, assignment))]
    pub fn set_lut_channels(
        &mut self,
        assignment: &BTreeMap<u32, SlotAssignment>,
    ) -> Result<(), CntrError> {
        let lut = ChannelLut::build(assignment, self.number_of_channels, self.lut_depth as usize)?;

        self.reset()?;
        self.decoder = StreamDecoder::new(lut.desired_channels() as usize, self.capture_size);

        self.bus.write(
            self.base_address + registers::NUM_DESIRED_CHANNEL,
            lut.desired_channels(),
        )?;
        self.bus.burst_write(
            self.base_address + registers::SET_CHANNELS,
            &lut,
            BurstMode::Fixed,
        )?;
        Ok(())
    }

    /// Routes logical channel `i` to physical input `i + 1` for every
    /// physical channel.
    pub fn set_default_lut_channels(&mut self) -> Result<(), CntrError> {
        self.set_lut_channels(&ChannelLut::default_assignment(self.number_of_channels))
    }

    /// Reads the routing LUT back from the hardware, grouped by logical
    /// channel.
    pub fn lut_channels(&mut self) -> Result<BTreeMap<u32, Vec<u32>>, CntrError> {
        let flat = self.bus.burst_read(
            self.base_address + registers::SET_CHANNELS,
            self.lut_depth as usize,
            BurstMode::Fixed,
        )?;
        Ok(ChannelLut::decode(&flat, self.number_of_channels))
    }

    /// Sets the measurement window duration.
    pub fn set_window_size(&mut self, window: WindowSize) -> Result<(), CntrError> {
        let (lsb, msb) = window.split();
        self.bus
            .write(self.base_address + registers::WINDOW_SIZE_LSB, lsb)?;
        self.bus
            .write(self.base_address + registers::WINDOW_SIZE_MSB, msb)?;
        Ok(())
    }

    /// Reads the measurement window duration back from the hardware.
    pub fn window_size(&mut self) -> Result<WindowSize, CntrError> {
        let lsb = self.bus.read(self.base_address + registers::WINDOW_SIZE_LSB)?;
        let msb = self.bus.read(self.base_address + registers::WINDOW_SIZE_MSB)?;
        Ok(WindowSize::from_parts(lsb, msb))
    }

    /// Arms the measurement. Decoder state is untouched.
    #[tracing::instrument(skip(self))]
    pub fn start_measurement(&mut self) -> Result<(), CntrError> {
        self.bus.write(self.base_address + registers::CONFIG, 1)?;
        Ok(())
    }

    /// Drains the FIFO once and returns the updated rolling matrix.
    ///
    /// The FIFO is drained in as many sub-bursts as the transport limit
    /// requires; the decoder sees the words as one concatenated sequence,
    /// so the chunking never affects what ends up in the matrix.
    #[tracing::instrument(skip(self))]
    pub fn read_data(&mut self) -> Result<DMatrix<f64>, CntrError> {
        let mut raw = Vec::with_capacity(self.read_length);
        let max_burst = self.bus.max_burst_size();
        let mut remaining = self.read_length;
        while remaining > 0 {
            let chunk = remaining.min(max_burst);
            raw.extend(self.bus.burst_read(
                self.base_address + registers::READ_DATA,
                chunk,
                BurstMode::Fixed,
            )?);
            remaining -= chunk;
        }

        tracing::trace!("drained {} raw words", raw.len());
        Ok(self.decoder.decode(&raw))
    }

    /// Snapshot of the rolling matrix without touching the hardware.
    #[must_use]
    pub fn matrix(&self) -> DMatrix<f64> {
        self.decoder.matrix()
    }

    /// Number of logical channels the current configuration routes.
    #[must_use]
    pub fn desired_channels(&self) -> u32 {
        self.decoder.desired_channels() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Emulated, EmulatedOption};
    use cntr_core::bus::BusError;
    use cntr_firmware_emulator::{CounterEmulator, FirmwareParams};

    struct WrongModule;

    impl Bus for WrongModule {
        fn read(&mut self, _: u32) -> Result<u32, BusError> {
            Ok(u32::from_be_bytes(*b"wfmt"))
        }

        fn write(&mut self, _: u32, _: u32) -> Result<(), BusError> {
            unreachable!()
        }

        fn burst_read(&mut self, _: u32, _: usize, _: BurstMode) -> Result<Vec<u32>, BusError> {
            unreachable!()
        }

        fn burst_write(&mut self, _: u32, _: &[u32], _: BurstMode) -> Result<(), BusError> {
            unreachable!()
        }

        fn max_burst_size(&self) -> usize {
            8191
        }
    }

    #[test]
    fn open_rejects_foreign_modules() {
        assert_eq!(
            Err(CntrError::Driver(CntrDriverError::ModuleMismatch {
                tag: u32::from_be_bytes(*b"wfmt")
            })),
            Counter::open(WrongModule).map(|_| ())
        );
    }

    #[rstest::rstest]
    #[test]
    #[case::fits_one_burst(8, 8, 8191)]
    #[case::whole_bursts_only(8100, 8192, 100)]
    #[case::exact_multiple(8192, 8192, 1024)]
    fn read_length_follows_the_burst_limit(
        #[case] expect: usize,
        #[case] fifo_depth: u32,
        #[case] max_burst_size: usize,
    ) {
        let bus = Emulated::with_option(
            CounterEmulator::new(FirmwareParams {
                fifo_depth,
                ..Default::default()
            }),
            EmulatedOption {
                max_burst_size,
                ..Default::default()
            },
        );
        let counter = Counter::open(bus).unwrap();
        assert_eq!(expect, counter.read_length());
    }

    #[test]
    fn default_option() {
        let option = CounterOption::default();
        assert_eq!(10_000, option.capture_size);
        assert_eq!(0x8000_6500, option.base_address);
    }
}
