use std::collections::VecDeque;

use cntr_core::stream::RawWord;
use cntr_driver::firmware::{registers, window::WindowSize};

use super::params::FirmwareParams;

/// Software model of the FPGA counter module's register file.
///
/// Behaves like the bus slave of the hardware module: capability registers
/// read back the construction parameters, the LUT memory is accessed
/// through streaming read/write ports with wrapping pointers, and
/// `READ_DATA` pops the FIFO, padding short reads with dummy words.
pub struct CounterEmulator {
    params: FirmwareParams,
    lut: Vec<u32>,
    lut_write_ptr: usize,
    lut_read_ptr: usize,
    window_lsb: u32,
    window_msb: u32,
    desired_channels: u32,
    armed: bool,
    fifo: VecDeque<u32>,
}

impl CounterEmulator {
    #[must_use]
    pub fn new(params: FirmwareParams) -> Self {
        Self {
            params,
            lut: vec![params.number_of_channels; params.lut_depth as usize],
            lut_write_ptr: 0,
            lut_read_ptr: 0,
            window_lsb: 0,
            window_msb: 0,
            desired_channels: 1,
            armed: false,
            fifo: VecDeque::new(),
        }
    }

    /// Handles a single register read; `None` for unmapped offsets.
    pub fn read(&mut self, offset: u32) -> Option<u32> {
        match offset {
            registers::MODULE => Some(registers::MODULE_TAG),
            registers::FIFO_DEPTH => Some(self.params.fifo_depth),
            registers::NUM_OF_CHANNELS => Some(self.params.number_of_channels),
            registers::CHANNEL_LUT_DEPTH => Some(self.params.lut_depth),
            registers::SET_CHANNELS => {
                let value = self.lut[self.lut_read_ptr];
                self.lut_read_ptr = (self.lut_read_ptr + 1) % self.lut.len();
                Some(value)
            }
            registers::WINDOW_SIZE_LSB => Some(self.window_lsb),
            registers::WINDOW_SIZE_MSB => Some(self.window_msb),
            registers::READ_DATA => Some(self.fifo.pop_front().unwrap_or(RawWord::DUMMY.get())),
            _ => None,
        }
    }

    /// Handles a single register write; `None` for unmapped offsets.
    pub fn write(&mut self, offset: u32, data: u32) -> Option<()> {
        match offset {
            registers::SET_CHANNELS => {
                self.lut[self.lut_write_ptr] = data;
                self.lut_write_ptr = (self.lut_write_ptr + 1) % self.lut.len();
            }
            registers::WINDOW_SIZE_LSB => self.window_lsb = data,
            registers::WINDOW_SIZE_MSB => self.window_msb = data,
            registers::CONFIG => self.armed = data & 1 == 1,
            registers::RESET_FPGA_MODULE => {
                if data & 1 == 1 {
                    self.reset();
                }
            }
            registers::NUM_DESIRED_CHANNEL => self.desired_channels = data,
            _ => return None,
        }
        Some(())
    }

    fn reset(&mut self) {
        self.fifo.clear();
        self.armed = false;
        self.lut_read_ptr = 0;
        self.lut_write_ptr = 0;
    }

    /// Queues a valid sample word carrying `count`.
    pub fn feed_count(&mut self, count: u32) {
        self.feed_raw(RawWord::sample(count).get());
    }

    /// Queues a gap marker covering `len` missing scalar samples.
    pub fn feed_gap(&mut self, len: u32) {
        self.feed_raw(RawWord::gap(len).get());
    }

    /// Queues a raw FIFO word.
    ///
    /// Words beyond the FIFO capacity are dropped; the hardware reports
    /// overflow only through the gap markers that follow.
    pub fn feed_raw(&mut self, word: u32) {
        if self.fifo.len() < self.params.fifo_depth as usize {
            self.fifo.push_back(word);
        }
    }

    #[must_use]
    pub const fn params(&self) -> FirmwareParams {
        self.params
    }

    #[must_use]
    pub const fn armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub const fn desired_channels(&self) -> u32 {
        self.desired_channels
    }

    /// Configured window duration, joined from the register pair.
    #[must_use]
    pub const fn window(&self) -> u64 {
        WindowSize::from_parts(self.window_lsb, self.window_msb).units()
    }

    #[must_use]
    pub fn lut(&self) -> &[u32] {
        &self.lut
    }

    #[must_use]
    pub fn fifo_len(&self) -> usize {
        self.fifo.len()
    }
}
