//! Register map of the counter module, as byte offsets from the base
//! address of its bus slave interface.

pub const MODULE: u32 = 0x00;
pub const FIFO_DEPTH: u32 = 0x04;
pub const NUM_OF_CHANNELS: u32 = 0x08;
pub const CHANNEL_LUT_DEPTH: u32 = 0x0C;
pub const SET_CHANNELS: u32 = 0x10;
pub const WINDOW_SIZE_LSB: u32 = 0x18;
pub const WINDOW_SIZE_MSB: u32 = 0x1C;
pub const CONFIG: u32 = 0x20;
pub const READ_DATA: u32 = 0x24;
pub const RESET_FPGA_MODULE: u32 = 0x28;
pub const NUM_DESIRED_CHANNEL: u32 = 0x2C;

/// Identity tag of the counter module, ASCII big-endian.
pub const MODULE_TAG: u32 = u32::from_be_bytes(*b"cntr");
