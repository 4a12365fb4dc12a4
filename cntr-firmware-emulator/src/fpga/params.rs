pub const DEFAULT_FIFO_DEPTH: u32 = 8192;
pub const DEFAULT_NUM_OF_CHANNELS: u32 = 20;
pub const DEFAULT_CHANNEL_LUT_DEPTH: u32 = 64;

/// Capability parameters of an emulated counter module, mirroring the
/// read-only capability registers of the hardware.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FirmwareParams {
    pub fifo_depth: u32,
    pub number_of_channels: u32,
    pub lut_depth: u32,
}

impl Default for FirmwareParams {
    fn default() -> Self {
        Self {
            fifo_depth: DEFAULT_FIFO_DEPTH,
            number_of_channels: DEFAULT_NUM_OF_CHANNELS,
            lut_depth: DEFAULT_CHANNEL_LUT_DEPTH,
        }
    }
}
