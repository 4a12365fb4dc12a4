/// Measurement window duration in hardware time-base units.
///
/// The hardware exposes the 64-bit duration as two 32-bit registers; this
/// type is the pure split/join at that boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct WindowSize(u64);

impl WindowSize {
    /// One millisecond at the 3 GHz time base.
    pub const DEFAULT: WindowSize = WindowSize(3_000_000_000);

    /// Creates a window duration of `units` time-base units.
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Splits into the `(lsb, msb)` register pair.
    #[must_use]
    pub const fn split(self) -> (u32, u32) {
        (self.0 as u32, (self.0 >> 32) as u32)
    }

    /// Joins the `(lsb, msb)` register pair back into a duration.
    #[must_use]
    pub const fn from_parts(lsb: u32, msb: u32) -> Self {
        Self(lsb as u64 | ((msb as u64) << 32))
    }

    /// Duration in time-base units.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for WindowSize {
    fn from(units: u64) -> Self {
        Self::new(units)
    }
}
