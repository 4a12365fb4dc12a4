use cntr_core::bus::BusError;
use thiserror::Error;

/// A interface for error handling in cntr-driver.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum CntrDriverError {
    /// The identity register did not read back as the counter tag.
    ///
    /// The bus is wired to something other than a counter module; this is
    /// not recoverable.
    #[error("Connected to a module other than the counter (identity tag {tag:#010X})")]
    ModuleMismatch {
        /// Value read from the identity register.
        tag: u32,
    },

    /// A logical channel key is outside its allowed range.
    ///
    /// Keys must be a dense 0-based enumeration and below the physical
    /// channel count.
    #[error("Channel key {key} is out of range [0, {max})")]
    ChannelKeyOutOfRange {
        /// Offending key.
        key: u32,
        /// Exclusive upper bound the key violated.
        max: u32,
    },

    /// Two assignment values landed on the same LUT slot after masking.
    #[error("Channel slot {slot} is assigned more than once")]
    SlotCollision {
        /// Masked slot index assigned twice.
        slot: usize,
    },

    /// A masked slot index exceeds the LUT depth reported by the hardware.
    #[error("Channel slot {slot} is out of range [0, {lut_depth})")]
    SlotOutOfRange {
        /// Masked slot index.
        slot: usize,
        /// LUT depth reported by the hardware.
        lut_depth: usize,
    },

    /// Error in the bus.
    #[error("{0}")]
    Bus(#[from] BusError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display() {
        let err = CntrDriverError::ModuleMismatch { tag: 0x6873_3332 };
        assert!(err.source().is_none());
        assert_eq!(
            "Connected to a module other than the counter (identity tag 0x68733332)",
            format!("{}", err)
        );

        assert_eq!(
            "Channel key 4 is out of range [0, 3)",
            format!("{}", CntrDriverError::ChannelKeyOutOfRange { key: 4, max: 3 })
        );
        assert_eq!(
            "Channel slot 5 is assigned more than once",
            format!("{}", CntrDriverError::SlotCollision { slot: 5 })
        );
    }
}
