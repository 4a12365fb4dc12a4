pub use crate::{
    counter::{Counter, CounterOption},
    error::CntrError,
};

#[cfg(feature = "bus-emulated")]
pub use crate::bus::{Emulated, EmulatedOption};

pub use cntr_core::{
    bus::{BurstMode, Bus, BusError},
    stream::RawWord,
};
pub use cntr_driver::{
    error::CntrDriverError,
    firmware::{
        lut::{ChannelLut, SlotAssignment},
        stream::StreamDecoder,
        window::WindowSize,
    },
};
