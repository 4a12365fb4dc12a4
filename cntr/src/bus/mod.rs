#[cfg(feature = "bus-emulated")]
mod emulated;

#[cfg(feature = "bus-emulated")]
pub use emulated::{Emulated, EmulatedOption};
