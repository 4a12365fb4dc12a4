#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Core traits and types for the cntr event counter driver.

/// A word-addressable interface to the FPGA fabric.
pub mod bus;
/// Raw FIFO stream word format.
pub mod stream;
