pub mod bus;
pub mod counter;
pub mod error;
pub mod prelude;

pub use cntr_core as core;
pub use cntr_driver as driver;

pub use counter::Counter;
