mod error;
mod sync;

pub use error::BusError;
#[doc(inline)]
pub use sync::*;
