use cntr_core::bus::BusError;
use cntr_driver::error::CntrDriverError;
use thiserror::Error;

/// A interface for error handling in cntr.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CntrError {
    /// Error in the driver.
    #[error("{0}")]
    Driver(#[from] CntrDriverError),
}

impl From<BusError> for CntrError {
    fn from(e: BusError) -> Self {
        Self::Driver(CntrDriverError::Bus(e))
    }
}
