use thiserror::Error;

/// An error produced by the bus transport.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("{msg}")]
pub struct BusError {
    msg: String,
}

impl BusError {
    /// Creates a new [`BusError`].
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
