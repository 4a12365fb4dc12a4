/// Channel routing LUT builder.
pub mod lut;
/// Register map of the counter module.
pub mod registers;
/// FIFO stream decoder.
pub mod stream;
/// Measurement window codec.
pub mod window;
