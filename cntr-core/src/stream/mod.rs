mod word;

pub use word::RawWord;
