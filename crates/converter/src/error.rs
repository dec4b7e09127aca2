use thiserror::Error;

use common::error::Error as ConversionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read input file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(String),

    #[error(
        "File should contain at least the conversion request and the number of pairs, found {0} line(s)."
    )]
    TooFewLines(usize),

    #[error(
        "Second line '{0}' should be a non-negative integer indicating the number of currency pairs."
    )]
    InvalidPairCount(String),

    #[error(
        "Number of expected pairs does not match provided pairs: expected {declared}, actual {actual}."
    )]
    PairCountMismatch { declared: usize, actual: usize },

    #[error("{0}")]
    Conversion(#[from] ConversionError),
}
