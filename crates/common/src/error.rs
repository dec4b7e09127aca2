use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A ticker that is not exactly 3 characters long.
    InvalidTickerFormat(String),

    /// A ticker containing non-alphabetic characters (strict validation only).
    NonAlphabeticTicker(String),

    /// The request line does not split into `SRC;AMOUNT;DST`.
    MalformedRequestLine(String),

    /// A pair record does not split into exactly 3 fields.
    MalformedPairLine { line: usize, content: String },

    /// A rate field that is not a decimal, is not strictly positive, or has no
    /// representable reciprocal.
    InvalidRate { line: usize, rate: String },

    /// The notional amount on the request line is not a decimal.
    InvalidAmountFormat(String),

    /// The same currency pair was given twice (strict validation only).
    DuplicatePair {
        line: usize,
        from: String,
        to: String,
    },

    /// A ticker that was never assigned a vertex id. Only reachable when
    /// `build_adjacency` or `build_conversion_request` are given an id map
    /// that does not cover their input.
    UnknownCurrency(String),

    /// The search exhausted the graph without reaching the target currency.
    NoConversionPath,

    /// Indicates an attempt to access a vertex id that exceeds the graph size.
    VertexOutOfBounds(usize),

    /// Failed to trace the path back to the source through the predecessor chain.
    PathReconstructionFailed,

    /// The running amount no longer fits in a decimal.
    ConversionOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidTickerFormat(ticker) => {
                write!(f, "Ticker '{}' should have exactly 3 characters.", ticker)
            }

            Error::NonAlphabeticTicker(ticker) => write!(
                f,
                "Ticker '{}' should contain alphabetic characters only.",
                ticker
            ),

            Error::MalformedRequestLine(content) => write!(
                f,
                "First line '{}' should be formatted as 'Ticker;Amount;Ticker'.",
                content
            ),

            Error::MalformedPairLine { line, content } => write!(
                f,
                "Line {}: '{}' should be formatted as 'Ticker;Ticker;ExchangeRate'.",
                line, content
            ),

            Error::InvalidRate { line, rate } => write!(
                f,
                "Line {}: exchange rate '{}' should be a strictly positive decimal.",
                line, rate
            ),

            Error::InvalidAmountFormat(amount) => {
                write!(f, "Amount '{}' should be a decimal number.", amount)
            }

            Error::DuplicatePair { line, from, to } => write!(
                f,
                "Line {}: duplicate exchange rate for pair {}/{}.",
                line, from, to
            ),

            Error::UnknownCurrency(ticker) => {
                write!(f, "Currency '{}' is not part of the graph.", ticker)
            }

            Error::NoConversionPath => {
                write!(f, "Impossible to convert as missing exchange rate pair(s).")
            }

            Error::VertexOutOfBounds(v) => write!(f, "Vertex id {} is out of bounds.", v),

            Error::PathReconstructionFailed => write!(
                f,
                "Conversion path reconstruction failed due to broken predecessor chain."
            ),

            Error::ConversionOverflow => write!(f, "Converted amount overflows the decimal range."),
        }
    }
}

impl std::error::Error for Error {}
