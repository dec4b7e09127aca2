use super::graph::CurrencyGraph;
use common::{error::Error, types::ConversionPath};

/// Trait for solvers that find a conversion path between two currencies.
pub trait PathSolver {
    /// Finds a path from `source` to `target`.
    ///
    /// Returns `Ok(path)` when `target` is reachable (an empty path if
    /// `source == target`), `Err(Error::NoConversionPath)` when it is not,
    /// or another `Err(e)` for invalid input.
    fn find_path(
        &self,
        graph: &CurrencyGraph,
        source: usize,
        target: usize,
    ) -> Result<ConversionPath, Error>;
}
