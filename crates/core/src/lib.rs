pub mod convert;
pub mod graph;
pub mod solver;
pub mod traits;

pub use convert::{Conversion, convert, convert_lines};
pub use graph::{BuildOptions, CurrencyGraph};
pub use solver::BfsSolver;
