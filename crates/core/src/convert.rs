use rust_decimal::Decimal;
use tracing::debug;

use super::graph::{BuildOptions, CurrencyGraph};
use super::solver::BfsSolver;
use super::traits::PathSolver;
use common::{
    error::Error,
    numeric_kernel::{fold_notional, round_output},
    types::{ConversionPath, ConversionRequest, RoundingPolicy},
};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub path: ConversionPath,
    /// Notional folded through the rounded rates, before output rounding.
    pub amount: Decimal,
    /// `amount` rounded to the policy's output scale.
    pub rounded: Decimal,
}

/// Finds a path for `request` with `solver` and converts the notional along it.
pub fn convert<S: PathSolver>(
    solver: &S,
    graph: &CurrencyGraph,
    request: &ConversionRequest,
    policy: &RoundingPolicy,
) -> Result<Conversion, Error> {
    let path = solver.find_path(graph, request.source, request.target)?;

    debug!(
        from = %graph.label(request.source),
        to = %graph.label(request.target),
        hops = path.len(),
        "Conversion path found"
    );

    let amount = fold_notional(request.notional, path.rates(), policy.rate_scale)?;
    for hop in &path.hops {
        debug!(
            from = %graph.label(hop.from),
            to = %graph.label(hop.to),
            rate = %hop.rate,
            "hop"
        );
    }

    Ok(Conversion {
        path,
        amount,
        rounded: round_output(amount, policy.output_scale),
    })
}

/// Builds the graph from `lines` and converts the requested notional with BFS.
pub fn convert_lines<S: AsRef<str>>(
    lines: &[S],
    options: &BuildOptions,
    policy: &RoundingPolicy,
) -> Result<Conversion, Error> {
    let (graph, request) = CurrencyGraph::from_lines(lines, options)?;
    convert(&BfsSolver, &graph, &request, policy)
}
