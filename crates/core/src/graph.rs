use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use tracing::debug;

use common::error::Error;
use common::types::{ConversionRequest, ExchangeEdge, TickerId};

const FIELD_SEPARATOR: char = ';';

/// Index of the first pair record in the input lines.
/// Line 0 is the request, line 1 the declared pair count.
pub const FIRST_PAIR_LINE: usize = 2;

/// Optional strict checks applied while scanning the input.
///
/// Both are off by default: duplicated pairs then simply produce parallel edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub reject_duplicate_pairs: bool,
    pub require_alphabetic_tickers: bool,
}

/// A validated `FROM;TO;RATE` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRecord {
    /// 1-based line number in the input.
    pub line: usize,
    pub from: TickerId,
    pub to: TickerId,
    pub rate: Decimal,
}

/// Output of the first scan over the input.
///
/// `distinct` holds each ticker once, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct CurrencyScan {
    pub distinct: Vec<TickerId>,
    pub pairs: Vec<PairRecord>,
}

/// The three raw fields of the request line `SRC;AMOUNT;DST`.
struct RequestFields<'a> {
    source: &'a str,
    amount: &'a str,
    target: &'a str,
}

fn split_request_line(line: &str) -> Result<RequestFields<'_>, Error> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    match fields[..] {
        [source, amount, target] => Ok(RequestFields {
            source,
            amount,
            target,
        }),
        _ => Err(Error::MalformedRequestLine(line.to_string())),
    }
}

fn parse_ticker(ticker: &str, options: &BuildOptions) -> Result<TickerId, Error> {
    let id = TickerId::parse(ticker)?;
    if options.require_alphabetic_tickers && !id.is_alphabetic() {
        return Err(Error::NonAlphabeticTicker(ticker.to_string()));
    }
    Ok(id)
}

fn parse_rate(field: &str, line: usize) -> Result<Decimal, Error> {
    let invalid = || Error::InvalidRate {
        line,
        rate: field.to_string(),
    };

    let rate = Decimal::from_str(field.trim()).map_err(|_| invalid())?;
    if rate <= Decimal::ZERO {
        return Err(invalid());
    }
    reciprocal(rate, line)?;
    Ok(rate)
}

fn reciprocal(rate: Decimal, line: usize) -> Result<Decimal, Error> {
    Decimal::ONE
        .checked_div(rate)
        .ok_or_else(|| Error::InvalidRate {
            line,
            rate: rate.to_string(),
        })
}

/// Scans the request line and every pair line, validating each record and
/// collecting the distinct tickers.
///
/// # Errors
/// - `MalformedRequestLine` if `lines` is empty or line 0 is not `SRC;AMOUNT;DST`.
/// - `InvalidTickerFormat` / `NonAlphabeticTicker` for a bad ticker.
/// - `MalformedPairLine` if a pair line does not have exactly 3 fields.
/// - `InvalidRate` if a rate is not a strictly positive decimal.
/// - `DuplicatePair` when duplicates are rejected and a pair repeats.
pub fn collect_distinct_currencies<S: AsRef<str>>(
    lines: &[S],
    options: &BuildOptions,
) -> Result<CurrencyScan, Error> {
    let request_line: &str = lines
        .first()
        .map(|line| line.as_ref())
        .ok_or_else(|| Error::MalformedRequestLine(String::new()))?;
    let request = split_request_line(request_line)?;

    let mut seen = HashSet::new();
    let mut scan = CurrencyScan::default();
    let mut note = |id: TickerId, scan: &mut CurrencyScan| {
        if seen.insert(id) {
            scan.distinct.push(id);
        }
    };

    note(parse_ticker(request.source, options)?, &mut scan);
    note(parse_ticker(request.target, options)?, &mut scan);

    let mut seen_pairs = HashSet::new();

    for (idx, raw) in lines.iter().enumerate().skip(FIRST_PAIR_LINE) {
        let raw = raw.as_ref();
        let line = idx + 1;

        let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
        let [from, to, rate] = fields[..] else {
            return Err(Error::MalformedPairLine {
                line,
                content: raw.to_string(),
            });
        };

        let from = parse_ticker(from, options)?;
        let to = parse_ticker(to, options)?;
        let rate = parse_rate(rate, line)?;

        if options.reject_duplicate_pairs {
            let key = if from <= to { (from, to) } else { (to, from) };
            if !seen_pairs.insert(key) {
                return Err(Error::DuplicatePair {
                    line,
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }

        note(from, &mut scan);
        note(to, &mut scan);
        scan.pairs.push(PairRecord {
            line,
            from,
            to,
            rate,
        });
    }

    Ok(scan)
}

/// Assigns the dense vertex ids `0..distinct.len()` in enumeration order.
pub fn assign_dense_ids(distinct: &[TickerId]) -> HashMap<TickerId, usize> {
    distinct
        .iter()
        .enumerate()
        .map(|(vertex, &ticker)| (ticker, vertex))
        .collect()
}

fn vertex_for(ids: &HashMap<TickerId, usize>, ticker: TickerId) -> Result<usize, Error> {
    ids.get(&ticker)
        .copied()
        .ok_or_else(|| Error::UnknownCurrency(ticker.to_string()))
}

fn insert_pair(
    adjacency: &mut [Vec<ExchangeEdge>],
    from: usize,
    to: usize,
    rate: Decimal,
    line: usize,
) -> Result<(), Error> {
    let vertex_count = adjacency.len();
    if from >= vertex_count {
        return Err(Error::VertexOutOfBounds(from));
    }
    if to >= vertex_count {
        return Err(Error::VertexOutOfBounds(to));
    }
    if rate <= Decimal::ZERO {
        return Err(Error::InvalidRate {
            line,
            rate: rate.to_string(),
        });
    }

    let inverse = reciprocal(rate, line)?;
    adjacency[from].push(ExchangeEdge { target: to, rate });
    adjacency[to].push(ExchangeEdge {
        target: from,
        rate: inverse,
    });
    Ok(())
}

/// Builds one adjacency list per vertex.
///
/// Each pair `(from, to, rate)` appends `to @ rate` to `from`'s list and
/// `from @ 1/rate` to `to`'s list. Repeated pairs accumulate parallel edges
/// in input order.
pub fn build_adjacency(
    pairs: &[PairRecord],
    ids: &HashMap<TickerId, usize>,
) -> Result<Vec<Vec<ExchangeEdge>>, Error> {
    let mut adjacency = vec![Vec::new(); ids.len()];

    for pair in pairs {
        let from = vertex_for(ids, pair.from)?;
        let to = vertex_for(ids, pair.to)?;
        insert_pair(&mut adjacency, from, to, pair.rate, pair.line)?;
    }

    Ok(adjacency)
}

/// Parses `SRC;AMOUNT;DST` into a request over dense vertex ids.
///
/// # Errors
/// `MalformedRequestLine`, `InvalidTickerFormat`, `UnknownCurrency` or
/// `InvalidAmountFormat` if the amount is not a decimal.
pub fn build_conversion_request(
    line: &str,
    ids: &HashMap<TickerId, usize>,
) -> Result<ConversionRequest, Error> {
    let fields = split_request_line(line)?;

    let source = vertex_for(ids, TickerId::parse(fields.source)?)?;
    let target = vertex_for(ids, TickerId::parse(fields.target)?)?;
    let notional = Decimal::from_str(fields.amount.trim())
        .map_err(|_| Error::InvalidAmountFormat(fields.amount.to_string()))?;

    Ok(ConversionRequest {
        source,
        target,
        notional,
    })
}

/// Currency graph over dense vertex ids with reciprocal exchange edges.
///
/// Built once per input and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CurrencyGraph {
    tickers: Vec<TickerId>,
    adjacency: Vec<Vec<ExchangeEdge>>,
}

impl CurrencyGraph {
    /// Builds the graph and the conversion request from the raw input lines.
    ///
    /// Line 1 (the declared pair count) is not read here; the caller is
    /// expected to have checked it against the number of lines.
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        options: &BuildOptions,
    ) -> Result<(Self, ConversionRequest), Error> {
        let scan = collect_distinct_currencies(lines, options)?;
        let ids = assign_dense_ids(&scan.distinct);

        // collect_distinct_currencies already guarantees line 0 exists.
        let request_line: &str = lines.first().map(|line| line.as_ref()).unwrap_or_default();
        let request = build_conversion_request(request_line, &ids)?;
        let adjacency = build_adjacency(&scan.pairs, &ids)?;

        debug!(
            vertices = scan.distinct.len(),
            pairs = scan.pairs.len(),
            "Currency graph built"
        );

        let graph = CurrencyGraph {
            tickers: scan.distinct,
            adjacency,
        };
        Ok((graph, request))
    }

    /// Builds an anonymous graph directly from `(from, to, rate)` triples
    /// over vertex ids `0..vertex_count`, inserting reciprocal edges.
    ///
    /// # Errors
    /// `VertexOutOfBounds` for an id outside the graph, `InvalidRate` for a
    /// non-positive rate (the reported line is the triple's 1-based position).
    pub fn from_rates(
        vertex_count: usize,
        pairs: &[(usize, usize, Decimal)],
    ) -> Result<Self, Error> {
        let mut adjacency = vec![Vec::new(); vertex_count];
        for (idx, &(from, to, rate)) in pairs.iter().enumerate() {
            insert_pair(&mut adjacency, from, to, rate, idx + 1)?;
        }

        Ok(CurrencyGraph {
            tickers: Vec::new(),
            adjacency,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of `vertex` in insertion order.
    pub fn edges(&self, vertex: usize) -> Result<&[ExchangeEdge], Error> {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .ok_or(Error::VertexOutOfBounds(vertex))
    }

    pub fn ticker(&self, vertex: usize) -> Option<TickerId> {
        self.tickers.get(vertex).copied()
    }

    pub fn vertex_of(&self, ticker: TickerId) -> Option<usize> {
        self.tickers.iter().position(|&t| t == ticker)
    }

    /// Human-readable name of a vertex: its ticker, or `#id` for anonymous graphs.
    pub fn label(&self, vertex: usize) -> String {
        match self.ticker(vertex) {
            Some(ticker) => ticker.to_string(),
            None => format!("#{}", vertex),
        }
    }
}
