use rust_decimal::Decimal;

use super::error::Error;

/// Rounds a single hop's rate to `scale` decimal places.
///
/// `Decimal::round_dp` rounds half to even, so `1.00005` becomes `1.0000`
/// and `1.00015` becomes `1.0002` at scale 4.
pub fn round_rate(rate: Decimal, scale: u32) -> Decimal {
    rate.round_dp(scale)
}

/// Folds `notional` through a chain of rates, rounding each rate to
/// `rate_scale` places before multiplying.
///
/// The running amount itself is never rounded; only the rates are.
///
/// # Errors
/// Returns `Error::ConversionOverflow` if the running amount leaves the decimal range.
pub fn fold_notional<I>(notional: Decimal, rates: I, rate_scale: u32) -> Result<Decimal, Error>
where
    I: IntoIterator<Item = Decimal>,
{
    rates.into_iter().try_fold(notional, |amount, rate| {
        amount
            .checked_mul(round_rate(rate, rate_scale))
            .ok_or(Error::ConversionOverflow)
    })
}

/// Rounds a converted amount for output.
pub fn round_output(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp(scale)
}
