use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept on every reported figure.
pub const REPORTED_SCALE: u32 = 2;

/// Half-up rounding to two places, rescaled so `3` reports as `3.00`.
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(REPORTED_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(REPORTED_SCALE);
    rounded
}

/// `numerator / denominator` rounded once, or zero when the denominator is zero.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return round_half_up(Decimal::ZERO);
    }
    round_half_up(numerator / denominator)
}
