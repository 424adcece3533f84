use super::bands::BandLimits;
use super::uk::Rates;
use rust_decimal::Decimal;
use serde::Serialize;

/// Capital Gains Tax on the year's gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapitalGainsResult {
    pub gains: Decimal,
    pub exempt_amount_used: Decimal,
    pub taxable_gain: Decimal,
    /// Part of the taxable gain inside the unused basic rate band
    pub basic_rate_portion: Decimal,
    pub higher_rate_portion: Decimal,
    pub basic_rate: Decimal,
    pub higher_rate: Decimal,
    pub tax: Decimal,
}

/// Gains are taxed after all income: whatever basic rate band the income left
/// unused is charged at the lower rate, the rest at the higher rate.
pub fn calculate_cgt(
    gains: Decimal,
    taxable_income: Decimal,
    limits: &BandLimits,
    rates: &Rates,
) -> CapitalGainsResult {
    let gains = gains.max(Decimal::ZERO);
    let exempt_amount_used = gains.min(rates.cgt_exempt_amount);
    let taxable_gain = gains - exempt_amount_used;

    let basic_rate_portion = taxable_gain.min(limits.basic_remaining(taxable_income));
    let higher_rate_portion = taxable_gain - basic_rate_portion;
    let tax = basic_rate_portion * rates.cgt_basic_rate + higher_rate_portion * rates.cgt_higher_rate;

    log::debug!(
        "CGT on {}: exempt {}, {} @ {}, {} @ {} = {}",
        gains,
        exempt_amount_used,
        basic_rate_portion,
        rates.cgt_basic_rate,
        higher_rate_portion,
        rates.cgt_higher_rate,
        tax
    );

    CapitalGainsResult {
        gains,
        exempt_amount_used,
        taxable_gain,
        basic_rate_portion,
        higher_rate_portion,
        basic_rate: rates.cgt_basic_rate,
        higher_rate: rates.cgt_higher_rate,
        tax,
    }
}
