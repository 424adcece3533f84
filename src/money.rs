use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Round to whole pence, half away from zero.
///
/// Calculations keep full precision; this is only applied when displaying.
pub fn round_pence(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as GBP with thousands separators, e.g. `£38,865.85` or `-£189.80`
pub fn format_gbp(amount: Decimal) -> String {
    let rounded = round_pence(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, pence) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{}£{}.{}", sign, group_thousands(whole), pence)
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Plain two decimal place amount for machine-readable output, e.g. `-189.80`
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_pence(amount))
}

/// Format a rate as a percentage, e.g. `10.75%` or `20%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}
