use super::bands::{BandLimits, BandedAmount};
use super::inputs::{PensionType, TaxInputs};
use super::uk::Rates;
use rust_decimal::Decimal;

/// Effect of a pension contribution on the rest of the calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PensionAdjustment {
    /// Salary used for allowance tapering, banding and NI
    pub adjusted_salary: Decimal,
    /// Contribution including basic rate relief added by the scheme
    pub gross_contribution: Decimal,
    /// Amount added to the basic rate band
    pub band_extension: Decimal,
}

pub fn adjust(inputs: &TaxInputs, rates: &Rates) -> PensionAdjustment {
    let contribution = inputs.pension_contribution;
    if contribution <= Decimal::ZERO {
        return PensionAdjustment {
            adjusted_salary: inputs.salary,
            gross_contribution: Decimal::ZERO,
            band_extension: Decimal::ZERO,
        };
    }

    match inputs.pension_type {
        PensionType::NetPay => PensionAdjustment {
            adjusted_salary: inputs.salary - contribution,
            gross_contribution: contribution,
            band_extension: Decimal::ZERO,
        },
        PensionType::ReliefAtSource => {
            let gross = rates.gross_up(contribution);
            PensionAdjustment {
                adjusted_salary: inputs.salary,
                gross_contribution: gross,
                band_extension: gross,
            }
        }
    }
}

/// Net pay relief: tax the unreduced salary would have paid through the same
/// bands and allowance, less the salary tax actually due.
pub fn net_pay_relief(
    salary: Decimal,
    allowance: Decimal,
    salary_tax: Decimal,
    limits: &BandLimits,
    rates: &Rates,
) -> Decimal {
    let taxable = (salary - allowance).max(Decimal::ZERO);
    let without_pension = BandedAmount::split(taxable, Decimal::ZERO, limits, rates.income_rates());
    without_pension.tax() - salary_tax
}

/// Higher and additional rate relief on a relief-at-source contribution.
///
/// Basic rate relief is given at source. The grossed-up contribution is
/// matched against the top of taxable salary: the part above the additional
/// rate threshold earns the additional-basic difference, the next part above
/// the basic rate threshold earns the higher-basic difference.
pub fn relief_at_source_relief(
    taxable_salary: Decimal,
    gross_contribution: Decimal,
    rates: &Rates,
) -> Decimal {
    let limits = BandLimits::new(rates, Decimal::ZERO);
    let above_higher = (taxable_salary - limits.higher).max(Decimal::ZERO);
    let above_basic = (taxable_salary - limits.basic).max(Decimal::ZERO);

    let at_additional = gross_contribution.min(above_higher);
    let at_higher = (gross_contribution - at_additional).min(above_basic - above_higher);

    at_additional * (rates.additional_rate - rates.basic_rate)
        + at_higher * (rates.higher_rate - rates.basic_rate)
}
