use super::bands::BandLimits;
use super::uk::{Rates, TaxBand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Reduction of the personal allowance: £1 for every £2 of income over the
/// taper threshold, in whole pounds.
pub fn allowance_reduction(income: Decimal, rates: &Rates) -> Decimal {
    if income <= rates.allowance_taper_threshold {
        return Decimal::ZERO;
    }
    ((income - rates.allowance_taper_threshold) / dec!(2)).floor()
}

/// Personal allowance after tapering, never below zero
pub fn personal_allowance(income: Decimal, rates: &Rates) -> Decimal {
    (rates.personal_allowance - allowance_reduction(income, rates)).max(Decimal::ZERO)
}

/// Result of applying the personal allowance to each income stream in turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllowanceAllocation {
    pub taxable_salary: Decimal,
    pub taxable_savings: Decimal,
    pub taxable_dividends: Decimal,
    pub salary_allowance: Decimal,
    pub savings_allowance: Decimal,
    pub dividend_allowance: Decimal,
}

impl AllowanceAllocation {
    pub fn taxable_total(&self) -> Decimal {
        self.taxable_salary + self.taxable_savings + self.taxable_dividends
    }

    pub fn allowance_used(&self) -> Decimal {
        self.salary_allowance + self.savings_allowance + self.dividend_allowance
    }
}

/// Beneficial ordering: the allowance covers salary first, then savings,
/// then dividends.
pub fn allocate(
    allowance: Decimal,
    salary: Decimal,
    savings: Decimal,
    dividends: Decimal,
) -> AllowanceAllocation {
    let mut remaining = allowance.max(Decimal::ZERO);
    let mut take = |amount: Decimal| {
        let covered = amount.max(Decimal::ZERO).min(remaining);
        remaining -= covered;
        covered
    };

    let salary_allowance = take(salary);
    let savings_allowance = take(savings);
    let dividend_allowance = take(dividends);

    AllowanceAllocation {
        taxable_salary: (salary - salary_allowance).max(Decimal::ZERO),
        taxable_savings: (savings - savings_allowance).max(Decimal::ZERO),
        taxable_dividends: (dividends - dividend_allowance).max(Decimal::ZERO),
        salary_allowance,
        savings_allowance,
        dividend_allowance,
    }
}

/// Starting rate for savings band: shrinks £-for-£ with taxable salary
pub fn starting_rate_for_savings(taxable_salary: Decimal, rates: &Rates) -> Decimal {
    (rates.starting_rate_for_savings - taxable_salary.max(Decimal::ZERO)).max(Decimal::ZERO)
}

/// Personal Savings Allowance, set by the band the taxable salary reaches
pub fn personal_savings_allowance(
    taxable_salary: Decimal,
    limits: &BandLimits,
    rates: &Rates,
) -> Decimal {
    match limits.band_of(taxable_salary) {
        TaxBand::Basic => rates.savings_allowance_basic,
        TaxBand::Higher => rates.savings_allowance_higher,
        TaxBand::Additional => Decimal::ZERO,
    }
}
