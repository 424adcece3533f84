use super::allowance::{self, AllowanceAllocation};
use super::bands::{BandLimits, BandedAmount};
use super::inputs::{PensionType, TaxInputs};
use super::pension;
use super::uk::{Rates, TaxBand};
use rust_decimal::Decimal;
use serde::Serialize;

/// Income tax on salary, savings and dividends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxResult {
    pub total_tax: Decimal,
    pub salary_tax: Decimal,
    pub savings_tax: Decimal,
    pub dividend_tax: Decimal,

    /// Income the allowance taper was measured against
    pub allowance_income: Decimal,
    pub allowance_reduction: Decimal,
    pub personal_allowance: Decimal,
    #[serde(flatten)]
    pub allocation: AllowanceAllocation,

    pub starting_rate_for_savings: Decimal,
    pub starting_rate_used: Decimal,
    pub savings_allowance: Decimal,
    pub savings_allowance_used: Decimal,
    pub dividend_allowance_used: Decimal,

    pub salary_bands: BandedAmount,
    pub savings_bands: BandedAmount,
    pub dividend_bands: BandedAmount,
    pub limits: BandLimits,
    /// Band reached by the top slice of taxable income
    pub marginal_band: TaxBand,

    pub adjusted_salary: Decimal,
    pub pension_contribution: Decimal,
    pub pension_type: PensionType,
    pub gross_pension_contribution: Decimal,
    pub pension_tax_relief: Decimal,
}

impl IncomeTaxResult {
    pub fn taxable_salary(&self) -> Decimal {
        self.allocation.taxable_salary
    }

    pub fn taxable_savings(&self) -> Decimal {
        self.allocation.taxable_savings
    }

    pub fn taxable_dividends(&self) -> Decimal {
        self.allocation.taxable_dividends
    }

    /// Taxable income across all streams
    pub fn taxable_income(&self) -> Decimal {
        self.allocation.taxable_total()
    }
}

/// Calculate income tax for already sanitised inputs.
///
/// Streams are processed in beneficial order: salary occupies the lowest part
/// of each band, savings sit on top of salary and dividends on top of both.
pub fn calculate_income_tax(inputs: &TaxInputs, rates: &Rates) -> IncomeTaxResult {
    let adjustment = pension::adjust(inputs, rates);
    let adjusted_salary = adjustment.adjusted_salary;
    let limits = BandLimits::new(rates, adjustment.band_extension);

    let allowance_income = adjusted_salary + inputs.savings_interest + inputs.dividend_income;
    let allowance_reduction = allowance::allowance_reduction(allowance_income, rates);
    let personal_allowance = allowance::personal_allowance(allowance_income, rates);
    let allocation = allowance::allocate(
        personal_allowance,
        adjusted_salary,
        inputs.savings_interest,
        inputs.dividend_income,
    );
    log::debug!(
        "Personal allowance {} on income {}: taxable salary {}, savings {}, dividends {}",
        personal_allowance,
        allowance_income,
        allocation.taxable_salary,
        allocation.taxable_savings,
        allocation.taxable_dividends
    );

    // Salary
    let salary_bands = BandedAmount::split(
        allocation.taxable_salary,
        Decimal::ZERO,
        &limits,
        rates.income_rates(),
    );
    let salary_tax = salary_bands.tax();

    // Savings: starting rate band, then PSA, then marginal rates
    let starting_rate_for_savings =
        allowance::starting_rate_for_savings(allocation.taxable_salary, rates);
    let savings_allowance =
        allowance::personal_savings_allowance(allocation.taxable_salary, &limits, rates);
    let starting_rate_used = allocation.taxable_savings.min(starting_rate_for_savings);
    let savings_allowance_used =
        (allocation.taxable_savings - starting_rate_used).min(savings_allowance);
    let savings_chargeable = allocation.taxable_savings - starting_rate_used - savings_allowance_used;
    let savings_bands = BandedAmount::split(
        savings_chargeable,
        allocation.taxable_salary,
        &limits,
        rates.income_rates(),
    );
    let savings_tax = savings_bands.tax();
    log::debug!(
        "Savings {}: starting rate {} of {}, PSA {} of {}, tax {}",
        allocation.taxable_savings,
        starting_rate_used,
        starting_rate_for_savings,
        savings_allowance_used,
        savings_allowance,
        savings_tax
    );

    // Dividends: allowance, then dividend rates on top of salary and savings
    let dividend_allowance_used = allocation.taxable_dividends.min(rates.dividend_allowance);
    let dividend_bands = BandedAmount::split(
        allocation.taxable_dividends - dividend_allowance_used,
        allocation.taxable_salary + allocation.taxable_savings,
        &limits,
        rates.dividend_rates(),
    );
    let dividend_tax = dividend_bands.tax();
    log::debug!(
        "Dividends {}: allowance {}, tax {}",
        allocation.taxable_dividends,
        dividend_allowance_used,
        dividend_tax
    );

    let pension_tax_relief = if inputs.pension_contribution > Decimal::ZERO {
        match inputs.pension_type {
            PensionType::NetPay => pension::net_pay_relief(
                inputs.salary,
                personal_allowance,
                salary_tax,
                &limits,
                rates,
            ),
            PensionType::ReliefAtSource => pension::relief_at_source_relief(
                allocation.taxable_salary,
                adjustment.gross_contribution,
                rates,
            ),
        }
    } else {
        Decimal::ZERO
    };

    let total_tax = salary_tax + savings_tax + dividend_tax;
    log::debug!(
        "Income tax {} (salary {}, savings {}, dividends {}), pension relief {}",
        total_tax,
        salary_tax,
        savings_tax,
        dividend_tax,
        pension_tax_relief
    );

    IncomeTaxResult {
        total_tax,
        salary_tax,
        savings_tax,
        dividend_tax,
        allowance_income,
        allowance_reduction,
        personal_allowance,
        allocation,
        starting_rate_for_savings,
        starting_rate_used,
        savings_allowance,
        savings_allowance_used,
        dividend_allowance_used,
        salary_bands,
        savings_bands,
        dividend_bands,
        limits,
        marginal_band: limits.band_of(allocation.taxable_total()),
        adjusted_salary,
        pension_contribution: inputs.pension_contribution,
        pension_type: inputs.pension_type,
        gross_pension_contribution: adjustment.gross_contribution,
        pension_tax_relief,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tax(salary: Decimal, savings: Decimal, dividends: Decimal) -> IncomeTaxResult {
        let inputs = TaxInputs {
            salary,
            savings_interest: savings,
            dividend_income: dividends,
            ..Default::default()
        };
        calculate_income_tax(&inputs, &Rates::default())
    }

    #[test]
    fn basic_rate_salary_savings_dividends() {
        let result = tax(dec!(45000), dec!(2000), dec!(1000));
        assert_eq!(result.personal_allowance, dec!(12570));
        assert_eq!(result.taxable_salary(), dec!(32430));
        assert_eq!(result.salary_tax, dec!(6486));
        // Starting rate band is used up by salary, PSA covers 1,000 of 2,000
        assert_eq!(result.starting_rate_for_savings, Decimal::ZERO);
        assert_eq!(result.savings_allowance, dec!(1000));
        assert_eq!(result.savings_allowance_used, dec!(1000));
        assert_eq!(result.savings_tax, dec!(200));
        assert_eq!(result.dividend_allowance_used, dec!(500));
        assert_eq!(result.dividend_tax, dec!(53.75));
        assert_eq!(result.total_tax, dec!(6739.75));
        assert_eq!(result.marginal_band, TaxBand::Basic);
    }

    #[test]
    fn savings_covered_by_starting_rate_band() {
        // Salary 14,000: 1,430 taxable, leaving 3,570 of starting rate band
        let result = tax(dec!(14000), dec!(4000), Decimal::ZERO);
        assert_eq!(result.starting_rate_for_savings, dec!(3570));
        assert_eq!(result.starting_rate_used, dec!(3570));
        assert_eq!(result.savings_allowance_used, dec!(430));
        assert_eq!(result.savings_tax, Decimal::ZERO);
    }

    #[test]
    fn savings_only_income() {
        // 12,570 allowance + 5,000 starting rate + 1,000 PSA, then 20%
        let result = tax(Decimal::ZERO, dec!(20000), Decimal::ZERO);
        assert_eq!(result.taxable_savings(), dec!(7430));
        assert_eq!(result.starting_rate_used, dec!(5000));
        assert_eq!(result.savings_allowance_used, dec!(1000));
        assert_eq!(result.savings_tax, dec!(286));
    }

    #[test]
    fn higher_rate_savings_allowance() {
        let result = tax(dec!(60000), dec!(1500), Decimal::ZERO);
        assert_eq!(result.savings_allowance, dec!(500));
        // 1,000 chargeable, all above the basic rate band
        assert_eq!(result.savings_bands.higher.amount, dec!(1000));
        assert_eq!(result.savings_tax, dec!(400));
    }

    #[test]
    fn dividends_straddle_basic_rate_limit() {
        // Taxable salary 37,430 leaves 270 of basic band
        let result = tax(dec!(50000), Decimal::ZERO, dec!(2500));
        assert_eq!(result.dividend_bands.basic.amount, dec!(270));
        assert_eq!(result.dividend_bands.higher.amount, dec!(1730));
        assert_eq!(
            result.dividend_tax,
            dec!(270) * dec!(0.1075) + dec!(1730) * dec!(0.3575)
        );
    }

    #[test]
    fn allowance_tapered_away() {
        let result = tax(dec!(130000), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(result.allowance_reduction, dec!(15000));
        assert_eq!(result.personal_allowance, Decimal::ZERO);
        assert_eq!(result.taxable_salary(), dec!(130000));
        assert_eq!(result.salary_bands.additional.amount, dec!(4860));
        assert_eq!(result.savings_allowance, Decimal::ZERO);
        assert_eq!(result.marginal_band, TaxBand::Additional);
    }

    #[test]
    fn taper_zone_stays_higher_rate() {
        // 110,000: allowance 7,570, taxable 102,430 is all below 125,140
        let result = tax(dec!(110000), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(result.personal_allowance, dec!(7570));
        assert_eq!(result.salary_bands.additional.amount, Decimal::ZERO);
        assert_eq!(result.salary_tax, dec!(7540) + dec!(64730) * dec!(0.40));
    }

    #[test]
    fn salary_tiers_sum_to_salary_tax() {
        for salary in [dec!(0), dec!(12570), dec!(50270), dec!(50271), dec!(99999), dec!(125140), dec!(250000)] {
            let result = tax(salary, Decimal::ZERO, Decimal::ZERO);
            let bands = &result.salary_bands;
            assert_eq!(bands.amount(), result.taxable_salary());
            assert_eq!(
                bands.basic.amount * dec!(0.20)
                    + bands.higher.amount * dec!(0.40)
                    + bands.additional.amount * dec!(0.45),
                result.salary_tax
            );
        }
    }

    #[test]
    fn net_pay_pension_reduces_taxable_salary() {
        let inputs = TaxInputs {
            salary: dec!(70000),
            pension_contribution: dec!(10000),
            pension_type: PensionType::NetPay,
            ..Default::default()
        };
        let result = calculate_income_tax(&inputs, &Rates::default());
        assert_eq!(result.adjusted_salary, dec!(60000));
        assert_eq!(result.taxable_salary(), dec!(47430));
        assert_eq!(result.salary_tax, dec!(11432));
        assert_eq!(result.pension_tax_relief, dec!(4000));
    }

    #[test]
    fn net_pay_pension_restores_allowance() {
        let inputs = TaxInputs {
            salary: dec!(110000),
            pension_contribution: dec!(10000),
            ..Default::default()
        };
        let result = calculate_income_tax(&inputs, &Rates::default());
        assert_eq!(result.personal_allowance, dec!(12570));
        assert_eq!(result.taxable_salary(), dec!(87430));
    }

    #[test]
    fn relief_at_source_extends_basic_band() {
        let inputs = TaxInputs {
            salary: dec!(70000),
            pension_contribution: dec!(8000),
            pension_type: PensionType::ReliefAtSource,
            ..Default::default()
        };
        let result = calculate_income_tax(&inputs, &Rates::default());
        assert_eq!(result.adjusted_salary, dec!(70000));
        assert_eq!(result.gross_pension_contribution, dec!(10000));
        assert_eq!(result.limits.basic, dec!(47700));
        assert_eq!(result.salary_bands.basic.amount, dec!(47700));
        assert_eq!(result.salary_bands.higher.amount, dec!(9730));
        assert_eq!(result.pension_tax_relief, dec!(2000));
    }
}
