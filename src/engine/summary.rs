use super::cgt::{calculate_cgt, CapitalGainsResult};
use super::income::{calculate_income_tax, IncomeTaxResult};
use super::inputs::{EmploymentType, TaxInputs};
use super::ni::{class2_status, national_insurance, Class2Status, NiBreakdown};
use super::uk::{Rates, TaxYear};
use super::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Complete take-home calculation for one set of inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    pub tax_year: TaxYear,
    /// Salary, savings interest and dividends before any deductions
    pub total_income: Decimal,
    pub take_home: Decimal,
    pub monthly_take_home: Decimal,
    pub income_tax: IncomeTaxResult,
    pub national_insurance: Decimal,
    pub ni_breakdown: NiBreakdown,
    /// Present for self-employed inputs only
    pub class2_status: Option<Class2Status>,
    pub voluntary_ni_cost: Decimal,
    /// Income tax + NI + voluntary Class 2 - pension tax relief
    pub total_deductions: Decimal,
    /// Reported alongside income; not part of the deductions
    pub capital_gains: CapitalGainsResult,
    pub warnings: Vec<Warning>,
}

impl CalculationResult {
    /// Income tax plus capital gains tax
    pub fn total_tax_liability(&self) -> Decimal {
        self.income_tax.total_tax + self.capital_gains.tax
    }
}

/// Calculate take-home pay using the 2026/27 rates
pub fn compute_tax_summary(inputs: &TaxInputs) -> CalculationResult {
    compute_tax_summary_with(inputs, &Rates::default())
}

/// Calculate take-home pay with explicit rates.
///
/// Never fails: out-of-domain inputs are clamped and reported as warnings.
pub fn compute_tax_summary_with(inputs: &TaxInputs, rates: &Rates) -> CalculationResult {
    let (inputs, mut warnings) = inputs.sanitized();

    let income_tax = calculate_income_tax(&inputs, rates);

    // NI is charged on salary after net pay contributions
    let ni_breakdown = national_insurance(income_tax.adjusted_salary, inputs.employment_type, rates);
    let national_insurance = ni_breakdown.amount;

    let class2_status = match inputs.employment_type {
        EmploymentType::SelfEmployed => Some(class2_status(income_tax.adjusted_salary, rates)),
        EmploymentType::Employee | EmploymentType::Employer => None,
    };
    let voluntary_ni_cost = match class2_status {
        Some(status) if status.offers_voluntary && inputs.pay_voluntary_ni => status.cost,
        _ => {
            if inputs.pay_voluntary_ni {
                warnings.push(Warning::VoluntaryNiNotOffered);
            }
            Decimal::ZERO
        }
    };

    let capital_gains = calculate_cgt(
        inputs.capital_gains,
        income_tax.taxable_income(),
        &income_tax.limits,
        rates,
    );

    let total_income = inputs.salary + inputs.savings_interest + inputs.dividend_income;
    let total_deductions = income_tax.total_tax + national_insurance + voluntary_ni_cost
        - income_tax.pension_tax_relief;
    let take_home = total_income - total_deductions;
    if take_home < Decimal::ZERO {
        warnings.push(Warning::NegativeTakeHome { take_home });
    }

    log::debug!(
        "Total income {}, deductions {}, take-home {}",
        total_income,
        total_deductions,
        take_home
    );

    CalculationResult {
        tax_year: rates.tax_year,
        total_income,
        take_home,
        monthly_take_home: take_home / dec!(12),
        income_tax,
        national_insurance,
        ni_breakdown,
        class2_status,
        voluntary_ni_cost,
        total_deductions,
        capital_gains,
        warnings,
    }
}
