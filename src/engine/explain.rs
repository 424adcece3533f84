//! Step-by-step explanation of a calculation

use super::bands::BandedAmount;
use super::inputs::{EmploymentType, PensionType, TaxInputs};
use super::summary::{compute_tax_summary, CalculationResult};
use crate::money::{format_gbp, format_rate};
use rust_decimal::Decimal;
use serde::Serialize;

/// One line of the explanation: what was calculated and the resulting figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationStep {
    pub title: String,
    pub description: String,
    pub value: String,
}

impl CalculationStep {
    fn new(title: impl Into<String>, description: impl Into<String>, value: impl Into<String>) -> Self {
        CalculationStep {
            title: title.into(),
            description: description.into(),
            value: value.into(),
        }
    }
}

/// Calculate with the 2026/27 rates and explain the result
pub fn explain_calculation(inputs: &TaxInputs) -> Vec<CalculationStep> {
    let result = compute_tax_summary(inputs);
    explain_result(inputs, &result)
}

/// Explain an existing result. Only figures already in `result` are used.
pub fn explain_result(inputs: &TaxInputs, result: &CalculationResult) -> Vec<CalculationStep> {
    let tax = &result.income_tax;
    let mut steps = Vec::new();

    steps.push(CalculationStep::new(
        "Total Income",
        format!(
            "Salary ({}) + Savings Interest ({}) + Dividends ({})",
            format_gbp(inputs.salary.max(Decimal::ZERO)),
            format_gbp(inputs.savings_interest.max(Decimal::ZERO)),
            format_gbp(inputs.dividend_income.max(Decimal::ZERO)),
        ),
        format_gbp(result.total_income),
    ));

    let standard_allowance = tax.personal_allowance + tax.allowance_reduction;
    let allowance_description = if tax.allowance_reduction > Decimal::ZERO {
        format!(
            "{} reduced by £1 for every £2 of income over the taper threshold. Income {}, reduction {}",
            format_gbp(standard_allowance),
            format_gbp(tax.allowance_income),
            format_gbp(tax.allowance_reduction)
        )
    } else {
        format!("Standard Personal Allowance for {}", result.tax_year)
    };
    steps.push(CalculationStep::new(
        "Personal Allowance",
        allowance_description,
        format_gbp(tax.personal_allowance),
    ));

    steps.push(CalculationStep::new(
        "Beneficial Ordering (PA Application)",
        "Personal Allowance applied first to Salary, then Savings, then Dividends",
        format!(
            "Salary: {} taxable | Savings: {} taxable | Dividends: {} taxable",
            format_gbp(tax.taxable_salary()),
            format_gbp(tax.taxable_savings()),
            format_gbp(tax.taxable_dividends())
        ),
    ));

    if tax.taxable_salary() > Decimal::ZERO {
        steps.push(CalculationStep::new(
            "Income Tax on Salary",
            describe_bands(&tax.salary_bands),
            format_gbp(tax.salary_tax),
        ));
    }

    if inputs.savings_interest > Decimal::ZERO {
        let mut description = format!(
            "Starting Rate for Savings: {} at 0% | PSA: {} at 0%",
            format_gbp(tax.starting_rate_used),
            format_gbp(tax.savings_allowance_used)
        );
        if tax.savings_bands.amount() > Decimal::ZERO {
            description.push_str(" | ");
            description.push_str(&describe_bands(&tax.savings_bands));
        }
        steps.push(CalculationStep::new(
            "Savings Tax",
            description,
            format_gbp(tax.savings_tax),
        ));
    }

    if inputs.dividend_income > Decimal::ZERO {
        let mut description = format!(
            "Dividend Allowance: {} at 0%",
            format_gbp(tax.dividend_allowance_used)
        );
        if tax.dividend_bands.amount() > Decimal::ZERO {
            description.push_str(" | ");
            description.push_str(&describe_bands(&tax.dividend_bands));
        }
        steps.push(CalculationStep::new(
            "Dividend Tax",
            description,
            format_gbp(tax.dividend_tax),
        ));
    }

    if tax.pension_contribution > Decimal::ZERO {
        let description = match tax.pension_type {
            PensionType::NetPay => format!(
                "Net Pay: {} deducted before tax, taxable salary based on {}",
                format_gbp(tax.pension_contribution),
                format_gbp(tax.adjusted_salary)
            ),
            PensionType::ReliefAtSource => format!(
                "Relief at Source: {} paid, grossed up to {}. Basic rate band extended to {}; extra relief above basic rate",
                format_gbp(tax.pension_contribution),
                format_gbp(tax.gross_pension_contribution),
                format_gbp(tax.limits.basic)
            ),
        };
        steps.push(CalculationStep::new(
            "Pension Tax Relief",
            description,
            format_gbp(tax.pension_tax_relief),
        ));
    }

    let ni = &result.ni_breakdown;
    let ni_description = match ni.employment_type {
        EmploymentType::Employee | EmploymentType::SelfEmployed => {
            let class = if ni.employment_type == EmploymentType::SelfEmployed {
                "Class 4: "
            } else {
                ""
            };
            format!(
                "{}{} on {} above {}, {} on {} above the upper limit",
                class,
                format_rate(ni.main_rate),
                format_gbp(ni.main_slice),
                format_gbp(ni.threshold),
                format_rate(ni.upper_rate),
                format_gbp(ni.upper_slice)
            )
        }
        EmploymentType::Employer => format!(
            "{} on {} above {}",
            format_rate(ni.main_rate),
            format_gbp(ni.main_slice),
            format_gbp(ni.threshold)
        ),
    };
    steps.push(CalculationStep::new(
        format!("National Insurance ({})", ni.employment_type),
        ni_description,
        format_gbp(result.national_insurance),
    ));

    if let Some(status) = result.class2_status {
        if result.voluntary_ni_cost > Decimal::ZERO {
            steps.push(CalculationStep::new(
                "Voluntary Class 2 NI",
                "Voluntary contribution to maintain NI credits",
                format_gbp(result.voluntary_ni_cost),
            ));
        } else {
            let value = if status.offers_voluntary {
                format!("Voluntary cost {}", format_gbp(status.cost))
            } else {
                format_gbp(Decimal::ZERO)
            };
            steps.push(CalculationStep::new("Class 2 NI Status", status.status, value));
        }
    }

    let cgt = &result.capital_gains;
    if cgt.gains > Decimal::ZERO {
        steps.push(CalculationStep::new(
            "Capital Gains Tax",
            format!(
                "Exempt amount: {} | {} at {} | {} at {}",
                format_gbp(cgt.exempt_amount_used),
                format_gbp(cgt.basic_rate_portion),
                format_rate(cgt.basic_rate),
                format_gbp(cgt.higher_rate_portion),
                format_rate(cgt.higher_rate)
            ),
            format_gbp(cgt.tax),
        ));
    }

    let mut deductions = String::from("Income Tax + National Insurance");
    if result.voluntary_ni_cost > Decimal::ZERO {
        deductions.push_str(" + Voluntary Class 2 NI");
    }
    if tax.pension_tax_relief != Decimal::ZERO {
        deductions.push_str(" - Pension Tax Relief");
    }
    steps.push(CalculationStep::new(
        "Total Deductions",
        deductions,
        format_gbp(result.total_deductions),
    ));

    steps.push(CalculationStep::new(
        "Annual Take-Home Pay",
        format!(
            "Total Income - Total Deductions ({} per month)",
            format_gbp(result.monthly_take_home)
        ),
        format_gbp(result.take_home),
    ));

    steps
}

fn describe_bands(bands: &BandedAmount) -> String {
    let parts: Vec<String> = bands
        .tiers()
        .iter()
        .filter(|(_, slice)| slice.amount > Decimal::ZERO)
        .map(|(band, slice)| {
            format!(
                "{} Rate: {} at {}",
                band,
                format_gbp(slice.amount),
                format_rate(slice.rate)
            )
        })
        .collect();
    parts.join(" | ")
}
