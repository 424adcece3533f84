//! Summary command - take-home pay with the tax and NI breakdown

use crate::cmd::InputArgs;
use crate::engine::{compute_tax_summary, compute_tax_summary_with, CalculationResult, TaxInputs};
use crate::money::{format_gbp, format_rate};
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let inputs = self.input.read_inputs()?;
        let result = match self.input.read_custom_rates()? {
            Some(rates) => compute_tax_summary_with(&inputs, &rates),
            None => compute_tax_summary(&inputs),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_summary(&inputs, &result);
        }
        Ok(())
    }
}

#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl SummaryRow {
    fn new(item: impl Into<String>, amount: Decimal) -> Self {
        SummaryRow {
            item: item.into(),
            amount: format_gbp(amount),
        }
    }
}

fn summary_rows(inputs: &TaxInputs, result: &CalculationResult) -> Vec<SummaryRow> {
    let tax = &result.income_tax;
    let mut rows = vec![
        SummaryRow::new("Total Income", result.total_income),
        SummaryRow::new("Personal Allowance", tax.personal_allowance),
        SummaryRow::new("Taxable Salary", tax.taxable_salary()),
        SummaryRow::new("Taxable Savings", tax.taxable_savings()),
        SummaryRow::new("Taxable Dividends", tax.taxable_dividends()),
    ];

    for (band, slice) in tax.salary_bands.tiers() {
        if slice.amount > Decimal::ZERO {
            rows.push(SummaryRow::new(
                format!("  {} rate @ {}", band, format_rate(slice.rate)),
                slice.tax,
            ));
        }
    }
    rows.push(SummaryRow::new("Income Tax on Salary", tax.salary_tax));
    rows.push(SummaryRow::new("Income Tax on Savings", tax.savings_tax));
    rows.push(SummaryRow::new("Income Tax on Dividends", tax.dividend_tax));
    rows.push(SummaryRow::new("Total Income Tax", tax.total_tax));
    rows.push(SummaryRow::new(
        format!("National Insurance ({})", inputs.employment_type),
        result.national_insurance,
    ));
    if result.voluntary_ni_cost > Decimal::ZERO {
        rows.push(SummaryRow::new("Voluntary Class 2 NI", result.voluntary_ni_cost));
    }
    if tax.pension_contribution > Decimal::ZERO {
        rows.push(SummaryRow::new(
            format!("Pension Tax Relief ({})", tax.pension_type),
            tax.pension_tax_relief,
        ));
    }
    rows.push(SummaryRow::new("Total Deductions", result.total_deductions));
    if result.capital_gains.gains > Decimal::ZERO {
        rows.push(SummaryRow::new("Capital Gains Tax", result.capital_gains.tax));
        rows.push(SummaryRow::new(
            "Total Tax Liability (incl. CGT)",
            result.total_tax_liability(),
        ));
    }
    rows.push(SummaryRow::new("Annual Take-Home", result.take_home));
    rows.push(SummaryRow::new("Monthly Take-Home", result.monthly_take_home));
    rows
}

fn print_summary(inputs: &TaxInputs, result: &CalculationResult) {
    println!();
    println!(
        "TAKE-HOME SUMMARY ({}) - {} rate taxpayer",
        result.tax_year,
        result.income_tax.marginal_band.display().to_lowercase()
    );
    println!();

    let table = Table::new(summary_rows(inputs, result))
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    if let Some(status) = result.class2_status {
        println!();
        println!("Class 2 NI: {}", status.status);
        if status.offers_voluntary && result.voluntary_ni_cost == Decimal::ZERO {
            println!(
                "  Voluntary contributions available for {} (--voluntary-ni)",
                format_gbp(status.cost)
            );
        }
    }

    for warning in &result.warnings {
        println!("Warning: {}", warning);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rows_for_basic_rate_employee() {
        let inputs = TaxInputs {
            salary: dec!(45000),
            savings_interest: dec!(2000),
            dividend_income: dec!(1000),
            ..Default::default()
        };
        let result = compute_tax_summary(&inputs);
        let rows = summary_rows(&inputs, &result);

        let find = |item: &str| {
            rows.iter()
                .find(|r| r.item == item)
                .map(|r| r.amount.as_str())
        };
        assert_eq!(find("Total Income"), Some("£48,000.00"));
        assert_eq!(find("  Basic rate @ 20%"), Some("£6,486.00"));
        assert_eq!(find("National Insurance (Employee)"), Some("£2,594.40"));
        assert_eq!(find("Voluntary Class 2 NI"), None);
        assert_eq!(find("Capital Gains Tax"), None);
        assert_eq!(rows.last().map(|r| r.item.as_str()), Some("Monthly Take-Home"));
    }
}
