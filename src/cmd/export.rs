//! Export command - CSV and printable HTML tax statements
//!
//! The HTML statement is a self-contained page with embedded CSS.

use crate::cmd::InputArgs;
use crate::engine::{
    compute_tax_summary_with, explain_result, CalculationResult, CalculationStep, TaxInputs,
    TaxYear,
};
use crate::money::format_gbp;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Statement format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Output file path (default: stdout for CSV, opens in browser for HTML)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open the browser print dialog when the HTML statement loads
    #[arg(long)]
    print: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    /// Two-column CSV statement
    #[default]
    Csv,
    /// Printable HTML statement
    Html,
}

impl ExportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let inputs = self.input.read_inputs()?;
        let rates = self.input.read_rates()?;
        let result = compute_tax_summary_with(&inputs, &rates);

        match self.format {
            ExportFormat::Csv => self.export_csv(&inputs, &result),
            ExportFormat::Html => self.export_html(&inputs, &result),
        }
    }

    fn export_csv(&self, inputs: &TaxInputs, result: &CalculationResult) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_csv(inputs, result, file)?;
                println!("CSV statement written to: {}", path.display());
            }
            None => write_csv(inputs, result, io::stdout())?,
        }
        Ok(())
    }

    fn export_html(&self, inputs: &TaxInputs, result: &CalculationResult) -> anyhow::Result<()> {
        let steps = explain_result(inputs, result);
        let generated = Local::now().date_naive();
        if TaxYear::from_date(generated) != result.tax_year {
            log::info!(
                "Statement for {} generated during tax year {}",
                result.tax_year,
                TaxYear::from_date(generated)
            );
        }
        let html = generate_html(inputs, result, &steps, generated, self.print)?;

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            println!("HTML statement written to: {}", output_path.display());
        } else {
            let file_name = format!("uk-tax-statement-{}.html", generated.format("%Y-%m-%d"));
            let temp_path = std::env::temp_dir().join(file_name);
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML statement in browser: {}", temp_path.display());
        }
        Ok(())
    }
}

/// Statement rows: single-cell section headings, blank separators and
/// (label, value) pairs.
pub fn statement_rows(inputs: &TaxInputs, result: &CalculationResult) -> Vec<Vec<String>> {
    let tax = &result.income_tax;
    let pair = |label: &str, amount: Decimal| vec![label.to_string(), format_gbp(amount)];
    let heading = |label: &str| vec![label.to_string()];
    let blank = || vec![String::new()];

    let mut rows = vec![
        heading(&format!(
            "UK Tax Calculator {} - Tax Statement",
            result.tax_year
        )),
        blank(),
        heading("Input Summary"),
        pair("Annual Salary", inputs.salary),
        pair("Savings Interest", inputs.savings_interest),
        pair("Dividend Income", inputs.dividend_income),
    ];
    if inputs.pension_contribution > Decimal::ZERO {
        rows.push(vec![
            format!("Pension Contribution ({})", inputs.pension_type),
            format_gbp(inputs.pension_contribution),
        ]);
    }
    if inputs.capital_gains > Decimal::ZERO {
        rows.push(pair("Capital Gains", inputs.capital_gains));
    }
    rows.extend([
        vec![
            "Employment Type".to_string(),
            inputs.employment_type.to_string(),
        ],
        blank(),
        heading("Tax Breakdown"),
        pair("Total Income", result.total_income),
        pair("Personal Allowance", tax.personal_allowance),
        blank(),
        heading("Taxable Income"),
        pair("Taxable Salary", tax.taxable_salary()),
        pair("Taxable Savings", tax.taxable_savings()),
        pair("Taxable Dividends", tax.taxable_dividends()),
        blank(),
        heading("Tax & National Insurance"),
        pair("Income Tax on Salary", tax.salary_tax),
        pair("Income Tax on Savings", tax.savings_tax),
        pair("Income Tax on Dividends", tax.dividend_tax),
        pair("Total Income Tax", tax.total_tax),
        pair("National Insurance", result.national_insurance),
    ]);
    if result.voluntary_ni_cost > Decimal::ZERO {
        rows.push(pair("Voluntary Class 2 NI", result.voluntary_ni_cost));
    }
    if tax.pension_tax_relief != Decimal::ZERO {
        rows.push(pair("Pension Tax Relief", tax.pension_tax_relief));
    }
    rows.push(pair("Total Deductions", result.total_deductions));
    if result.capital_gains.gains > Decimal::ZERO {
        rows.push(pair("Capital Gains Tax", result.capital_gains.tax));
    }
    rows.extend([
        blank(),
        heading("Take-Home Pay"),
        pair("Annual Take-Home", result.take_home),
        pair("Monthly Take-Home", result.monthly_take_home),
    ]);
    rows
}

pub fn write_csv<W: Write>(
    inputs: &TaxInputs,
    result: &CalculationResult,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in statement_rows(inputs, result) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Short reference identifying the inputs a statement was produced from
pub fn statement_reference(inputs: &TaxInputs) -> anyhow::Result<String> {
    let canonical = serde_json::to_vec(inputs)?;
    let digest = Sha256::digest(&canonical);
    let mut reference = hex::encode(digest);
    reference.truncate(12);
    Ok(reference)
}

/// Generate the HTML statement
pub fn generate_html(
    inputs: &TaxInputs,
    result: &CalculationResult,
    steps: &[CalculationStep],
    generated: NaiveDate,
    print: bool,
) -> anyhow::Result<String> {
    let reference = statement_reference(inputs)?;
    let tax = &result.income_tax;
    let period = match (result.tax_year.start_date(), result.tax_year.end_date()) {
        (Some(start), Some(end)) => format!(
            "{} to {}",
            start.format("%-d %B %Y"),
            end.format("%-d %B %Y")
        ),
        _ => result.tax_year.display(),
    };

    let mut input_rows = vec![
        ("Annual Salary".to_string(), format_gbp(inputs.salary)),
        ("Savings Interest".to_string(), format_gbp(inputs.savings_interest)),
        ("Dividend Income".to_string(), format_gbp(inputs.dividend_income)),
    ];
    if inputs.pension_contribution > Decimal::ZERO {
        input_rows.push((
            format!("Pension Contribution ({})", inputs.pension_type),
            format_gbp(inputs.pension_contribution),
        ));
    }
    if inputs.capital_gains > Decimal::ZERO {
        input_rows.push(("Capital Gains".to_string(), format_gbp(inputs.capital_gains)));
    }
    input_rows.push((
        "Employment Type".to_string(),
        inputs.employment_type.to_string(),
    ));

    let mut breakdown = vec![
        ("Total Income", result.total_income, ""),
        ("Personal Allowance", tax.personal_allowance, "spacer"),
        ("Taxable Salary", tax.taxable_salary(), ""),
        ("Income Tax on Salary", tax.salary_tax, "spacer"),
        ("Taxable Savings", tax.taxable_savings(), ""),
        ("Income Tax on Savings", tax.savings_tax, "spacer"),
        ("Taxable Dividends", tax.taxable_dividends(), ""),
        ("Income Tax on Dividends", tax.dividend_tax, "spacer"),
        ("Total Income Tax", tax.total_tax, ""),
        ("National Insurance", result.national_insurance, ""),
    ];
    if result.voluntary_ni_cost > Decimal::ZERO {
        breakdown.push(("Voluntary Class 2 NI", result.voluntary_ni_cost, ""));
    }
    if tax.pension_tax_relief != Decimal::ZERO {
        breakdown.push(("Pension Tax Relief", tax.pension_tax_relief, ""));
    }
    breakdown.push(("Total Deductions", result.total_deductions, "total"));
    if result.capital_gains.gains > Decimal::ZERO {
        breakdown.push(("Capital Gains Tax", result.capital_gains.tax, "spacer"));
    }

    let input_html: String = input_rows
        .iter()
        .map(|(label, value)| row_html(label, value, ""))
        .collect();
    let breakdown_html: String = breakdown
        .iter()
        .map(|(label, amount, class)| row_html(label, &format_gbp(*amount), class))
        .collect();
    let steps_html: String = steps
        .iter()
        .map(|step| {
            format!(
                r#"            <li><div class="step-head"><span>{}</span><span class="value">{}</span></div><p>{}</p></li>
"#,
                escape(&step.title),
                escape(&step.value),
                escape(&step.description)
            )
        })
        .collect();
    let warnings_html: String = result
        .warnings
        .iter()
        .map(|w| format!("        <p class=\"warning\">{}</p>\n", escape(&w.message())))
        .collect();
    let print_script = if print {
        "    <script>window.addEventListener('load', () => window.print());</script>\n"
    } else {
        ""
    };

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>UK Tax Statement {tax_year}</title>
    <style>
{css}
    </style>
</head>
<body>
    <main>
        <h1>UK Tax Statement {tax_year}</h1>
        <p class="meta">Tax year {period}</p>
        <p class="meta">Generated: {generated} &middot; Reference: {reference}</p>
{warnings}
        <section>
            <h2>Input Summary</h2>
            <table>
{inputs}            </table>
        </section>

        <section class="take-home">
            <div><span>Annual Take-Home Pay</span><span>{take_home}</span></div>
            <div><span>Monthly Take-Home Pay</span><span>{monthly}</span></div>
        </section>

        <section>
            <h2>Detailed Tax Breakdown</h2>
            <table>
{breakdown}            </table>
        </section>

        <section>
            <h2>Calculation Steps</h2>
            <ol class="steps">
{steps}            </ol>
        </section>
    </main>
{print_script}</body>
</html>
"##,
        tax_year = result.tax_year,
        css = CSS,
        period = period,
        generated = generated.format("%d/%m/%Y"),
        reference = reference,
        warnings = warnings_html,
        inputs = input_html,
        take_home = format_gbp(result.take_home),
        monthly = format_gbp(result.monthly_take_home),
        breakdown = breakdown_html,
        steps = steps_html,
        print_script = print_script,
    ))
}

fn row_html(label: &str, value: &str, class: &str) -> String {
    let class_attr = if class.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", class)
    };
    format!(
        "                <tr{}><td>{}</td><td class=\"number\">{}</td></tr>\n",
        class_attr,
        escape(label),
        escape(value)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CSS: &str = r#"
:root {
    --navy: #0f172a;
    --gray-100: #f3f4f6;
    --gray-200: #e5e7eb;
    --gray-500: #6b7280;
    --gray-900: #111827;
    --warning: #b45309;
    --warning-bg: #fef3c7;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
    color: var(--gray-900);
    line-height: 1.5;
    background: white;
}

main {
    max-width: 760px;
    margin: 0 auto;
    padding: 2rem;
}

h1 {
    font-size: 1.75rem;
    text-align: center;
}

h2 {
    font-size: 1.1rem;
    margin-bottom: 0.5rem;
    border-bottom: 1px solid var(--gray-200);
    padding-bottom: 0.25rem;
}

section {
    margin-top: 1.5rem;
}

.meta {
    text-align: center;
    color: var(--gray-500);
    font-size: 0.85rem;
}

table {
    width: 100%;
    border-collapse: collapse;
}

td {
    padding: 0.3rem 0;
}

td.number, .value {
    text-align: right;
    font-variant-numeric: tabular-nums;
}

tr.spacer td {
    padding-bottom: 0.9rem;
}

tr.total td {
    font-weight: 600;
    border-top: 1px solid var(--gray-900);
}

.take-home {
    background: var(--navy);
    color: white;
    padding: 1rem 1.25rem;
    border-radius: 6px;
    font-weight: 600;
}

.take-home div {
    display: flex;
    justify-content: space-between;
}

.warning {
    margin-top: 1rem;
    padding: 0.5rem 0.75rem;
    color: var(--warning);
    background: var(--warning-bg);
    border-radius: 4px;
}

.steps {
    padding-left: 1.25rem;
}

.steps li {
    margin-bottom: 0.6rem;
}

.step-head {
    display: flex;
    justify-content: space-between;
    font-weight: 600;
}

.steps p {
    color: var(--gray-500);
    font-size: 0.85rem;
}

@media print {
    main {
        padding: 0;
    }
    .take-home {
        -webkit-print-color-adjust: exact;
        print-color-adjust: exact;
    }
    section {
        break-inside: avoid;
    }
}
"#;
