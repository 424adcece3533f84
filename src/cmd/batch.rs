//! Batch command - one calculation per CSV row

use crate::cmd::read_rates;
use crate::cmd::schema::CsvField;
use crate::engine::{compute_tax_summary_with, EmploymentType, PensionType, Rates, TaxInputs};
use crate::money::format_amount;
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use takehome_derive::CsvSchema;

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file with one set of inputs per row (see `schema csv-fields`)
    file: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file overriding the 2026/27 rates and thresholds
    #[arg(long)]
    rates: Option<PathBuf>,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rates = read_rates(self.rates.as_deref())?;
        let file = File::open(&self.file)
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        let records = read_records(file)?;
        log::debug!("Read {} batch rows from {}", records.len(), self.file.display());

        match &self.output {
            Some(path) => {
                let out = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_results(&records, &rates, out)?;
                println!("{} results written to: {}", records.len(), path.display());
            }
            None => write_results(&records, &rates, io::stdout())?,
        }
        Ok(())
    }
}

/// A row of the batch input CSV
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct BatchRecord {
    /// Label carried through to the output row
    id: Option<String>,
    /// Annual salary, or trading profit when self-employed
    salary: Decimal,
    /// Annual savings interest
    savings_interest: Option<Decimal>,
    /// Annual dividend income
    dividend_income: Option<Decimal>,
    /// Realised capital gains
    capital_gains: Option<Decimal>,
    /// employee, self-employed or employer (default employee)
    employment_type: Option<EmploymentType>,
    /// Annual pension contribution
    pension_contribution: Option<Decimal>,
    /// net-pay or relief-at-source (default net-pay)
    pension_type: Option<PensionType>,
    /// true to pay voluntary Class 2 NI when no credit is earned
    pay_voluntary_ni: Option<bool>,
}

impl From<&BatchRecord> for TaxInputs {
    fn from(record: &BatchRecord) -> Self {
        TaxInputs {
            salary: record.salary,
            savings_interest: record.savings_interest.unwrap_or_default(),
            dividend_income: record.dividend_income.unwrap_or_default(),
            capital_gains: record.capital_gains.unwrap_or_default(),
            employment_type: record.employment_type.unwrap_or_default(),
            pension_contribution: record.pension_contribution.unwrap_or_default(),
            pension_type: record.pension_type.unwrap_or_default(),
            pay_voluntary_ni: record.pay_voluntary_ni.unwrap_or_default(),
        }
    }
}

/// Read and validate every row. Errors name the CSV line (the header is line 1).
pub fn read_records<R: Read>(mut reader: R) -> anyhow::Result<Vec<(BatchRecord, TaxInputs)>> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("Failed to read batch CSV")?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    let headers = rdr.headers().context("Failed to read batch CSV header")?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.context("Failed to read batch CSV")?;
        let line = row.position().map_or(0, |pos| record_line(&input, pos));
        let record: BatchRecord = row
            .deserialize(Some(&headers))
            .with_context(|| format!("Invalid batch row at line {}", line))?;
        let inputs = TaxInputs::from(&record);
        inputs
            .validate()
            .with_context(|| format!("Invalid batch row at line {}", line))?;
        records.push((record, inputs));
    }
    Ok(records)
}

/// Line a record starts on. The reader skips blank lines, so any line breaks
/// between the end of the previous record and this one are counted too.
fn record_line(input: &str, pos: &csv::Position) -> u64 {
    let start = usize::try_from(pos.byte()).unwrap_or(input.len()).min(input.len());
    let rest = input.get(start..).unwrap_or_default();
    let skipped = rest.len() - rest.trim_start_matches(['\r', '\n']).len();
    let newlines = input.as_bytes()[..start + skipped]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    newlines as u64 + 1
}

/// A row of the batch output CSV
#[derive(Debug, Serialize)]
struct BatchResultRow {
    id: String,
    salary: String,
    total_income: String,
    personal_allowance: String,
    income_tax: String,
    national_insurance: String,
    voluntary_ni: String,
    pension_tax_relief: String,
    total_deductions: String,
    capital_gains_tax: String,
    take_home: String,
    monthly_take_home: String,
    warnings: String,
}

fn write_results<W: Write>(
    records: &[(BatchRecord, TaxInputs)],
    rates: &Rates,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, (record, inputs)) in records.iter().enumerate() {
        let result = compute_tax_summary_with(inputs, rates);
        let row = BatchResultRow {
            id: record.id.clone().unwrap_or_else(|| (i + 1).to_string()),
            salary: format_amount(inputs.salary),
            total_income: format_amount(result.total_income),
            personal_allowance: format_amount(result.income_tax.personal_allowance),
            income_tax: format_amount(result.income_tax.total_tax),
            national_insurance: format_amount(result.national_insurance),
            voluntary_ni: format_amount(result.voluntary_ni_cost),
            pension_tax_relief: format_amount(result.income_tax.pension_tax_relief),
            total_deductions: format_amount(result.total_deductions),
            capital_gains_tax: format_amount(result.capital_gains.tax),
            take_home: format_amount(result.take_home),
            monthly_take_home: format_amount(result.monthly_take_home),
            warnings: result
                .warnings
                .iter()
                .map(|w| w.message())
                .collect::<Vec<_>>()
                .join("; "),
        };
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
