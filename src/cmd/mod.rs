pub mod batch;
pub mod explain;
pub mod export;
pub mod schema;
pub mod summary;

use crate::engine::{EmploymentType, PensionType, Rates, TaxInputs};
use anyhow::Context;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Inputs shared by every calculating command
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// JSON file containing inputs (or "-" for stdin)
    #[arg(short, long)]
    inputs: Option<PathBuf>,

    /// Annual salary, or trading profit when self-employed
    #[arg(long)]
    salary: Option<Decimal>,

    /// Annual savings interest
    #[arg(long)]
    savings: Option<Decimal>,

    /// Annual dividend income
    #[arg(long)]
    dividends: Option<Decimal>,

    /// Realised capital gains
    #[arg(long)]
    gains: Option<Decimal>,

    /// Employment type
    #[arg(short, long, value_enum)]
    employment: Option<EmploymentArg>,

    /// Annual pension contribution
    #[arg(short, long)]
    pension: Option<Decimal>,

    /// How pension tax relief is given
    #[arg(long, value_enum)]
    pension_type: Option<PensionTypeArg>,

    /// Pay voluntary Class 2 NI when no credit is earned
    #[arg(long)]
    voluntary_ni: bool,

    /// JSON file overriding the 2026/27 rates and thresholds
    #[arg(long)]
    rates: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EmploymentArg {
    Employee,
    SelfEmployed,
    Employer,
}

impl From<EmploymentArg> for EmploymentType {
    fn from(arg: EmploymentArg) -> Self {
        match arg {
            EmploymentArg::Employee => EmploymentType::Employee,
            EmploymentArg::SelfEmployed => EmploymentType::SelfEmployed,
            EmploymentArg::Employer => EmploymentType::Employer,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PensionTypeArg {
    NetPay,
    ReliefAtSource,
}

impl From<PensionTypeArg> for PensionType {
    fn from(arg: PensionTypeArg) -> Self {
        match arg {
            PensionTypeArg::NetPay => PensionType::NetPay,
            PensionTypeArg::ReliefAtSource => PensionType::ReliefAtSource,
        }
    }
}

impl InputArgs {
    /// Read the inputs file (if any), apply flag overrides and validate
    pub fn read_inputs(&self) -> anyhow::Result<TaxInputs> {
        let base = match &self.inputs {
            Some(path) => read_inputs(path)?,
            None => TaxInputs::default(),
        };
        let inputs = self.apply(base);
        inputs.validate()?;
        log::debug!("Inputs: {:?}", inputs);
        Ok(inputs)
    }

    fn apply(&self, mut inputs: TaxInputs) -> TaxInputs {
        if let Some(salary) = self.salary {
            inputs.salary = salary;
        }
        if let Some(savings) = self.savings {
            inputs.savings_interest = savings;
        }
        if let Some(dividends) = self.dividends {
            inputs.dividend_income = dividends;
        }
        if let Some(gains) = self.gains {
            inputs.capital_gains = gains;
        }
        if let Some(employment) = self.employment {
            inputs.employment_type = employment.into();
        }
        if let Some(pension) = self.pension {
            inputs.pension_contribution = pension;
        }
        if let Some(pension_type) = self.pension_type {
            inputs.pension_type = pension_type.into();
        }
        if self.voluntary_ni {
            inputs.pay_voluntary_ni = true;
        }
        inputs
    }

    pub fn read_rates(&self) -> anyhow::Result<Rates> {
        read_rates(self.rates.as_deref())
    }

    /// Rates from `--rates`, or `None` to use the 2026/27 defaults
    pub fn read_custom_rates(&self) -> anyhow::Result<Option<Rates>> {
        self.rates
            .as_deref()
            .map(|path| read_rates(Some(path)))
            .transpose()
    }
}

/// Read rates from a JSON file, or the 2026/27 defaults without one
pub fn read_rates(path: Option<&Path>) -> anyhow::Result<Rates> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open rates file {}", path.display()))?;
            let rates = Rates::read_json(BufReader::new(file))
                .with_context(|| format!("Invalid rates file {}", path.display()))?;
            Ok(rates)
        }
        None => Ok(Rates::default()),
    }
}

/// Read inputs JSON from a file (or stdin with "-")
fn read_inputs(path: &Path) -> anyhow::Result<TaxInputs> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open inputs file {}", path.display()))?;
        let inputs = TaxInputs::read_json(BufReader::new(file))
            .with_context(|| format!("Invalid inputs file {}", path.display()))?;
        Ok(inputs)
    }
}

fn read_from_stdin() -> anyhow::Result<TaxInputs> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let inputs = TaxInputs::read_json(io::Cursor::new(buffer)).context("Invalid inputs on stdin")?;
    Ok(inputs)
}
