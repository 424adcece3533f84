//! Schema command - print expected input formats

use crate::cmd::batch::BatchRecord;
use crate::engine::{Rates, TaxInputs};
use clap::Args;
use schemars::schema_for;

/// A column of the batch CSV format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the inputs file
    JsonSchema,
    /// JSON Schema for the rates file
    RatesSchema,
    /// Batch CSV header row
    CsvHeader,
    /// Batch CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(TaxInputs);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::RatesSchema => {
                let schema = schema_for!(Rates);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn csv_header() -> String {
    BatchRecord::csv_schema()
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_csv_fields() {
    println!("Batch CSV Format");
    println!("================");
    println!();
    for field in BatchRecord::csv_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:22} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("employment_type: employee, self-employed or employer");
    println!("pension_type: net-pay or relief-at-source");
}
