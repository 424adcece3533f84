//! Explain command - the calculation as ordered steps

use crate::cmd::InputArgs;
use crate::engine::{compute_tax_summary_with, explain_calculation, explain_result, Rates};
use clap::Args;

#[derive(Args, Debug)]
pub struct ExplainCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl ExplainCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let inputs = self.input.read_inputs()?;
        let (tax_year, steps) = match self.input.read_custom_rates()? {
            Some(rates) => {
                let result = compute_tax_summary_with(&inputs, &rates);
                (result.tax_year, explain_result(&inputs, &result))
            }
            None => (Rates::default().tax_year, explain_calculation(&inputs)),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&steps)?);
            return Ok(());
        }

        println!();
        println!("CALCULATION STEPS ({})", tax_year);
        println!();
        for (i, step) in steps.iter().enumerate() {
            println!("{:>2}. {:<40} {:>16}", i + 1, step.title, step.value);
            println!("    {}", step.description);
        }
        println!();
        Ok(())
    }
}
