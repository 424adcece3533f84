pub mod allowance;
pub mod bands;
pub mod cgt;
pub mod explain;
pub mod income;
pub mod inputs;
pub mod ni;
pub mod pension;
pub mod summary;
pub mod uk;
pub mod warnings;

pub use explain::{explain_calculation, explain_result, CalculationStep};
pub use inputs::{EmploymentType, PensionType, TaxInputs};
pub use summary::{compute_tax_summary, compute_tax_summary_with, CalculationResult};
pub use uk::{Rates, TaxYear};
