use crate::money::format_gbp;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Domain warnings emitted alongside a calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Deductions exceed total income. Take-home is reported as-is, not clamped.
    NegativeTakeHome {
        #[schemars(with = "f64")]
        take_home: Decimal,
    },
    /// A negative input amount was treated as zero.
    NegativeAmountClamped {
        field: String,
        #[schemars(with = "f64")]
        value: Decimal,
    },
    /// An input amount above the accepted maximum was capped.
    AmountCapped {
        field: String,
        #[schemars(with = "f64")]
        requested: Decimal,
        #[schemars(with = "f64")]
        applied: Decimal,
    },
    /// A net pay pension contribution larger than salary was capped at salary.
    ContributionCapped {
        #[schemars(with = "f64")]
        requested: Decimal,
        #[schemars(with = "f64")]
        applied: Decimal,
    },
    /// Voluntary Class 2 NI was requested but is not available for these inputs.
    VoluntaryNiNotOffered,
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Warning::NegativeTakeHome { take_home } => {
                format!("Deductions exceed income: take-home is {}", format_gbp(*take_home))
            }
            Warning::NegativeAmountClamped { field, value } => {
                format!("{} was negative ({}) and has been treated as £0", field, format_gbp(*value))
            }
            Warning::AmountCapped {
                field,
                requested,
                applied,
            } => format!(
                "{} of {} is above the maximum and has been capped at {}",
                field,
                format_gbp(*requested),
                format_gbp(*applied)
            ),
            Warning::ContributionCapped { requested, applied } => format!(
                "Net pay pension contribution of {} exceeds salary, capped at {}",
                format_gbp(*requested),
                format_gbp(*applied)
            ),
            Warning::VoluntaryNiNotOffered => {
                "Voluntary Class 2 NI is only available to self-employed people with profits below the small profits threshold".to_string()
            }
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
