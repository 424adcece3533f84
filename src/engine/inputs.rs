use super::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// How the income is earned, which selects the National Insurance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    #[serde(alias = "Employee")]
    Employee,
    #[serde(alias = "Self-Employed", alias = "SelfEmployed")]
    SelfEmployed,
    #[serde(alias = "Employer")]
    Employer,
}

impl EmploymentType {
    pub fn display(&self) -> &'static str {
        match self {
            EmploymentType::Employee => "Employee",
            EmploymentType::SelfEmployed => "Self-Employed",
            EmploymentType::Employer => "Employer",
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Pension contribution tax relief mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PensionType {
    /// Contribution deducted from salary before tax and NI
    #[default]
    #[serde(alias = "Net Pay", alias = "NetPay")]
    NetPay,
    /// Contribution paid net of basic rate relief; the basic rate band is extended
    #[serde(alias = "Relief at Source", alias = "ReliefAtSource")]
    ReliefAtSource,
}

impl PensionType {
    pub fn display(&self) -> &'static str {
        match self {
            PensionType::NetPay => "Net Pay",
            PensionType::ReliefAtSource => "Relief at Source",
        }
    }
}

impl std::fmt::Display for PensionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Largest figure accepted for any input amount
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Input figures for a single take-home calculation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TaxInputs {
    /// Annual salary, or trading profit when self-employed
    #[schemars(with = "f64")]
    pub salary: Decimal,
    /// Annual savings interest
    #[schemars(with = "f64")]
    pub savings_interest: Decimal,
    /// Annual dividend income
    #[schemars(with = "f64")]
    pub dividend_income: Decimal,
    /// Realised capital gains for the year
    #[schemars(with = "f64")]
    pub capital_gains: Decimal,
    pub employment_type: EmploymentType,
    /// Annual pension contribution (the amount actually paid)
    #[schemars(with = "f64")]
    pub pension_contribution: Decimal,
    pub pension_type: PensionType,
    /// Pay voluntary Class 2 NI when no credit would otherwise be earned
    pub pay_voluntary_ni: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("{field} exceeds the maximum of {} (got {value})", MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, value: Decimal },
    #[error("net pay pension contribution {contribution} exceeds salary {salary}")]
    ContributionExceedsSalary {
        contribution: Decimal,
        salary: Decimal,
    },
}

impl TaxInputs {
    /// Read inputs from JSON
    pub fn read_json<R: Read>(reader: R) -> Result<TaxInputs, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    fn amounts(&self) -> [(&'static str, Decimal); 5] {
        [
            ("salary", self.salary),
            ("savings_interest", self.savings_interest),
            ("dividend_income", self.dividend_income),
            ("capital_gains", self.capital_gains),
            ("pension_contribution", self.pension_contribution),
        ]
    }

    /// Reject inputs the engine would otherwise have to clamp
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some((field, value)) = self
            .amounts()
            .into_iter()
            .find(|(_, v)| *v < Decimal::ZERO)
        {
            return Err(InputError::NegativeAmount { field, value });
        }
        if let Some((field, value)) = self
            .amounts()
            .into_iter()
            .find(|(_, v)| *v > MAX_AMOUNT)
        {
            return Err(InputError::AmountTooLarge { field, value });
        }
        if self.pension_type == PensionType::NetPay && self.pension_contribution > self.salary {
            return Err(InputError::ContributionExceedsSalary {
                contribution: self.pension_contribution,
                salary: self.salary,
            });
        }
        Ok(())
    }

    /// Copy of the inputs with out-of-domain amounts clamped, plus a warning per clamp.
    pub(crate) fn sanitized(&self) -> (TaxInputs, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut clamp = |field: &'static str, value: Decimal| {
            if value < Decimal::ZERO {
                log::warn!("{} is negative ({}), treating as zero", field, value);
                warnings.push(Warning::NegativeAmountClamped {
                    field: field.to_string(),
                    value,
                });
                Decimal::ZERO
            } else if value > MAX_AMOUNT {
                log::warn!("{} of {} is above the maximum, capping", field, value);
                warnings.push(Warning::AmountCapped {
                    field: field.to_string(),
                    requested: value,
                    applied: MAX_AMOUNT,
                });
                MAX_AMOUNT
            } else {
                value
            }
        };

        let mut inputs = TaxInputs {
            salary: clamp("salary", self.salary),
            savings_interest: clamp("savings_interest", self.savings_interest),
            dividend_income: clamp("dividend_income", self.dividend_income),
            capital_gains: clamp("capital_gains", self.capital_gains),
            pension_contribution: clamp("pension_contribution", self.pension_contribution),
            ..self.clone()
        };

        if inputs.pension_type == PensionType::NetPay && inputs.pension_contribution > inputs.salary {
            log::warn!(
                "Net pay contribution {} exceeds salary {}, capping",
                inputs.pension_contribution,
                inputs.salary
            );
            warnings.push(Warning::ContributionCapped {
                requested: inputs.pension_contribution,
                applied: inputs.salary,
            });
            inputs.pension_contribution = inputs.salary;
        }

        (inputs, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_fields_default_to_zero() {
        let inputs = TaxInputs::read_json(r#"{ "salary": 45000 }"#.as_bytes()).unwrap();
        assert_eq!(inputs.salary, dec!(45000));
        assert_eq!(inputs.savings_interest, Decimal::ZERO);
        assert_eq!(inputs.employment_type, EmploymentType::Employee);
        assert_eq!(inputs.pension_type, PensionType::NetPay);
        assert!(!inputs.pay_voluntary_ni);
    }

    #[test]
    fn enums_accept_display_names() {
        let json = r#"{ "employment_type": "Self-Employed", "pension_type": "Relief at Source" }"#;
        let inputs = TaxInputs::read_json(json.as_bytes()).unwrap();
        assert_eq!(inputs.employment_type, EmploymentType::SelfEmployed);
        assert_eq!(inputs.pension_type, PensionType::ReliefAtSource);

        let json = r#"{ "employment_type": "self-employed", "pension_type": "net-pay" }"#;
        let inputs = TaxInputs::read_json(json.as_bytes()).unwrap();
        assert_eq!(inputs.employment_type, EmploymentType::SelfEmployed);
        assert_eq!(inputs.pension_type, PensionType::NetPay);
    }

    #[test]
    fn unknown_employment_type_rejected() {
        let json = r#"{ "employment_type": "Contractor" }"#;
        assert!(TaxInputs::read_json(json.as_bytes()).is_err());
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let inputs = TaxInputs {
            dividend_income: dec!(-1),
            ..Default::default()
        };
        assert_eq!(
            inputs.validate(),
            Err(InputError::NegativeAmount {
                field: "dividend_income",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn validate_rejects_net_pay_contribution_above_salary() {
        let inputs = TaxInputs {
            salary: dec!(10000),
            pension_contribution: dec!(12000),
            ..Default::default()
        };
        assert!(matches!(
            inputs.validate(),
            Err(InputError::ContributionExceedsSalary { .. })
        ));

        // Relief at source contributions are not limited by salary here
        let inputs = TaxInputs {
            pension_type: PensionType::ReliefAtSource,
            ..inputs
        };
        assert_eq!(inputs.validate(), Ok(()));
    }

    #[test]
    fn sanitized_clamps_and_warns() {
        let inputs = TaxInputs {
            salary: dec!(5000),
            savings_interest: dec!(-200),
            pension_contribution: dec!(6000),
            ..Default::default()
        };
        let (clean, warnings) = inputs.sanitized();
        assert_eq!(clean.savings_interest, Decimal::ZERO);
        assert_eq!(clean.pension_contribution, dec!(5000));
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn oversized_amounts_rejected_and_capped() {
        let huge = dec!(50000000000000000000000000000);
        let inputs = TaxInputs {
            salary: huge,
            savings_interest: huge,
            ..Default::default()
        };
        assert_eq!(
            inputs.validate(),
            Err(InputError::AmountTooLarge {
                field: "salary",
                value: huge
            })
        );

        let (clean, warnings) = inputs.sanitized();
        assert_eq!(clean.salary, MAX_AMOUNT);
        assert_eq!(clean.savings_interest, MAX_AMOUNT);
        assert_eq!(
            warnings[1],
            Warning::AmountCapped {
                field: "savings_interest".to_string(),
                requested: huge,
                applied: MAX_AMOUNT
            }
        );

        let at_limit = TaxInputs {
            salary: MAX_AMOUNT,
            ..Default::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
    }
}
