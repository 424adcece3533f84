use super::inputs::EmploymentType;
use super::uk::Rates;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// National Insurance liability with the slices it was charged on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NiBreakdown {
    pub employment_type: EmploymentType,
    /// Earnings or profits NI is charged on (after net pay pension contributions)
    pub earnings: Decimal,
    /// Threshold below which nothing is due
    pub threshold: Decimal,
    pub main_slice: Decimal,
    pub main_rate: Decimal,
    pub upper_slice: Decimal,
    pub upper_rate: Decimal,
    pub amount: Decimal,
}

/// Employee (Class 1 primary), self-employed (Class 4) or employer
/// (Class 1 secondary) contributions on `earnings`.
pub fn national_insurance(
    earnings: Decimal,
    employment_type: EmploymentType,
    rates: &Rates,
) -> NiBreakdown {
    let (threshold, main_slice, main_rate, upper_slice, upper_rate) = match employment_type {
        EmploymentType::Employee | EmploymentType::SelfEmployed => {
            let (main_rate, upper_rate) = if employment_type == EmploymentType::Employee {
                (rates.employee_main_rate, rates.employee_upper_rate)
            } else {
                (rates.class4_main_rate, rates.class4_upper_rate)
            };
            let main = (earnings.min(rates.ni_upper_limit) - rates.ni_primary_threshold)
                .max(Decimal::ZERO);
            let upper = (earnings - rates.ni_upper_limit).max(Decimal::ZERO);
            (rates.ni_primary_threshold, main, main_rate, upper, upper_rate)
        }
        EmploymentType::Employer => {
            let main = (earnings - rates.employer_threshold).max(Decimal::ZERO);
            (rates.employer_threshold, main, rates.employer_rate, Decimal::ZERO, Decimal::ZERO)
        }
    };

    let amount = main_slice * main_rate + upper_slice * upper_rate;
    log::debug!(
        "NI ({}) on {}: {} @ {} + {} @ {} = {}",
        employment_type,
        earnings,
        main_slice,
        main_rate,
        upper_slice,
        upper_rate,
        amount
    );

    NiBreakdown {
        employment_type,
        earnings,
        threshold,
        main_slice,
        main_rate,
        upper_slice,
        upper_rate,
        amount,
    }
}

/// Class 2 credit position for a self-employed profit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Class2Credit {
    /// Profits above the lower profits limit
    Automatic,
    /// Profits between the small profits threshold and the lower profits limit
    Free,
    /// Profits below the small profits threshold
    None,
}

impl Class2Credit {
    pub fn status(&self) -> &'static str {
        match self {
            Class2Credit::Automatic => "Class 2 Credits granted automatically",
            Class2Credit::Free => "Treated as having paid Class 2 for free",
            Class2Credit::None => "No NI credit earned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Class2Status {
    pub credit: Class2Credit,
    pub status: &'static str,
    /// Whether voluntary contributions can be chosen
    pub offers_voluntary: bool,
    /// Cost of voluntary contributions, zero when not offered
    pub cost: Decimal,
}

pub fn class2_status(profit: Decimal, rates: &Rates) -> Class2Status {
    let credit = if profit > rates.ni_primary_threshold {
        Class2Credit::Automatic
    } else if profit >= rates.class2_small_profits_threshold {
        Class2Credit::Free
    } else {
        Class2Credit::None
    };
    let offers_voluntary = credit == Class2Credit::None;

    Class2Status {
        credit,
        status: credit.status(),
        offers_voluntary,
        cost: if offers_voluntary {
            rates.class2_voluntary_cost
        } else {
            Decimal::ZERO
        },
    }
}
