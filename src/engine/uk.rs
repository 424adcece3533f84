use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Tax band for income tax calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TaxBand {
    #[default]
    Basic,
    Higher,
    Additional,
}

impl TaxBand {
    pub fn display(&self) -> &'static str {
        match self {
            TaxBand::Basic => "Basic",
            TaxBand::Higher => "Higher",
            TaxBand::Additional => "Additional",
        }
    }
}

impl std::fmt::Display for TaxBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the end year (e.g., 2027 = 2026/27 tax year)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        // 6 April onwards belongs to the tax year ending next April
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(date.year() + 1)
        } else {
            TaxYear(date.year())
        }
    }

    /// Start date of the tax year (6 April of previous year)
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 - 1, 4, 6)
    }

    /// End date of the tax year (5 April)
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 5)
    }

    /// Display as "2026/27" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0 - 1, self.0 % 100)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Rates applied to the basic, higher and additional tiers of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandRates {
    pub basic: Decimal,
    pub higher: Decimal,
    pub additional: Decimal,
}

impl BandRates {
    pub fn rate(&self, band: TaxBand) -> Decimal {
        match band {
            TaxBand::Basic => self.basic,
            TaxBand::Higher => self.higher,
            TaxBand::Additional => self.additional,
        }
    }
}

/// Statutory thresholds and rates for one tax year.
///
/// Defaults hold the 2026/27 figures. When loaded from JSON any subset of
/// fields may be given; the rest keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Rates {
    pub tax_year: TaxYear,

    /// Standard personal allowance before tapering
    #[schemars(with = "f64")]
    pub personal_allowance: Decimal,
    /// Income above which the allowance is reduced by £1 for every £2
    #[schemars(with = "f64")]
    pub allowance_taper_threshold: Decimal,
    /// Top of the basic rate band, in gross income
    #[schemars(with = "f64")]
    pub basic_rate_limit: Decimal,
    /// Start of the additional rate band
    #[schemars(with = "f64")]
    pub higher_rate_limit: Decimal,

    #[schemars(with = "f64")]
    pub basic_rate: Decimal,
    #[schemars(with = "f64")]
    pub higher_rate: Decimal,
    #[schemars(with = "f64")]
    pub additional_rate: Decimal,

    #[schemars(with = "f64")]
    pub dividend_basic_rate: Decimal,
    #[schemars(with = "f64")]
    pub dividend_higher_rate: Decimal,
    #[schemars(with = "f64")]
    pub dividend_additional_rate: Decimal,

    /// 0% starting rate band for savings, reduced by taxable non-savings income
    #[schemars(with = "f64")]
    pub starting_rate_for_savings: Decimal,
    /// Personal Savings Allowance for basic rate taxpayers
    #[schemars(with = "f64")]
    pub savings_allowance_basic: Decimal,
    /// Personal Savings Allowance for higher rate taxpayers
    #[schemars(with = "f64")]
    pub savings_allowance_higher: Decimal,
    #[schemars(with = "f64")]
    pub dividend_allowance: Decimal,

    /// Primary threshold for employee NI and lower profits limit for Class 4
    #[schemars(with = "f64")]
    pub ni_primary_threshold: Decimal,
    /// Upper earnings limit / upper profits limit
    #[schemars(with = "f64")]
    pub ni_upper_limit: Decimal,
    #[schemars(with = "f64")]
    pub employee_main_rate: Decimal,
    #[schemars(with = "f64")]
    pub employee_upper_rate: Decimal,
    #[schemars(with = "f64")]
    pub class4_main_rate: Decimal,
    #[schemars(with = "f64")]
    pub class4_upper_rate: Decimal,
    /// Secondary threshold for employer NI
    #[schemars(with = "f64")]
    pub employer_threshold: Decimal,
    #[schemars(with = "f64")]
    pub employer_rate: Decimal,

    #[schemars(with = "f64")]
    pub class2_small_profits_threshold: Decimal,
    /// Annual cost of voluntary Class 2 contributions
    #[schemars(with = "f64")]
    pub class2_voluntary_cost: Decimal,

    #[schemars(with = "f64")]
    pub cgt_exempt_amount: Decimal,
    #[schemars(with = "f64")]
    pub cgt_basic_rate: Decimal,
    #[schemars(with = "f64")]
    pub cgt_higher_rate: Decimal,

    /// Basic rate relief added at source to relief-at-source pension contributions
    #[schemars(with = "f64")]
    pub relief_at_source_rate: Decimal,
}

impl Default for Rates {
    fn default() -> Self {
        Rates {
            tax_year: TaxYear(2027),
            personal_allowance: dec!(12570),
            allowance_taper_threshold: dec!(100000),
            basic_rate_limit: dec!(50270),
            higher_rate_limit: dec!(125140),
            basic_rate: dec!(0.20),
            higher_rate: dec!(0.40),
            additional_rate: dec!(0.45),
            dividend_basic_rate: dec!(0.1075),
            dividend_higher_rate: dec!(0.3575),
            dividend_additional_rate: dec!(0.3935),
            starting_rate_for_savings: dec!(5000),
            savings_allowance_basic: dec!(1000),
            savings_allowance_higher: dec!(500),
            dividend_allowance: dec!(500),
            ni_primary_threshold: dec!(12570),
            ni_upper_limit: dec!(50270),
            employee_main_rate: dec!(0.08),
            employee_upper_rate: dec!(0.02),
            class4_main_rate: dec!(0.06),
            class4_upper_rate: dec!(0.02),
            employer_threshold: dec!(5000),
            employer_rate: dec!(0.15),
            class2_small_profits_threshold: dec!(7105),
            class2_voluntary_cost: dec!(189.80),
            cgt_exempt_amount: dec!(3000),
            cgt_basic_rate: dec!(0.18),
            cgt_higher_rate: dec!(0.24),
            relief_at_source_rate: dec!(0.20),
        }
    }
}

impl Rates {
    /// Read rate overrides from JSON
    pub fn read_json<R: Read>(reader: R) -> Result<Rates, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Rates for salary and savings income
    pub fn income_rates(&self) -> BandRates {
        BandRates {
            basic: self.basic_rate,
            higher: self.higher_rate,
            additional: self.additional_rate,
        }
    }

    /// Rates for dividend income
    pub fn dividend_rates(&self) -> BandRates {
        BandRates {
            basic: self.dividend_basic_rate,
            higher: self.dividend_higher_rate,
            additional: self.dividend_additional_rate,
        }
    }

    /// Gross a relief-at-source contribution up by the basic rate relief.
    /// A relief rate of 100% cannot be grossed up and leaves the contribution as paid.
    pub fn gross_up(&self, net_contribution: Decimal) -> Decimal {
        net_contribution
            .checked_div(Decimal::ONE - self.relief_at_source_rate)
            .unwrap_or_else(|| {
                log::warn!(
                    "Relief at source rate {} cannot be applied, using contribution as paid",
                    self.relief_at_source_rate
                );
                net_contribution
            })
    }
}
