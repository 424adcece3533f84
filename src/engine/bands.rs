//! Splitting income across the basic, higher and additional rate tiers.
//!
//! Limits are expressed in taxable income, i.e. income after the personal
//! allowance. Each stream is banded from a starting position equal to the
//! taxable income of the streams ranked before it (salary, then savings, then
//! dividends), so later streams only see the band left over.

use super::uk::{BandRates, Rates, TaxBand};
use rust_decimal::Decimal;
use serde::Serialize;

/// Band ceilings in taxable income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandLimits {
    /// Top of the basic rate band (37,700 plus any relief-at-source extension)
    pub basic: Decimal,
    /// Start of the additional rate band
    pub higher: Decimal,
}

impl BandLimits {
    /// Limits for the year, with the basic band extended by `extension`
    pub fn new(rates: &Rates, extension: Decimal) -> Self {
        BandLimits {
            basic: rates.basic_rate_limit - rates.personal_allowance + extension,
            higher: rates.higher_rate_limit,
        }
    }

    /// Band containing the top slice of `taxable` income
    pub fn band_of(&self, taxable: Decimal) -> TaxBand {
        if taxable <= self.basic {
            TaxBand::Basic
        } else if taxable <= self.higher {
            TaxBand::Higher
        } else {
            TaxBand::Additional
        }
    }

    /// Basic rate band left once `used` of taxable income has been banded
    pub fn basic_remaining(&self, used: Decimal) -> Decimal {
        (self.basic - used).max(Decimal::ZERO)
    }

    /// Higher rate band left once `used` has been banded. Nothing is left
    /// until the basic band has been filled.
    pub fn higher_remaining(&self, used: Decimal) -> Decimal {
        (self.higher - used - self.basic_remaining(used)).max(Decimal::ZERO)
    }
}

/// Portion of an amount falling in one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierSlice {
    pub amount: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
}

impl TierSlice {
    fn new(amount: Decimal, rate: Decimal) -> Self {
        TierSlice {
            amount,
            rate,
            tax: amount * rate,
        }
    }
}

/// An amount partitioned across the three rate tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BandedAmount {
    pub basic: TierSlice,
    pub higher: TierSlice,
    pub additional: TierSlice,
}

impl BandedAmount {
    /// Band `amount` starting after `used` of taxable income has been banded
    pub fn split(amount: Decimal, used: Decimal, limits: &BandLimits, rates: BandRates) -> Self {
        let amount = amount.max(Decimal::ZERO);
        let basic = amount.min(limits.basic_remaining(used));
        let higher = (amount - basic).min(limits.higher_remaining(used));
        let additional = amount - basic - higher;

        BandedAmount {
            basic: TierSlice::new(basic, rates.rate(TaxBand::Basic)),
            higher: TierSlice::new(higher, rates.rate(TaxBand::Higher)),
            additional: TierSlice::new(additional, rates.rate(TaxBand::Additional)),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.basic.amount + self.higher.amount + self.additional.amount
    }

    pub fn tax(&self) -> Decimal {
        self.basic.tax + self.higher.tax + self.additional.tax
    }

    pub fn tiers(&self) -> [(TaxBand, &TierSlice); 3] {
        [
            (TaxBand::Basic, &self.basic),
            (TaxBand::Higher, &self.higher),
            (TaxBand::Additional, &self.additional),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn limits() -> BandLimits {
        BandLimits::new(&Rates::default(), Decimal::ZERO)
    }

    fn split(amount: Decimal, used: Decimal) -> BandedAmount {
        BandedAmount::split(amount, used, &limits(), Rates::default().income_rates())
    }

    #[test]
    fn default_limits() {
        let limits = limits();
        assert_eq!(limits.basic, dec!(37700));
        assert_eq!(limits.higher, dec!(125140));
    }

    #[test]
    fn salary_entirely_basic_rate() {
        let banded = split(dec!(32430), Decimal::ZERO);
        assert_eq!(banded.basic.amount, dec!(32430));
        assert_eq!(banded.higher.amount, Decimal::ZERO);
        assert_eq!(banded.tax(), dec!(6486));
    }

    #[test]
    fn salary_across_all_tiers() {
        let banded = split(dec!(150000), Decimal::ZERO);
        assert_eq!(banded.basic.amount, dec!(37700));
        assert_eq!(banded.higher.amount, dec!(87440));
        assert_eq!(banded.additional.amount, dec!(24860));
        assert_eq!(banded.amount(), dec!(150000));
        // 7,540 + 34,976 + 11,187
        assert_eq!(banded.tax(), dec!(53703));
    }

    #[test]
    fn boundary_is_basic_rate() {
        let banded = split(dec!(37700), Decimal::ZERO);
        assert_eq!(banded.basic.amount, dec!(37700));
        assert_eq!(banded.higher.amount, Decimal::ZERO);
        assert_eq!(limits().band_of(dec!(37700)), TaxBand::Basic);
        assert_eq!(limits().band_of(dec!(37700.01)), TaxBand::Higher);
        assert_eq!(limits().band_of(dec!(125140.01)), TaxBand::Additional);
    }

    #[test]
    fn later_stream_uses_remaining_band() {
        // 2,000 banded after 37,000 of salary: 700 basic, 1,300 higher
        let banded = split(dec!(2000), dec!(37000));
        assert_eq!(banded.basic.amount, dec!(700));
        assert_eq!(banded.higher.amount, dec!(1300));
        assert_eq!(banded.additional.amount, Decimal::ZERO);

        let banded = split(dec!(1000), dec!(200000));
        assert_eq!(banded.additional.amount, dec!(1000));
    }

    #[test]
    fn extended_basic_band() {
        let limits = BandLimits::new(&Rates::default(), dec!(10000));
        assert_eq!(limits.basic, dec!(47700));
        let banded =
            BandedAmount::split(dec!(57430), Decimal::ZERO, &limits, Rates::default().income_rates());
        assert_eq!(banded.basic.amount, dec!(47700));
        assert_eq!(banded.higher.amount, dec!(9730));
    }

    #[test]
    fn extension_beyond_higher_limit_never_goes_negative() {
        let limits = BandLimits::new(&Rates::default(), dec!(100000));
        let banded =
            BandedAmount::split(dec!(150000), Decimal::ZERO, &limits, Rates::default().income_rates());
        assert_eq!(banded.basic.amount, dec!(137700));
        assert_eq!(banded.higher.amount, Decimal::ZERO);
        assert_eq!(banded.additional.amount, dec!(12300));
    }

    #[test]
    fn tiers_never_overlap_or_go_negative() {
        for amount in [0, 1, 37699, 37701, 90000, 125139, 125141, 300000] {
            for used in [0, 20000, 37700, 125140] {
                let banded = split(Decimal::from(amount), Decimal::from(used));
                for (_, tier) in banded.tiers() {
                    assert!(tier.amount >= Decimal::ZERO);
                }
                assert_eq!(banded.amount(), Decimal::from(amount));
            }
        }
    }
}
