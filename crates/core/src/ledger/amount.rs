//! Fixed-point amount handling: ingestion rounding and the credit/debit sign
//! convention.
//!
//! Every amount that enters the ledger is a `Decimal` with at most 4
//! fractional digits. Floating point is never used for money.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::LedgerError;

/// Number of fractional digits a stored amount carries.
pub const AMOUNT_SCALE: u32 = 4;

/// Rounds `amount` to [`AMOUNT_SCALE`] fractional digits using banker's
/// rounding (round-half-to-even), as required at ingestion for every
/// `LedgerEntry.amount`.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Selects which sign convention `credit`/`debit` apply.
///
/// Carried explicitly wherever it is needed rather than as global state;
/// see `EngineConfig` in the shared configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignConvention {
    /// When `true`, debits are negative and credits are positive. Defaults
    /// to `false` (debits positive, credits negative).
    pub debits_are_negative: bool,
}

impl SignConvention {
    /// The default convention: debits positive, credits negative.
    #[must_use]
    pub const fn standard() -> Self {
        Self { debits_are_negative: false }
    }

    /// The inverted convention: debits negative, credits positive.
    #[must_use]
    pub const fn debits_negative() -> Self {
        Self { debits_are_negative: true }
    }

    fn signed(self, magnitude: Decimal, reverse: bool) -> Result<Decimal, LedgerError> {
        if magnitude < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount: magnitude });
        }
        let negate = if self.debits_are_negative { !reverse } else { reverse };
        Ok(round_amount(if negate { -magnitude } else { magnitude }))
    }

    /// Returns the signed amount representing a credit of `magnitude`.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidAmount`] if `magnitude` is negative.
    pub fn credit(self, magnitude: Decimal) -> Result<Decimal, LedgerError> {
        self.signed(magnitude, true)
    }

    /// Returns the signed amount representing a debit of `magnitude`.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidAmount`] if `magnitude` is negative.
    pub fn debit(self, magnitude: Decimal) -> Result<Decimal, LedgerError> {
        self.signed(magnitude, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn bankers_rounding_at_ingestion() {
        assert_eq!(round_amount(dec!(499.99995)), dec!(500.0000));
        assert_eq!(round_amount(dec!(499.99994)), dec!(499.9999));
        assert_eq!(round_amount(dec!(-499.99995)), dec!(-500.0000));
        assert_eq!(round_amount(dec!(-499.99994)), dec!(-499.9999));
    }

    #[test]
    fn standard_convention_debit_positive_credit_negative() {
        let c = SignConvention::standard();
        assert_eq!(c.debit(dec!(100)).unwrap(), dec!(100));
        assert_eq!(c.credit(dec!(100)).unwrap(), dec!(-100));
    }

    #[test]
    fn inverted_convention_flips_signs() {
        let c = SignConvention::debits_negative();
        assert_eq!(c.debit(dec!(100)).unwrap(), dec!(-100));
        assert_eq!(c.credit(dec!(100)).unwrap(), dec!(100));
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        let c = SignConvention::standard();
        assert!(matches!(
            c.debit(dec!(-1)),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            c.credit(dec!(-1)),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn credit_and_debit_are_additive_inverses() {
        for c in [SignConvention::standard(), SignConvention::debits_negative()] {
            for x in [dec!(0), dec!(1), dec!(100.5), dec!(999999.9999)] {
                assert_eq!(c.credit(x).unwrap() + c.debit(x).unwrap(), Decimal::ZERO);
            }
        }
    }

    use proptest::prelude::*;

    fn magnitude_strategy() -> impl Strategy<Value = Decimal> {
        (0u64..=999_999_9999u64).prop_map(|cents| Decimal::new(i64::try_from(cents).unwrap(), AMOUNT_SCALE))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// For any non-negative magnitude and either sign convention,
        /// `credit(x) + debit(x) == 0`.
        #[test]
        fn prop_credit_plus_debit_is_zero(
            magnitude in magnitude_strategy(),
            debits_are_negative in any::<bool>(),
        ) {
            let c = SignConvention { debits_are_negative };
            let sum = c.credit(magnitude).unwrap() + c.debit(magnitude).unwrap();
            prop_assert_eq!(sum, Decimal::ZERO);
        }

        /// `round_amount` is idempotent: rounding an already-rounded amount
        /// never changes it.
        #[test]
        fn prop_round_amount_is_idempotent(magnitude in magnitude_strategy()) {
            let once = round_amount(magnitude);
            prop_assert_eq!(round_amount(once), once);
        }

        /// `round_amount` never produces more than `AMOUNT_SCALE` fractional
        /// digits, for either sign.
        #[test]
        fn prop_round_amount_respects_scale(
            magnitude in magnitude_strategy(),
            negative in any::<bool>(),
        ) {
            let signed = if negative { -magnitude } else { magnitude };
            let rounded = round_amount(signed);
            prop_assert!(rounded.scale() <= AMOUNT_SCALE);
        }
    }
}
