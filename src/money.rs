//! Kz Amount Validation Module
//!
//! Unified validation and arithmetic for monetary values. All amounts that
//! enter the ledger MUST pass through this module first.
//!
//! ## Design Principles
//! 1. Fixed-point only: `rust_decimal::Decimal`, never binary floating point
//! 2. Explicit Error Handling: no silent truncation or rounding of input
//! 3. Canonical scale: every stored value carries exactly 2 fraction digits
//!
//! ## Storage Representation
//! - Amounts and balances are `numeric(15, 2)`: up to 13 integer digits
//!   and 2 fraction digits
//! - The marketplace commission is the only place rounding happens, and it
//!   rounds half-up at 2 decimal places

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Fraction digits carried by every stored Kz value
pub const SCALE: u32 = 2;

/// Amount validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must not be negative")]
    Negative,

    #[error("amount precision exceeds {max} decimal places (provided {provided})")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("amount exceeds 13 integer digits")]
    TooLarge,
}

fn limit() -> Decimal {
    // 10^13, the first value that no longer fits numeric(15, 2)
    Decimal::from(10_000_000_000_000u64)
}

/// Validate a transaction amount and rescale it to 2 fraction digits.
///
/// Zero is permitted: a zero-amount transaction is a balance no-op but is
/// still recorded. Trailing zeros beyond scale 2 (e.g. "1.2300") are
/// accepted; any non-zero third fraction digit is rejected.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative);
    }

    let normalized = amount.normalize();
    if normalized.scale() > SCALE {
        return Err(AmountError::PrecisionOverflow {
            provided: normalized.scale(),
            max: SCALE,
        });
    }

    if amount >= limit() {
        return Err(AmountError::TooLarge);
    }

    let mut canonical = normalized;
    canonical.rescale(SCALE);
    Ok(canonical)
}

/// Validate a balance value (admin override path, same rules as amounts).
pub fn validate_balance(balance: Decimal) -> Result<Decimal, AmountError> {
    validate_amount(balance)
}

/// Marketplace commission: 5% of the sale price, rounded half-up to 2dp.
///
/// Seller earnings are `price - commission(price)`, so the buyer debit and
/// the seller credit always differ by exactly the commission.
pub fn commission(price: Decimal) -> Decimal {
    let rate = Decimal::new(5, 2); // 0.05
    (price * rate).round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_amount_canonical_scale() {
        assert_eq!(validate_amount(d("300")).unwrap(), d("300.00"));
        assert_eq!(validate_amount(d("1.5")).unwrap(), d("1.50"));
        assert_eq!(validate_amount(d("1.2300")).unwrap(), d("1.23"));
        assert_eq!(validate_amount(d("0")).unwrap(), d("0.00"));
    }

    #[test]
    fn test_validate_amount_rejects_negative() {
        assert_eq!(validate_amount(d("-0.01")), Err(AmountError::Negative));
        assert_eq!(validate_amount(d("-300")), Err(AmountError::Negative));
    }

    #[test]
    fn test_validate_amount_rejects_excess_precision() {
        let res = validate_amount(d("1.234"));
        assert_eq!(
            res,
            Err(AmountError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        );
        // Trailing zeros are not excess precision
        assert!(validate_amount(d("1.230")).is_ok());
    }

    #[test]
    fn test_validate_amount_integer_digit_limit() {
        // 13 digits fits, 14 does not
        assert!(validate_amount(d("9999999999999.99")).is_ok());
        assert_eq!(
            validate_amount(d("10000000000000")),
            Err(AmountError::TooLarge)
        );
    }

    #[test]
    fn test_commission_exact() {
        assert_eq!(commission(d("200.00")), d("10.00"));
        assert_eq!(commission(d("100.00")), d("5.00"));
        assert_eq!(commission(d("0.00")), d("0.00"));
    }

    #[test]
    fn test_commission_rounds_half_up() {
        // 0.10 * 0.05 = 0.005 -> 0.01
        assert_eq!(commission(d("0.10")), d("0.01"));
        // 10.10 * 0.05 = 0.505 -> 0.51
        assert_eq!(commission(d("10.10")), d("0.51"));
        // 10.02 * 0.05 = 0.501 -> 0.50
        assert_eq!(commission(d("10.02")), d("0.50"));
    }

    #[test]
    fn test_conservation_per_sale() {
        // buyer debit - seller credit == commission, for awkward prices too
        for price in ["200.00", "0.10", "10.10", "99.99", "0.01"] {
            let price = d(price);
            let fee = commission(price);
            let earnings = price - fee;
            assert_eq!(price - earnings, fee);
            assert!(earnings <= price);
        }
    }
}
