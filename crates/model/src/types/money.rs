// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A `Money` fixed-precision value type denominated in a [`Currency`].

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use meridian_core::correctness::{FAILED, check_in_range_inclusive_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::types::{
    currency::Currency,
    fixed::{
        FIXED_PRECISION, FIXED_SCALAR, check_fixed_raw_i64, correct_raw_i64, f64_to_fixed_i64,
        fixed_i64_to_f64, format_fixed_i64, insert_thousands_separators,
    },
    price::Price,
    quantity::Quantity,
};

/// The raw storage type for a [`Money`] (1e9 fixed-point scaled).
pub type MoneyRaw = i64;

/// The maximum valid money amount which can be represented.
pub const MONEY_MAX: f64 = 9_223_372_036.0;

/// The minimum valid money amount which can be represented.
pub const MONEY_MIN: f64 = -9_223_372_036.0;

/// The error produced when combining [`Money`] values of different currencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Currency mismatch: {lhs} vs {rhs}")]
pub struct CurrencyMismatchError {
    /// The currency code on the left-hand side of the operation.
    pub lhs: String,
    /// The currency code on the right-hand side of the operation.
    pub rhs: String,
}

/// Represents an amount of money in a specified currency denomination.
///
/// The amount is stored as a raw integer scaled to 1e9; the display precision
/// comes from the denominating [`Currency`].
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Money {
    /// The raw fixed-point amount, scaled to 1e9.
    pub raw: MoneyRaw,
    /// The currency denomination.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is not finite or is outside [`MONEY_MIN`], [`MONEY_MAX`].
    pub fn new_checked(amount: f64, currency: Currency) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(amount, MONEY_MIN, MONEY_MAX, stringify!(amount))?;

        Ok(Self {
            raw: f64_to_fixed_i64(amount, currency.precision),
            currency,
        })
    }

    /// Creates a new [`Money`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Money::new_checked`]).
    #[must_use]
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self::new_checked(amount, currency).expect(FAILED)
    }

    /// Creates a new [`Money`] instance from a raw fixed-point amount.
    ///
    /// The raw value must be an exact multiple of the scale for the currency precision
    /// (checked in debug builds).
    #[must_use]
    pub fn from_raw(raw: MoneyRaw, currency: Currency) -> Self {
        debug_assert!(
            check_fixed_raw_i64(raw, currency.precision).is_ok(),
            "raw {raw} not a valid multiple for currency precision {}",
            currency.precision
        );
        Self { raw, currency }
    }

    /// Creates a new [`Money`] instance from the notional of `price` and `size`.
    ///
    /// The product is computed exactly on the raw fixed-point values and rounded to the
    /// currency precision.
    ///
    /// # Panics
    ///
    /// Panics if the notional amount is outside the representable range.
    #[must_use]
    pub fn from_price_and_quantity(price: Price, size: Quantity, currency: Currency) -> Self {
        let product = i128::from(price.raw) * i128::from(size.raw) / i128::from(FIXED_SCALAR as i64);
        let raw = MoneyRaw::try_from(product).expect("Overflow occurred when computing notional");
        Self {
            raw: correct_raw_i64(raw, currency.precision),
            currency,
        }
    }

    /// Returns `true` if the amount of this instance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the amount of this instance is positive (> 0).
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the amount of this instance as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the amount of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        let precision = self.currency.precision;
        let rescaled = self.raw / 10_i64.pow(u32::from(FIXED_PRECISION - precision));
        Decimal::from_i128_with_scale(i128::from(rescaled), u32::from(precision))
    }

    /// Adds `rhs`, failing when the currencies differ.
    ///
    /// # Errors
    ///
    /// Returns a [`CurrencyMismatchError`] if the currencies are not identical.
    pub fn checked_add(self, rhs: Self) -> Result<Self, CurrencyMismatchError> {
        if self.currency != rhs.currency {
            return Err(CurrencyMismatchError {
                lhs: self.currency.code.to_string(),
                rhs: rhs.currency.code.to_string(),
            });
        }
        Ok(Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Money`"),
            currency: self.currency,
        })
    }

    /// Subtracts `rhs`, failing when the currencies differ.
    ///
    /// # Errors
    ///
    /// Returns a [`CurrencyMismatchError`] if the currencies are not identical.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, CurrencyMismatchError> {
        if self.currency != rhs.currency {
            return Err(CurrencyMismatchError {
                lhs: self.currency.code.to_string(),
                rhs: rhs.currency.code.to_string(),
            });
        }
        Ok(Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Money`"),
            currency: self.currency,
        })
    }

    /// Returns a formatted string representation with thousands separators.
    #[must_use]
    pub fn to_formatted_string(&self) -> String {
        let amount = format_fixed_i64(self.raw, self.currency.precision);
        format!("{} {}", insert_thousands_separators(&amount), self.currency)
    }
}

impl FromStr for Money {
    type Err = String;

    /// Parses a [`Money`] from a `"<amount> <code>"` string (e.g. `"1234.56 USD"`).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (amount_str, code) = input.rsplit_once(' ').ok_or_else(|| {
            format!("Error parsing `Money` from '{input}': expected '<amount> <currency>' format")
        })?;

        let amount = amount_str
            .replace('_', "")
            .parse::<f64>()
            .map_err(|e| format!("Error parsing `Money` amount '{amount_str}': {e}"))?;
        let currency = Currency::try_from_str(code).map_err(|e| e.to_string())?;

        Self::new_checked(amount, currency).map_err(|e| e.to_string())
    }
}

impl From<&str> for Money {
    /// Creates a [`Money`] from a `"<amount> <code>"` string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid money string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.raw == other.raw
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.currency, other.currency,
            "Cannot compare `Money` values of different currencies"
        );
        self.raw.cmp(&other.raw)
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.currency.hash(state);
    }
}

impl Add for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the currencies are not identical.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect(FAILED)
    }
}

impl Sub for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the currencies are not identical.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect(FAILED)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            currency: self.currency,
        }
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Money))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            format_fixed_i64(self.raw, self.currency.precision),
            self.currency,
        )
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&value_str).map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn test_new() {
        let money = Money::new(1_010.25, Currency::USD());
        assert_eq!(money.raw, 1_010_250_000_000);
        assert_eq!(money.currency, Currency::USD());
        assert_eq!(money.as_f64(), 1_010.25);
    }

    #[rstest]
    fn test_new_rounds_to_currency_precision() {
        // USD has precision 2
        let money = Money::new(10.999, Currency::USD());
        assert_eq!(money.as_f64(), 11.00);
    }

    #[rstest]
    fn test_new_checked_out_of_range() {
        assert!(Money::new_checked(MONEY_MAX * 10.0, Currency::USD()).is_err());
        assert!(Money::new_checked(f64::NAN, Currency::USD()).is_err());
    }

    #[rstest]
    fn test_from_raw_round_trip() {
        let money = Money::new(42.42, Currency::USD());
        let from_raw = Money::from_raw(money.raw, money.currency);
        assert_eq!(from_raw.raw, money.raw);
        assert_eq!(from_raw, money);
    }

    #[rstest]
    fn test_add_same_currency() {
        let a = Money::new(10.50, Currency::USD());
        let b = Money::new(0.50, Currency::USD());
        assert_eq!(a + b, Money::new(11.00, Currency::USD()));
    }

    #[rstest]
    fn test_checked_add_currency_mismatch() {
        let usd = Money::new(1.0, Currency::USD());
        let eur = Money::new(1.0, Currency::EUR());
        let err = usd.checked_add(eur).unwrap_err();
        assert_eq!(err.to_string(), "Currency mismatch: USD vs EUR");
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_add_currency_mismatch_panics() {
        let _ = Money::new(1.0, Currency::USD()) + Money::new(1.0, Currency::EUR());
    }

    #[rstest]
    fn test_assign_ops() {
        let mut money = Money::new(10.0, Currency::USD());
        money += Money::new(5.0, Currency::USD());
        assert_eq!(money, Money::new(15.0, Currency::USD()));
        money -= Money::new(15.0, Currency::USD());
        assert!(money.is_zero());
    }

    #[rstest]
    fn test_neg() {
        assert_eq!(
            -Money::new(10.0, Currency::USD()),
            Money::new(-10.0, Currency::USD())
        );
    }

    #[rstest]
    #[case("10.25 USD", 10_250_000_000)]
    #[case("-10.25 USD", -10_250_000_000)]
    #[case("1_000 USD", 1_000_000_000_000)]
    fn test_from_str(#[case] input: &str, #[case] raw: i64) {
        let money = Money::from(input);
        assert_eq!(money.raw, raw);
        assert_eq!(money.currency, Currency::USD());
    }

    #[rstest]
    fn test_from_str_invalid() {
        assert!(Money::from_str("10.25").is_err());
        assert!(Money::from_str("10.25 ZZZ").is_err());
        assert!(Money::from_str("abc USD").is_err());
    }

    #[rstest]
    fn test_display() {
        assert_eq!(Money::new(10.25, Currency::USD()).to_string(), "10.25 USD");
        assert_eq!(
            Money::new(10.0, Currency::BTC()).to_string(),
            "10.00000000 BTC"
        );
    }

    #[rstest]
    fn test_to_formatted_string() {
        assert_eq!(
            Money::new(1_234_567.89, Currency::USD()).to_formatted_string(),
            "1_234_567.89 USD"
        );
    }

    #[rstest]
    fn test_as_decimal() {
        assert_eq!(Money::new(10.25, Currency::USD()).as_decimal(), dec!(10.25));
    }

    #[rstest]
    fn test_serde_round_trip() {
        let money = Money::new(42.42, Currency::USD());
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"42.42 USD\"");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, money);
    }

    #[rstest]
    fn test_raw_round_trip_property() {
        let money = Money::new(123.45, Currency::USD());
        assert_eq!(Money::from_raw(money.raw, Currency::USD()).raw, money.raw);
    }

    #[rstest]
    fn test_from_price_and_quantity() {
        let price = Price::from("100.00");
        let size = Quantity::from("5");
        let notional = Money::from_price_and_quantity(price, size, Currency::USD());
        assert_eq!(notional, Money::new(500.00, Currency::USD()));
    }

    #[rstest]
    fn test_from_price_and_quantity_rounds_to_currency_precision() {
        let price = Price::from("0.333");
        let size = Quantity::from("3");
        let notional = Money::from_price_and_quantity(price, size, Currency::USD());
        // 0.999 rounds to 1.00 at USD precision
        assert_eq!(notional, Money::new(1.00, Currency::USD()));
    }
}
