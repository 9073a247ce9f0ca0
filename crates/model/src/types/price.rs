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

//! A `Price` fixed-precision value type representing a price in a market.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use meridian_core::{
    correctness::{FAILED, check_in_range_inclusive_f64},
    parsing::precision_from_str,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::fixed::{
    FIXED_PRECISION, check_fixed_precision, check_fixed_raw_i64, f64_to_fixed_i64,
    fixed_i64_to_f64, format_fixed_i64, insert_thousands_separators,
};

/// The raw storage type for a [`Price`] (1e9 fixed-point scaled).
pub type PriceRaw = i64;

/// The maximum valid price value which can be represented.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The minimum valid price value which can be represented.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// The sentinel raw value for an undefined price.
pub const PRICE_UNDEF: PriceRaw = PriceRaw::MAX;

/// Represents a price in a market.
///
/// The raw value is stored scaled to [`FIXED_SCALAR`](crate::types::fixed::FIXED_SCALAR)
/// regardless of the declared `precision`, so comparisons across differing precisions
/// are exact integer comparisons. Equality, ordering and hashing are over the raw value.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Price {
    /// The raw fixed-point value, scaled to 1e9.
    pub raw: PriceRaw,
    /// The declared decimal precision (0..=[`FIXED_PRECISION`]).
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `value` is not finite or is outside [`PRICE_MIN`], [`PRICE_MAX`].
    /// - If `precision` exceeds [`FIXED_PRECISION`].
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_in_range_inclusive_f64(value, PRICE_MIN, PRICE_MAX, stringify!(value))?;
        check_fixed_precision(precision)?;

        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Price::new_checked`]).
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] instance from a raw fixed-point value.
    ///
    /// The raw value must be an exact multiple of the scale for the given precision
    /// (checked in debug builds).
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds [`FIXED_PRECISION`].
    #[must_use]
    pub fn from_raw(raw: PriceRaw, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        debug_assert!(
            raw == PRICE_UNDEF || check_fixed_raw_i64(raw, precision).is_ok(),
            "raw {raw} not a valid multiple for precision {precision}"
        );
        Self { raw, precision }
    }

    /// Creates a new [`Price`] instance with the maximum representable value.
    #[must_use]
    pub fn max(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self {
            raw: f64_to_fixed_i64(PRICE_MAX, precision),
            precision,
        }
    }

    /// Creates a new [`Price`] instance with the minimum representable value.
    #[must_use]
    pub fn min(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self {
            raw: f64_to_fixed_i64(PRICE_MIN, precision),
            precision,
        }
    }

    /// Creates a new [`Price`] instance with a value of zero.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw: 0, precision }
    }

    /// Returns `true` if the value of this instance is undefined.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.raw == PRICE_UNDEF
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns `true` if the value of this instance is position (> 0).
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the value of this instance as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the value of this instance as a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        // Scale down the raw value to be not greater than the precision
        let rescaled = self.raw / 10_i64.pow(u32::from(FIXED_PRECISION - self.precision));
        Decimal::from_i128_with_scale(i128::from(rescaled), u32::from(self.precision))
    }

    /// Returns a formatted string representation with thousands separators.
    #[must_use]
    pub fn to_formatted_string(&self) -> String {
        insert_thousands_separators(&self.to_string())
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value = input
            .replace('_', "")
            .parse::<f64>()
            .map_err(|e| format!("Error parsing `input` string '{input}' as `f64`: {e}"))?;

        Self::new_checked(value, precision_from_str(input)).map_err(|e| e.to_string())
    }
}

impl From<&str> for Price {
    /// Creates a [`Price`] from a decimal string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid decimal string within the representable range.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl From<String> for Price {
    /// Creates a [`Price`] from a decimal string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid decimal string within the representable range.
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Neg for Price {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            precision: self.precision,
        }
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Price))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_fixed_i64(self.raw, self.precision))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
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
        let price = Price::new(100.50, 2);
        assert_eq!(price.raw, 100_500_000_000);
        assert_eq!(price.precision, 2);
        assert_eq!(price.as_f64(), 100.50);
    }

    #[rstest]
    #[case("1.23456", 1_234_560_000, 5)]
    #[case("1.234567890", 1_234_567_890, 9)]
    #[case("0", 0, 0)]
    #[case("-100.25", -100_250_000_000, 2)]
    #[case("1_000.00", 1_000_000_000_000, 2)]
    fn test_from_str(#[case] input: &str, #[case] raw: i64, #[case] precision: u8) {
        let price = Price::from(input);
        assert_eq!(price.raw, raw);
        assert_eq!(price.precision, precision);
    }

    #[rstest]
    fn test_from_str_out_of_range() {
        assert!(Price::from_str("9223372037").is_err());
        assert!(Price::from_str("-9223372037").is_err());
    }

    #[rstest]
    fn test_from_str_excess_precision() {
        assert!(Price::from_str("0.1234567891").is_err());
    }

    #[rstest]
    fn test_from_str_invalid() {
        assert!(Price::from_str("banana").is_err());
    }

    #[rstest]
    fn test_new_checked_rejects_non_finite() {
        assert!(Price::new_checked(f64::NAN, 0).is_err());
        assert!(Price::new_checked(f64::INFINITY, 0).is_err());
    }

    #[rstest]
    fn test_equality_across_precisions() {
        assert_eq!(Price::from("10.0"), Price::from("10.00"));
        assert_ne!(Price::from("10.0"), Price::from("10.01"));
    }

    #[rstest]
    fn test_ordering_on_raw() {
        assert!(Price::from("10.0") < Price::from("10.01"));
        assert!(Price::from("-1.0") < Price::from("0.5"));
        assert!(Price::from("11.0") > Price::from("10.999"));
    }

    #[rstest]
    fn test_add_takes_max_precision() {
        let result = Price::from("1.5") + Price::from("0.25");
        assert_eq!(result, Price::from("1.75"));
        assert_eq!(result.precision, 2);
    }

    #[rstest]
    fn test_sub_takes_max_precision() {
        let result = Price::from("1.5") - Price::from("0.25");
        assert_eq!(result, Price::from("1.25"));
        assert_eq!(result.precision, 2);
    }

    #[rstest]
    #[should_panic(expected = "Overflow occurred when adding `Price`")]
    fn test_add_overflow_panics() {
        let _ = Price::max(0) + Price::max(0);
    }

    #[rstest]
    fn test_neg() {
        assert_eq!(-Price::from("1.5"), Price::from("-1.5"));
    }

    #[rstest]
    #[case("100.00", "100.00")]
    #[case("-100.25", "-100.25")]
    #[case("0.000000001", "0.000000001")]
    #[case("123456", "123456")]
    fn test_display_round_trip(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Price::from(input).to_string(), expected);
    }

    #[rstest]
    fn test_debug() {
        assert_eq!(format!("{:?}", Price::from("10.50")), "Price(10.50)");
    }

    #[rstest]
    #[case("1234567.89", "1_234_567.89")]
    #[case("-1234567.89", "-1_234_567.89")]
    #[case("100.00", "100.00")]
    #[case("1000", "1_000")]
    fn test_to_formatted_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Price::from(input).to_formatted_string(), expected);
    }

    #[rstest]
    fn test_as_decimal() {
        assert_eq!(Price::from("10.55").as_decimal(), dec!(10.55));
        assert_eq!(Price::from("-1.5").as_decimal(), dec!(-1.5));
    }

    #[rstest]
    fn test_zero_max_min() {
        assert!(Price::zero(2).is_zero());
        assert!(Price::max(2) > Price::from("100.00"));
        assert!(Price::min(2) < Price::from("-100.00"));
    }

    #[rstest]
    fn test_undefined() {
        let price = Price::from_raw(PRICE_UNDEF, 0);
        assert!(price.is_undefined());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::from("1.23456");
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1.23456\"");
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, price);
        assert_eq!(deserialized.precision, price.precision);
    }

    #[rstest]
    fn test_raw_ordering_matches_value_ordering() {
        let a = Price::from("1.2345");
        let b = Price::from("1.23456");
        assert_eq!(a.raw < b.raw, a < b);
    }
}
