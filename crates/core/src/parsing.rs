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

//! Core parsing functions.

/// Returns the decimal precision inferred from the given string.
///
/// Scientific notation with a negative exponent (e.g. `"1e-5"`) yields the exponent;
/// exponents beyond `u8::MAX` are clamped since that is the maximum representable
/// precision in this system.
///
/// # Panics
///
/// Panics if the input uses scientific notation with a missing or non-numeric exponent
/// (e.g. `"1e-"` or `"1e-abc"`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn precision_from_str(s: &str) -> u8 {
    let s = s.trim().to_ascii_lowercase();

    if let Some((_, exponent_str)) = s.split_once("e-") {
        if let Ok(exp) = exponent_str.parse::<u64>() {
            return exp.min(u64::from(u8::MAX)) as u8;
        }
        assert!(
            exponent_str.chars().all(|c| c.is_ascii_digit()) && !exponent_str.is_empty(),
            "Invalid scientific notation exponent '{exponent_str}'"
        );
        return u8::MAX;
    }

    match s.split_once('.') {
        Some((_, decimal_part)) => decimal_part.len().min(u8::MAX as usize) as u8,
        None => 0,
    }
}

/// Returns the minimum increment precision inferred from the given string,
/// ignoring trailing zeros.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn min_increment_precision_from_str(s: &str) -> u8 {
    let s = s.trim().to_ascii_lowercase();

    if let Some((_, exponent_str)) = s.split_once("e-") {
        return exponent_str
            .parse::<u64>()
            .map(|exp| exp.min(u64::from(u8::MAX)) as u8)
            .unwrap_or(0);
    }

    if let Some((_, decimal_part)) = s.split_once('.') {
        if decimal_part.chars().any(|c| c != '0') {
            return decimal_part.trim_end_matches('0').len().min(u8::MAX as usize) as u8;
        }
        return decimal_part.len().min(u8::MAX as usize) as u8;
    }

    0
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", 0)]
    #[case("0", 0)]
    #[case("1.0", 1)]
    #[case("1.00", 2)]
    #[case("1.23456789", 8)]
    #[case("123456.123456789", 9)]
    #[case("0.000000001", 9)]
    #[case("1e-1", 1)]
    #[case("1e-2", 2)]
    #[case("1E-7", 7)]
    #[case("1e-300", 255)]
    fn test_precision_from_str(#[case] s: &str, #[case] expected: u8) {
        assert_eq!(precision_from_str(s), expected);
    }

    #[rstest]
    #[case("0", 0)]
    #[case("1.0", 1)]
    #[case("1.00", 2)]
    #[case("0.10", 1)]
    #[case("0.100", 1)]
    #[case("1.23000", 2)]
    #[case("1e-2", 2)]
    fn test_min_increment_precision_from_str(#[case] s: &str, #[case] expected: u8) {
        assert_eq!(min_increment_precision_from_str(s), expected);
    }

    #[rstest]
    #[should_panic]
    fn test_precision_from_str_invalid_exponent_panics() {
        let _ = precision_from_str("1e-abc");
    }
}
