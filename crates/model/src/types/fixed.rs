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

//! Functions for handling fixed-point arithmetic.
//!
//! All monetary and size quantities in the model are stored as integers scaled by
//! [`FIXED_SCALAR`], with a declared precision in the range `0..=FIXED_PRECISION`.
//! A raw value for precision `P` must be an exact multiple of `10^(FIXED_PRECISION - P)`;
//! raw values should only come from the `.raw` field of an existing value or from the
//! conversion functions in this module.

use meridian_core::correctness::FAILED;

/// The maximum fixed-point precision.
pub const FIXED_PRECISION: u8 = 9;

/// The width in bytes for fixed-point value types (64-bit).
pub const PRECISION_BYTES: i32 = 8;

/// The data type name for the fixed-size binary schema representation.
pub const FIXED_SIZE_BINARY: &str = "FixedSizeBinary(8)";

/// The scalar value corresponding to the maximum precision (10^9).
pub const FIXED_SCALAR: f64 = 1_000_000_000.0;

/// Precomputed powers of 10 covering `10^0` through `10^FIXED_PRECISION`.
const POWERS_OF_10: [u64; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Checks if a given `precision` value is within the allowed fixed-point precision range.
///
/// # Errors
///
/// Returns an error if `precision` exceeds [`FIXED_PRECISION`].
pub fn check_fixed_precision(precision: u8) -> anyhow::Result<()> {
    if precision > FIXED_PRECISION {
        anyhow::bail!(
            "`precision` exceeded maximum `FIXED_PRECISION` ({FIXED_PRECISION}), was {precision}"
        )
    }
    Ok(())
}

/// Checks that a raw signed fixed-point value is an exact multiple of the scale for `precision`.
///
/// A non-zero remainder indicates data corruption or incorrect scaling upstream.
///
/// # Errors
///
/// Returns an error if the raw value has non-zero bits beyond the precision scale.
#[inline(always)]
pub fn check_fixed_raw_i64(raw: i64, precision: u8) -> anyhow::Result<()> {
    if precision >= FIXED_PRECISION {
        return Ok(());
    }

    let scale = POWERS_OF_10[usize::from(FIXED_PRECISION - precision)] as i64;
    let remainder = raw % scale;
    if remainder != 0 {
        anyhow::bail!(
            "Invalid fixed-point raw value {raw} for precision {precision}: \
             remainder {remainder} when divided by scale {scale}"
        )
    }

    Ok(())
}

/// Checks that a raw unsigned fixed-point value is an exact multiple of the scale for `precision`.
///
/// # Errors
///
/// Returns an error if the raw value has non-zero bits beyond the precision scale.
#[inline(always)]
pub fn check_fixed_raw_u64(raw: u64, precision: u8) -> anyhow::Result<()> {
    if precision >= FIXED_PRECISION {
        return Ok(());
    }

    let scale = POWERS_OF_10[usize::from(FIXED_PRECISION - precision)];
    let remainder = raw % scale;
    if remainder != 0 {
        anyhow::bail!(
            "Invalid fixed-point raw value {raw} for precision {precision}: \
             remainder {remainder} when divided by scale {scale}"
        )
    }

    Ok(())
}

/// Rounds a raw `i64` value to the nearest valid multiple of the scale for the given precision.
#[must_use]
pub fn correct_raw_i64(raw: i64, precision: u8) -> i64 {
    if precision >= FIXED_PRECISION {
        return raw;
    }
    let scale = POWERS_OF_10[usize::from(FIXED_PRECISION - precision)] as i64;
    let half_scale = scale / 2;
    let remainder = raw % scale;
    if remainder == 0 {
        raw
    } else if raw >= 0 {
        if remainder >= half_scale {
            raw + (scale - remainder)
        } else {
            raw - remainder
        }
    } else if remainder.abs() >= half_scale {
        raw - (scale + remainder)
    } else {
        raw - remainder
    }
}

/// Rounds a raw `u64` value to the nearest valid multiple of the scale for the given precision.
#[must_use]
pub fn correct_raw_u64(raw: u64, precision: u8) -> u64 {
    if precision >= FIXED_PRECISION {
        return raw;
    }
    let scale = POWERS_OF_10[usize::from(FIXED_PRECISION - precision)];
    let half_scale = scale / 2;
    let remainder = raw % scale;
    if remainder == 0 {
        raw
    } else if remainder >= half_scale {
        raw + (scale - remainder)
    } else {
        raw - remainder
    }
}

/// Converts an `f64` value to a raw fixed-point `i64` representation with a specified precision.
///
/// Rounding is applied at the specified precision ("round half away from zero" as per
/// `f64::round`) before scaling to the full fixed-point representation, so values are
/// represented without accumulating floating-point error during scaling.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_i64(value: f64, precision: u8) -> i64 {
    check_fixed_precision(precision).expect(FAILED);
    let pow1 = 10_i64.pow(u32::from(precision));
    let pow2 = 10_i64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as i64;
    rounded * pow2
}

/// Converts an `f64` value to a raw fixed-point `u64` representation with a specified precision.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_u64(value: f64, precision: u8) -> u64 {
    check_fixed_precision(precision).expect(FAILED);
    let pow1 = 10_u64.pow(u32::from(precision));
    let pow2 = 10_u64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as u64;
    rounded * pow2
}

/// Converts a raw fixed-point `i64` value back to an `f64` value.
#[must_use]
pub fn fixed_i64_to_f64(value: i64) -> f64 {
    (value as f64) / FIXED_SCALAR
}

/// Converts a raw fixed-point `u64` value back to an `f64` value.
#[must_use]
pub fn fixed_u64_to_f64(value: u64) -> f64 {
    (value as f64) / FIXED_SCALAR
}

/// Formats a raw unsigned fixed-point value with exactly `precision` decimal places.
#[must_use]
pub fn format_fixed_u64(raw: u64, precision: u8) -> String {
    let integral = raw / POWERS_OF_10[usize::from(FIXED_PRECISION)];
    if precision == 0 {
        return format!("{integral}");
    }
    let fraction = (raw % POWERS_OF_10[usize::from(FIXED_PRECISION)])
        / POWERS_OF_10[usize::from(FIXED_PRECISION - precision)];
    format!(
        "{integral}.{fraction:0width$}",
        width = usize::from(precision)
    )
}

/// Formats a raw signed fixed-point value with exactly `precision` decimal places.
#[must_use]
pub fn format_fixed_i64(raw: i64, precision: u8) -> String {
    let sign = if raw < 0 { "-" } else { "" };
    format!("{sign}{}", format_fixed_u64(raw.unsigned_abs(), precision))
}

/// Inserts `_` thousands separators into the integer part of a decimal string.
#[must_use]
pub fn insert_thousands_separators(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
