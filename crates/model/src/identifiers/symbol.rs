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

//! Represents a valid ticker symbol ID for a tradable instrument.

use std::fmt::{Debug, Display, Formatter};

use meridian_core::correctness::{FAILED, check_valid_string};
use ustr::Ustr;

/// Represents a valid ticker symbol ID for a tradable instrument.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Symbol(Ustr);

impl Symbol {
    /// Creates a new [`Symbol`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid string.
    pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let value = value.as_ref();
        check_valid_string(value, stringify!(value))?;
        Ok(Self(Ustr::from(value)))
    }

    /// Creates a new [`Symbol`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid string.
    pub fn new<T: AsRef<str>>(value: T) -> Self {
        Self::new_checked(value).expect(FAILED)
    }

    /// Creates a new [`Symbol`] from the given interned string, skipping validation.
    #[must_use]
    pub const fn from_ustr_unchecked(value: Ustr) -> Self {
        Self(value)
    }

    /// Returns the inner identifier value.
    #[must_use]
    pub fn inner(&self) -> Ustr {
        self.0
    }

    /// Returns the inner identifier value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the symbol string contains a period (`.`).
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.as_str().contains('.')
    }

    /// Returns the symbol root.
    ///
    /// The symbol root is the substring before the first period (`.`) in the full
    /// symbol string, typically the underlying asset for futures and options contracts.
    /// If no period is found the entire symbol string is the root.
    #[must_use]
    pub fn root(&self) -> &str {
        let symbol_str = self.as_str();
        symbol_str
            .split_once('.')
            .map_or(symbol_str, |(root, _)| root)
    }

    /// Returns the symbol topic.
    ///
    /// The topic is the root with a wildcard (`*`) appended when the symbol is composite,
    /// otherwise the full symbol string.
    #[must_use]
    pub fn topic(&self) -> String {
        if self.is_composite() {
            format!("{}*", self.root())
        } else {
            self.as_str().to_string()
        }
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Ustr> for Symbol {
    fn from(value: Ustr) -> Self {
        Self(value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::identifiers::{Symbol, stubs::*};

    #[rstest]
    fn test_string_reprs(symbol_eth_perp: Symbol) {
        assert_eq!(symbol_eth_perp.as_str(), "ETH-PERP");
        assert_eq!(format!("{symbol_eth_perp}"), "ETH-PERP");
    }

    #[rstest]
    #[case("AUDUSD", false)]
    #[case("AUD/USD", false)]
    #[case("CL.FUT", true)]
    #[case("ES.c.0", true)]
    fn test_symbol_is_composite(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(Symbol::new(input).is_composite(), expected);
    }

    #[rstest]
    #[case("AUDUSD", "AUDUSD")]
    #[case("CL.FUT", "CL")]
    #[case("ES.c.0", "ES")]
    fn test_symbol_root(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Symbol::new(input).root(), expected);
    }

    #[rstest]
    #[case("AUDUSD", "AUDUSD")]
    #[case("CL.FUT", "CL*")]
    fn test_symbol_topic(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Symbol::new(input).topic(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_symbol_with_invalid_values(#[case] input: &str) {
        assert!(Symbol::new_checked(input).is_err());
    }

    #[rstest]
    fn test_interned_copies_compare_equal() {
        let a = Symbol::new("AUDUSD");
        let b = Symbol::new("AUDUSD");
        assert_eq!(a, b);
        // Interned pointers are identical for identical contents
        assert_eq!(a.inner().as_ptr(), b.inner().as_ptr());
    }
}
