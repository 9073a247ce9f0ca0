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

//! A `Currency` type with a global registry interned by code.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use meridian_core::correctness::{FAILED, check_valid_string};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

use crate::{currencies::CURRENCY_MAP, enums::CurrencyType, types::fixed::check_fixed_precision};

/// Represents a medium of exchange in a specified denomination with a fixed decimal precision.
///
/// Currencies are interned by code in a process-wide registry; equality and hashing are
/// by code only.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Currency {
    /// The currency code (e.g. "USD", "BTC").
    pub code: Ustr,
    /// The currency decimal precision.
    pub precision: u8,
    /// The ISO 4217 currency code (0 when not applicable).
    pub iso4217: u16,
    /// The currency display name.
    pub name: Ustr,
    /// The currency type, indicating its category.
    pub currency_type: CurrencyType,
}

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `code` or `name` are not valid strings.
    /// - If `precision` exceeds the maximum fixed precision.
    pub fn new_checked<T: AsRef<str>>(
        code: T,
        precision: u8,
        iso4217: u16,
        name: T,
        currency_type: CurrencyType,
    ) -> anyhow::Result<Self> {
        let code = code.as_ref();
        let name = name.as_ref();
        check_valid_string(code, stringify!(code))?;
        check_valid_string(name, stringify!(name))?;
        check_fixed_precision(precision)?;

        Ok(Self {
            code: Ustr::from(code),
            precision,
            iso4217,
            name: Ustr::from(name),
            currency_type,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Currency::new_checked`]).
    pub fn new<T: AsRef<str>>(
        code: T,
        precision: u8,
        iso4217: u16,
        name: T,
        currency_type: CurrencyType,
    ) -> Self {
        Self::new_checked(code, precision, iso4217, name, currency_type).expect(FAILED)
    }

    /// Registers the given `currency` in the global registry.
    ///
    /// An existing entry for the same code is only replaced when `overwrite` is `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry mutex is poisoned.
    pub fn register(currency: Self, overwrite: bool) -> anyhow::Result<()> {
        let mut map = CURRENCY_MAP
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire `CURRENCY_MAP` lock: {e}"))?;

        if !overwrite && map.contains_key(currency.code.as_str()) {
            return Ok(());
        }

        map.insert(currency.code.to_string(), currency);
        Ok(())
    }

    /// Returns whether a currency with the given `code` is registered.
    ///
    /// Returns `false` if the registry lock cannot be acquired.
    #[must_use]
    pub fn is_registered(code: &str) -> bool {
        CURRENCY_MAP
            .lock()
            .map(|map| map.contains_key(code))
            .unwrap_or(false)
    }

    /// Returns the [`Currency`] for the given `code` from the global registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is not registered.
    pub fn try_from_str(code: &str) -> anyhow::Result<Self> {
        CURRENCY_MAP
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire `CURRENCY_MAP` lock: {e}"))?
            .get(code)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown currency code: '{code}'"))
    }

    /// Returns whether this currency is a fiat currency.
    #[must_use]
    pub fn is_fiat(&self) -> bool {
        self.currency_type == CurrencyType::Fiat
    }

    /// Returns whether this currency is a cryptocurrency.
    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.currency_type == CurrencyType::Crypto
    }

    /// Returns whether this currency is backed by a commodity.
    #[must_use]
    pub fn is_commodity_backed(&self) -> bool {
        self.currency_type == CurrencyType::CommodityBacked
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
    }
}

impl From<&str> for Currency {
    /// Creates a [`Currency`] from a registered currency code.
    ///
    /// # Panics
    ///
    /// Panics if the currency is not registered.
    fn from(value: &str) -> Self {
        Self::try_from_str(value).expect(FAILED)
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code={}, precision={}, iso4217={}, name={}, currency_type={})",
            stringify!(Currency),
            self.code,
            self.precision,
            self.iso4217,
            self.name,
            self.currency_type,
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code: String = Deserialize::deserialize(deserializer)?;
        Self::try_from_str(&code).map_err(serde::de::Error::custom)
    }
}
