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

//! The market-data domain model for the Meridian trading engine.
//!
//! The *model* crate defines the value types every price and size flows through, the
//! interned identifiers, the market-data event types, and the limit order book engine:
//!
//! - Fixed-precision numeric primitives (`Price`, `Quantity`, `Money`, `Currency`).
//! - Interned identifiers (`InstrumentId`, `Symbol`, `Venue`, `TradeId`, ...).
//! - Market-data events (`QuoteTick`, `TradeTick`, `Bar`, `OrderBookDelta`).
//! - The `OrderBook` engine with L1/L2/L3 semantics.
//!
//! All event structs are immutable value types; identifiers and currency codes are backed
//! by a process-wide append-only string interner so copies are O(1).

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod currencies;
pub mod data;
pub mod enums;
pub mod identifiers;
pub mod orderbook;
pub mod types;

/// Implements `Serialize`/`Deserialize` for an enum via its stable `strum` string form.
#[macro_export]
macro_rules! enum_strum_serde {
    ($type:ty) => {
        impl Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value_str: String = Deserialize::deserialize(deserializer)?;
                std::str::FromStr::from_str(&value_str).map_err(serde::de::Error::custom)
            }
        }
    };
}
