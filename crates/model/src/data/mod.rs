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

//! Data types for the trading domain model.
//!
//! Events are immutable value types; the closed [`Data`] sum covers the wire and
//! persistence surface, with trait dispatch only where consumers vary per type.

pub mod bar;
pub mod delta;
pub mod deltas;
pub mod order;
pub mod quote;
pub mod trade;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

use meridian_core::UnixNanos;
use serde::{Deserialize, Serialize};

// Re-exports
pub use bar::{Bar, BarSpecification, BarType};
pub use delta::OrderBookDelta;
pub use deltas::OrderBookDeltas;
pub use order::{BookOrder, NULL_ORDER};
pub use quote::QuoteTick;
pub use trade::TradeTick;

use crate::identifiers::InstrumentId;

/// A built-in market-data event type.
///
/// A closed sum over the concrete event types, for wire and persistence handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Data {
    Delta(OrderBookDelta),
    Deltas(OrderBookDeltas),
    Quote(QuoteTick),
    Trade(TradeTick),
    Bar(Bar),
}

impl Data {
    /// Returns the instrument ID for the data.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Delta(delta) => delta.instrument_id,
            Self::Deltas(deltas) => deltas.instrument_id,
            Self::Quote(quote) => quote.instrument_id,
            Self::Trade(trade) => trade.instrument_id,
            Self::Bar(bar) => bar.bar_type.instrument_id(),
        }
    }

    /// Returns whether the data is a type of order book data.
    #[must_use]
    pub fn is_order_book_data(&self) -> bool {
        matches!(self, Self::Delta(_) | Self::Deltas(_))
    }
}

/// Types which carry a UNIX initialization timestamp in nanoseconds.
pub trait HasTsInit {
    /// Returns the UNIX timestamp (nanoseconds) when the instance was initialized.
    fn ts_init(&self) -> UnixNanos;
}

impl HasTsInit for Data {
    fn ts_init(&self) -> UnixNanos {
        match self {
            Self::Delta(d) => d.ts_init,
            Self::Deltas(d) => d.ts_init,
            Self::Quote(q) => q.ts_init,
            Self::Trade(t) => t.ts_init,
            Self::Bar(b) => b.ts_init,
        }
    }
}

/// Returns whether the given `data` slice is monotonically increasing by `ts_init`.
#[must_use]
pub fn is_monotonically_increasing_by_init<T: HasTsInit>(data: &[T]) -> bool {
    data.windows(2)
        .all(|window| window[0].ts_init() <= window[1].ts_init())
}

macro_rules! impl_try_from_data {
    ($variant:ident, $type:ty) => {
        impl TryFrom<Data> for $type {
            type Error = ();

            fn try_from(value: Data) -> Result<Self, Self::Error> {
                match value {
                    Data::$variant(x) => Ok(x),
                    _ => Err(()),
                }
            }
        }

        impl From<$type> for Data {
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_try_from_data!(Delta, OrderBookDelta);
impl_try_from_data!(Deltas, OrderBookDeltas);
impl_try_from_data!(Quote, QuoteTick);
impl_try_from_data!(Trade, TradeTick);
impl_try_from_data!(Bar, Bar);

/// Extracts all values of a concrete event type from the given `data`.
#[must_use]
pub fn to_variant<T: TryFrom<Data>>(data: Vec<Data>) -> Vec<T> {
    data.into_iter()
        .filter_map(|d| T::try_from(d).ok())
        .collect()
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{stubs::*, *};

    #[rstest]
    fn test_data_instrument_id_dispatch(
        quote_ethusdt_binance: QuoteTick,
        stub_trade_ethusdt_buyer: TradeTick,
        stub_bar: Bar,
        stub_delta: OrderBookDelta,
    ) {
        assert_eq!(
            Data::from(quote_ethusdt_binance).instrument_id(),
            InstrumentId::from("ETHUSDT.BINANCE")
        );
        assert_eq!(
            Data::from(stub_trade_ethusdt_buyer).instrument_id(),
            InstrumentId::from("ETHUSDT.BINANCE")
        );
        assert_eq!(
            Data::from(stub_bar).instrument_id(),
            InstrumentId::from("AUD/USD.SIM")
        );
        assert_eq!(
            Data::from(stub_delta).instrument_id(),
            InstrumentId::from("AAPL.XNAS")
        );
    }

    #[rstest]
    fn test_is_order_book_data(stub_delta: OrderBookDelta, stub_bar: Bar) {
        assert!(Data::from(stub_delta).is_order_book_data());
        assert!(!Data::from(stub_bar).is_order_book_data());
    }

    #[rstest]
    fn test_to_variant(quote_ethusdt_binance: QuoteTick, stub_delta: OrderBookDelta) {
        let data = vec![Data::from(quote_ethusdt_binance), Data::from(stub_delta)];
        let quotes: Vec<QuoteTick> = to_variant(data);
        assert_eq!(quotes, vec![quote_ethusdt_binance]);
    }

    #[rstest]
    fn test_is_monotonically_increasing_by_init(
        quote_ethusdt_binance: QuoteTick,
        stub_delta: OrderBookDelta,
    ) {
        // Quote ts_init = 0, delta ts_init = 2
        let increasing = vec![Data::from(quote_ethusdt_binance), Data::from(stub_delta)];
        assert!(is_monotonically_increasing_by_init(&increasing));

        let decreasing = vec![Data::from(stub_delta), Data::from(quote_ethusdt_binance)];
        assert!(!is_monotonically_increasing_by_init(&decreasing));
    }
}
