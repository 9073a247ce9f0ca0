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

//! Fixture functions to provide stub data events for testing.

use meridian_core::UnixNanos;
use rstest::fixture;

use crate::{
    data::{
        Bar, BarSpecification, BarType, BookOrder, OrderBookDelta, QuoteTick, TradeTick,
    },
    enums::{AggregationSource, AggressorSide, BarAggregation, BookAction, OrderSide, PriceType},
    identifiers::{InstrumentId, TradeId},
    types::{Price, Quantity},
};

#[fixture]
pub fn quote_ethusdt_binance() -> QuoteTick {
    QuoteTick::new(
        InstrumentId::from("ETHUSDT.BINANCE"),
        Price::from("10000.0000"),
        Price::from("10001.0000"),
        Quantity::from("1.00000000"),
        Quantity::from("1.00000000"),
        UnixNanos::from(0),
        UnixNanos::from(0),
    )
}

#[fixture]
pub fn quote_audusd_sim() -> QuoteTick {
    QuoteTick::new(
        InstrumentId::from("AUD/USD.SIM"),
        Price::from("1.00000"),
        Price::from("1.00010"),
        Quantity::from(100_000),
        Quantity::from(100_000),
        UnixNanos::from(0),
        UnixNanos::from(0),
    )
}

#[fixture]
pub fn stub_trade_ethusdt_buyer() -> TradeTick {
    TradeTick::new(
        InstrumentId::from("ETHUSDT.BINANCE"),
        Price::from("10000.0000"),
        Quantity::from("1.00000000"),
        AggressorSide::Buyer,
        TradeId::from("123456789"),
        UnixNanos::from(0),
        UnixNanos::from(0),
    )
}

#[fixture]
pub fn stub_bar() -> Bar {
    let bar_type = BarType::new(
        InstrumentId::from("AUD/USD.SIM"),
        BarSpecification::new(1, BarAggregation::Minute, PriceType::Bid),
        AggregationSource::External,
    );
    Bar::new(
        bar_type,
        Price::from("1.00002"),
        Price::from("1.00010"),
        Price::from("1.00000"),
        Price::from("1.00007"),
        Quantity::from(100_000),
        UnixNanos::from(0),
        UnixNanos::from(1),
    )
}

#[fixture]
pub fn stub_delta() -> OrderBookDelta {
    OrderBookDelta::new(
        InstrumentId::from("AAPL.XNAS"),
        BookAction::Add,
        BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from(10),
            123_456,
        ),
        0,
        1,
        UnixNanos::from(1),
        UnixNanos::from(2),
    )
}
