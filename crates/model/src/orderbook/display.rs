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

//! Functions for pretty printing order book state.

use tabled::{Table, Tabled, settings::Style};

use crate::orderbook::OrderBook;

#[derive(Tabled)]
struct BookRow {
    bids: String,
    price: String,
    asks: String,
}

/// Returns a formatted string table of the top `num_levels` of the given `book`.
#[must_use]
pub fn pprint_book(book: &OrderBook, num_levels: usize) -> String {
    // Collect prices from best ask (highest displayed first) down to best bid
    let mut ask_rows: Vec<BookRow> = book
        .asks(Some(num_levels))
        .map(|level| BookRow {
            bids: String::new(),
            price: level.price.value.to_string(),
            asks: format!("{:?}", level.get_orders().iter().map(|o| o.size.to_string()).collect::<Vec<_>>()),
        })
        .collect();
    ask_rows.reverse();

    let bid_rows: Vec<BookRow> = book
        .bids(Some(num_levels))
        .map(|level| BookRow {
            bids: format!("{:?}", level.get_orders().iter().map(|o| o.size.to_string()).collect::<Vec<_>>()),
            price: level.price.value.to_string(),
            asks: String::new(),
        })
        .collect();

    let mut table = Table::new(ask_rows.into_iter().chain(bid_rows));
    table.with(Style::rounded());
    table.to_string()
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_core::UnixNanos;
    use rstest::rstest;

    use super::*;
    use crate::{
        data::BookOrder,
        enums::{BookType, OrderSide},
        identifiers::InstrumentId,
        types::{Price, Quantity},
    };

    #[rstest]
    fn test_pprint_book() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(
            BookOrder::new(OrderSide::Buy, Price::from("99.00"), Quantity::from(5), 1),
            1,
            UnixNanos::from(1),
        )
        .unwrap();
        book.add(
            BookOrder::new(OrderSide::Sell, Price::from("101.00"), Quantity::from(3), 2),
            2,
            UnixNanos::from(2),
        )
        .unwrap();

        let output = pprint_book(&book, 3);
        assert!(output.contains("99.00"));
        assert!(output.contains("101.00"));
        assert!(output.contains("bids"));
        assert!(output.contains("asks"));
    }
}
