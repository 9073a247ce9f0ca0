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

//! Functions related to order book analysis.

use std::collections::BTreeMap;

use crate::{
    enums::OrderSideSpecified,
    orderbook::{BookLevel, ladder::BookPrice},
    types::{Price, Quantity},
};

/// Calculates the estimated average price to fill `qty`, walking levels from the best.
///
/// Returns `0.0` when the ladder holds no liquidity. When the ladder holds less than
/// `qty`, the average over all available liquidity is returned.
#[must_use]
pub fn get_avg_px_for_quantity(qty: Quantity, levels: &BTreeMap<BookPrice, BookLevel>) -> f64 {
    let mut cumulative_size_raw = 0u128;
    let mut cumulative_value = 0.0;

    for (book_price, level) in levels {
        let size_this_level = level.size_raw().unwrap_or(0).min(
            (u128::from(qty.raw).saturating_sub(cumulative_size_raw))
                .try_into()
                .unwrap_or(u64::MAX),
        );
        cumulative_size_raw += u128::from(size_this_level);
        cumulative_value += book_price.value.as_f64() * size_this_level as f64;

        if cumulative_size_raw >= u128::from(qty.raw) {
            break;
        }
    }

    if cumulative_size_raw == 0 {
        0.0
    } else {
        cumulative_value / cumulative_size_raw as f64
    }
}

/// Returns the cumulative size available at prices at-or-better than `price` for an
/// aggressing order of the given `side`.
#[must_use]
pub fn get_quantity_for_price(
    price: Price,
    side: OrderSideSpecified,
    levels: &BTreeMap<BookPrice, BookLevel>,
) -> f64 {
    let mut matched_size = 0.0;

    for (book_price, level) in levels {
        match side {
            OrderSideSpecified::Buy if book_price.value > price => break,
            OrderSideSpecified::Sell if book_price.value < price => break,
            _ => {}
        }
        matched_size += level.size();
    }

    matched_size
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        data::BookOrder,
        enums::OrderSide,
        orderbook::ladder::BookLadder,
    };

    fn sample_asks() -> BookLadder {
        let mut ladder = BookLadder::new(OrderSideSpecified::Sell);
        ladder
            .add(BookOrder::new(
                OrderSide::Sell,
                Price::from("100.00"),
                Quantity::from(10),
                1,
            ))
            .unwrap();
        ladder
            .add(BookOrder::new(
                OrderSide::Sell,
                Price::from("101.00"),
                Quantity::from(20),
                2,
            ))
            .unwrap();
        ladder
    }

    #[rstest]
    fn test_avg_px_empty_levels() {
        let ladder = BookLadder::new(OrderSideSpecified::Sell);
        assert_eq!(
            get_avg_px_for_quantity(Quantity::from(10), &ladder.levels),
            0.0
        );
    }

    #[rstest]
    fn test_avg_px_within_top_level() {
        let ladder = sample_asks();
        let avg = get_avg_px_for_quantity(Quantity::from(10), &ladder.levels);
        assert_eq!(avg, 100.0);
    }

    #[rstest]
    fn test_avg_px_across_levels() {
        let ladder = sample_asks();
        // 10 @ 100.00 then 10 @ 101.00
        let avg = get_avg_px_for_quantity(Quantity::from(20), &ladder.levels);
        assert_eq!(avg, 100.5);
    }

    #[rstest]
    fn test_quantity_for_price_buy() {
        let ladder = sample_asks();
        assert_eq!(
            get_quantity_for_price(Price::from("100.00"), OrderSideSpecified::Buy, &ladder.levels),
            10.0
        );
        assert_eq!(
            get_quantity_for_price(Price::from("101.00"), OrderSideSpecified::Buy, &ladder.levels),
            30.0
        );
        assert_eq!(
            get_quantity_for_price(Price::from("99.00"), OrderSideSpecified::Buy, &ladder.levels),
            0.0
        );
    }
}
