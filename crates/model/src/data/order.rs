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

//! A `BookOrder` for use with the `OrderBook` and `OrderBookDelta` data type.

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use meridian_core::serialization::Serializable;
use serde::{Deserialize, Serialize};

use crate::{
    enums::OrderSide,
    orderbook::BookPrice,
    types::{Price, Quantity},
};

/// The type of order book order IDs.
pub type OrderId = u64;

/// Represents a NULL book order (used with the `Clear` action or where an order is not specified).
pub const NULL_ORDER: BookOrder = BookOrder {
    side: OrderSide::NoOrderSide,
    price: Price {
        raw: 0,
        precision: 0,
    },
    size: Quantity {
        raw: 0,
        precision: 0,
    },
    order_id: 0,
};

/// Represents an order in a book.
#[repr(C)]
#[derive(Clone, Copy, Eq, Serialize, Deserialize)]
pub struct BookOrder {
    /// The order side.
    pub side: OrderSide,
    /// The order price.
    pub price: Price,
    /// The order size.
    pub size: Quantity,
    /// The order ID.
    pub order_id: OrderId,
}

impl BookOrder {
    /// Creates a new [`BookOrder`] instance.
    #[must_use]
    pub fn new(side: OrderSide, price: Price, size: Quantity, order_id: OrderId) -> Self {
        Self {
            side,
            price,
            size,
            order_id,
        }
    }

    /// Returns a [`BookPrice`] from this order.
    ///
    /// # Panics
    ///
    /// Panics if the order side is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn to_book_price(&self) -> BookPrice {
        BookPrice::new(self.price, self.side.as_specified())
    }

    /// Returns the order exposure (price * size) as an `f64`.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.price.as_f64() * self.size.as_f64()
    }

    /// Returns the signed order size as an `f64` (negative for SELL).
    ///
    /// # Panics
    ///
    /// Panics if the order side is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn signed_size(&self) -> f64 {
        match self.side {
            OrderSide::Buy => self.size.as_f64(),
            OrderSide::Sell => -(self.size.as_f64()),
            _ => panic!("Book integrity error: no order side for order {}", self.order_id),
        }
    }
}

impl Default for BookOrder {
    /// Creates a NULL [`BookOrder`] instance.
    fn default() -> Self {
        NULL_ORDER
    }
}

impl PartialEq for BookOrder {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl Hash for BookOrder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}

impl Debug for BookOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(side={}, price={}, size={}, order_id={})",
            stringify!(BookOrder),
            self.side,
            self.price,
            self.size,
            self.order_id,
        )
    }
}

impl Display for BookOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.side, self.price, self.size, self.order_id,
        )
    }
}

impl Serializable for BookOrder {}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new() {
        let order = BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from("10"),
            123_456,
        );

        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.price, Price::from("100.00"));
        assert_eq!(order.size, Quantity::from("10"));
        assert_eq!(order.order_id, 123_456);
    }

    #[rstest]
    fn test_to_book_price() {
        let order = BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from("10"),
            1,
        );
        let book_price = order.to_book_price();
        assert_eq!(book_price.value, order.price);
        assert_eq!(book_price.side, OrderSide::Buy.as_specified());
    }

    #[rstest]
    fn test_exposure() {
        let order = BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from("10"),
            1,
        );
        assert_eq!(order.exposure(), 1000.0);
    }

    #[rstest]
    fn test_signed_size() {
        let price = Price::from("100.00");
        let size = Quantity::from("10");

        let buy = BookOrder::new(OrderSide::Buy, price, size, 1);
        assert_eq!(buy.signed_size(), 10.0);

        let sell = BookOrder::new(OrderSide::Sell, price, size, 1);
        assert_eq!(sell.signed_size(), -10.0);
    }

    #[rstest]
    #[should_panic(expected = "no order side")]
    fn test_signed_size_no_side_panics() {
        let _ = NULL_ORDER.signed_size();
    }

    #[rstest]
    fn test_equality_by_order_id() {
        let a = BookOrder::new(OrderSide::Buy, Price::from("1.0"), Quantity::from(1), 7);
        let b = BookOrder::new(OrderSide::Buy, Price::from("2.0"), Quantity::from(2), 7);
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_debug() {
        let order = BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from(10),
            123_456,
        );
        assert_eq!(
            format!("{order:?}"),
            "BookOrder(side=BUY, price=100.00, size=10, order_id=123456)"
        );
    }

    #[rstest]
    fn test_display() {
        let order = BookOrder::new(
            OrderSide::Buy,
            Price::from("100.00"),
            Quantity::from(10),
            123_456,
        );
        assert_eq!(format!("{order}"), "BUY,100.00,10,123456");
    }
}
