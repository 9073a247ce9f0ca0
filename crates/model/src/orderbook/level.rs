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

//! Represents a discrete price level in an order book.

use std::fmt::Display;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    data::order::{BookOrder, OrderId},
    orderbook::ladder::BookPrice,
    types::{Quantity, quantity::QuantityRaw},
};

/// Represents a discrete price level in an order book.
///
/// Orders are held in strict FIFO arrival order. An update which does not increase
/// an order's size keeps its queue position; a size increase re-queues the order at
/// the back of the level (standard price-time priority).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BookLevel {
    /// The price of the level.
    pub price: BookPrice,
    /// The orders at the level, keyed by order ID in arrival order.
    pub orders: IndexMap<OrderId, BookOrder>,
}

impl BookLevel {
    /// Creates a new [`BookLevel`] instance.
    #[must_use]
    pub fn new(price: BookPrice) -> Self {
        Self {
            price,
            orders: IndexMap::new(),
        }
    }

    /// Creates a new [`BookLevel`] instance from the given `order`.
    #[must_use]
    pub fn from_order(order: BookOrder) -> Self {
        let mut level = Self::new(order.to_book_price());
        level.orders.insert(order.order_id, order);
        level
    }

    /// Returns the number of orders at the level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns whether the level holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the order at the front of the queue, if any.
    #[must_use]
    pub fn first(&self) -> Option<&BookOrder> {
        self.orders.values().next()
    }

    /// Returns the orders in FIFO queue order.
    #[must_use]
    pub fn get_orders(&self) -> Vec<BookOrder> {
        self.orders.values().copied().collect()
    }

    /// Returns an iterator over the orders in FIFO queue order.
    pub fn iter(&self) -> impl Iterator<Item = &BookOrder> {
        self.orders.values()
    }

    /// Returns the total size of all orders at the level as an `f64`.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.orders.values().map(|o| o.size.as_f64()).sum()
    }

    /// Returns the total raw size of all orders at the level, or `None` on overflow.
    #[must_use]
    pub fn size_raw(&self) -> Option<QuantityRaw> {
        self.orders
            .values()
            .try_fold(0 as QuantityRaw, |acc, o| acc.checked_add(o.size.raw))
    }

    /// Returns the total size of all orders at the level as a [`Quantity`].
    ///
    /// The precision is the maximum precision among the level's orders.
    ///
    /// # Panics
    ///
    /// Panics if aggregating the raw sizes overflows (callers pre-check on insertion).
    #[must_use]
    pub fn size_qty(&self) -> Quantity {
        let precision = self
            .orders
            .values()
            .map(|o| o.size.precision)
            .max()
            .unwrap_or(0);
        let raw = self
            .size_raw()
            .expect("Overflow aggregating level size");
        Quantity::from_raw(raw, precision)
    }

    /// Returns the total size of all orders at the level as a `Decimal`.
    #[must_use]
    pub fn size_decimal(&self) -> Decimal {
        self.orders.values().map(|o| o.size.as_decimal()).sum()
    }

    /// Returns the total value exposure (price * size) of all orders at the level.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.orders.values().map(BookOrder::exposure).sum()
    }

    /// Adds the given `order` to the back of the queue.
    pub fn add(&mut self, order: BookOrder) {
        debug_assert_eq!(
            order.price, self.price.value,
            "order price {} did not match level price {}",
            order.price, self.price.value
        );
        self.orders.insert(order.order_id, order);
    }

    /// Updates the order with a matching ID.
    ///
    /// The queue position is preserved when the size did not increase, otherwise the
    /// order is re-queued at the back of the level. A zero size removes the order.
    pub fn update(&mut self, order: BookOrder) {
        if order.size.raw == 0 {
            self.orders.shift_remove(&order.order_id);
            return;
        }

        match self.orders.get_mut(&order.order_id) {
            Some(existing) if order.size.raw <= existing.size.raw => {
                *existing = order;
            }
            _ => {
                // Size increased (or unseen): lose queue priority
                self.orders.shift_remove(&order.order_id);
                self.orders.insert(order.order_id, order);
            }
        }
    }

    /// Removes the order with a matching ID, returning it if present.
    pub fn delete(&mut self, order_id: OrderId) -> Option<BookOrder> {
        self.orders.shift_remove(&order_id)
    }
}

impl Display for BookLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(price={}, len={})",
            stringify!(BookLevel),
            self.price,
            self.orders.len(),
        )
    }
}
