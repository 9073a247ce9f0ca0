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

//! Represents a ladder of price levels for one side of an order book.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt::{Debug, Display},
};

use ahash::AHashMap;

use crate::{
    data::order::{BookOrder, OrderId},
    enums::OrderSideSpecified,
    orderbook::{BookLevel, error::BookError},
    types::{Price, Quantity},
};

/// Represents a price level with a specified side in an order books ladder.
///
/// Ordering is side-dependent so the best price is always the minimum key:
/// the buy side sorts descending by price, the sell side ascending. Instances
/// are only comparable within the same side.
#[derive(Clone, Copy, Debug, Eq)]
pub struct BookPrice {
    /// The price value.
    pub value: Price,
    /// The specified order side.
    pub side: OrderSideSpecified,
}

impl BookPrice {
    /// Creates a new [`BookPrice`] instance.
    #[must_use]
    pub fn new(value: Price, side: OrderSideSpecified) -> Self {
        Self { value, side }
    }
}

impl PartialEq for BookPrice {
    fn eq(&self, other: &Self) -> bool {
        self.side == other.side && self.value == other.value
    }
}

impl PartialOrd for BookPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert_eq!(
            self.side, other.side,
            "`BookPrice` compared across sides: {:?} vs {:?}",
            self.side, other.side
        );

        match self.side {
            OrderSideSpecified::Buy => other.value.cmp(&self.value),
            OrderSideSpecified::Sell => self.value.cmp(&other.value),
        }
    }
}

impl Display for BookPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a ladder of price levels for one side of an order book.
///
/// Maintains an auxiliary index from order ID to the containing price for O(1)
/// updates and removals; the index and the level contents are in bijection after
/// every successful operation.
#[derive(Clone, Debug)]
pub struct BookLadder {
    /// The specified side of the ladder.
    pub side: OrderSideSpecified,
    /// The price levels, keyed so the first entry is always the best price.
    pub levels: BTreeMap<BookPrice, BookLevel>,
    /// The index from order ID to containing price.
    pub cache: AHashMap<OrderId, BookPrice>,
}

impl BookLadder {
    /// Creates a new [`BookLadder`] instance.
    #[must_use]
    pub fn new(side: OrderSideSpecified) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            cache: AHashMap::new(),
        }
    }

    /// Returns the number of price levels in the ladder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns whether the ladder has no price levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Removes all orders and price levels from the ladder.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.cache.clear();
    }

    /// Adds an order to the ladder at its price level.
    ///
    /// Zero-size orders are dropped with a warning (producers should not emit them).
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the order ID is already present in the ladder ([`BookError::DuplicateOrderId`]).
    /// - If aggregating the level size would overflow ([`BookError::Overflow`]).
    pub fn add(&mut self, order: BookOrder) -> Result<(), BookError> {
        if !order.size.is_positive() {
            log::warn!(
                "Attempted to add order with non-positive size: order_id={}, size={}, ignoring",
                order.order_id,
                order.size,
            );
            return Ok(());
        }

        if self.cache.contains_key(&order.order_id) {
            return Err(BookError::DuplicateOrderId {
                order_id: order.order_id,
                side: self.side,
            });
        }

        let book_price = order.to_book_price();

        if let Some(level) = self.levels.get(&book_price) {
            let aggregate = level
                .size_raw()
                .and_then(|total| total.checked_add(order.size.raw));
            if aggregate.is_none() {
                return Err(BookError::Overflow {
                    price: book_price.value,
                });
            }
        }

        self.cache.insert(order.order_id, book_price);
        match self.levels.get_mut(&book_price) {
            Some(level) => level.add(order),
            None => {
                self.levels.insert(book_price, BookLevel::from_order(order));
            }
        }

        self.check_integrity();
        Ok(())
    }

    /// Updates an existing order in the ladder, moving it to a new price level if needed.
    ///
    /// A price change or size increase re-queues the order at the back of its (new)
    /// level; a zero size removes the order.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the order ID is not present in the ladder ([`BookError::UnknownOrderId`]).
    /// - If moving the order to a new level would overflow ([`BookError::Overflow`]).
    pub fn update(&mut self, order: BookOrder) -> Result<(), BookError> {
        let Some(price) = self.cache.get(&order.order_id).copied() else {
            return Err(BookError::UnknownOrderId {
                order_id: order.order_id,
                side: self.side,
            });
        };

        if order.price == price.value {
            // SAFETY: Cache entry guarantees the level exists
            let level = self.levels.get_mut(&price).expect("Ladder index corrupt");
            level.update(order);

            if order.size.raw == 0 {
                self.cache.remove(&order.order_id);
            }
            if level.is_empty() {
                self.levels.remove(&price);
            }

            self.check_integrity();
            return Ok(());
        }

        // Price moved: verify the target level can absorb the order before mutating
        if order.size.is_positive()
            && let Some(level) = self.levels.get(&order.to_book_price())
            && level
                .size_raw()
                .and_then(|total| total.checked_add(order.size.raw))
                .is_none()
        {
            return Err(BookError::Overflow { price: order.price });
        }

        self.remove(order.order_id)?;
        if order.size.is_positive() {
            self.add(order)?;
        }

        self.check_integrity();
        Ok(())
    }

    /// Removes an order by its ID from the ladder, returning the removed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order ID is not present in the ladder.
    pub fn remove(&mut self, order_id: OrderId) -> Result<BookOrder, BookError> {
        let Some(price) = self.cache.remove(&order_id) else {
            return Err(BookError::UnknownOrderId {
                order_id,
                side: self.side,
            });
        };

        // SAFETY: Cache entry guarantees the level exists
        let level = self.levels.get_mut(&price).expect("Ladder index corrupt");
        let order = level.delete(order_id).expect("Ladder index corrupt");
        if level.is_empty() {
            self.levels.remove(&price);
        }

        self.check_integrity();
        Ok(order)
    }

    /// Removes an entire price level from the ladder and returns it.
    pub fn remove_level(&mut self, price: BookPrice) -> Option<BookLevel> {
        let level = self.levels.remove(&price)?;
        for order_id in level.orders.keys() {
            self.cache.remove(order_id);
        }

        self.check_integrity();
        Some(level)
    }

    /// Returns the order with the given ID, if present in the ladder.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&BookOrder> {
        let price = self.cache.get(&order_id)?;
        self.levels.get(price)?.orders.get(&order_id)
    }

    /// Returns the best price level in the ladder.
    #[must_use]
    pub fn top(&self) -> Option<&BookLevel> {
        self.levels.values().next()
    }

    /// Returns the total size of all orders in the ladder.
    #[must_use]
    pub fn sizes(&self) -> f64 {
        self.levels.values().map(BookLevel::size).sum()
    }

    /// Returns the total value exposure (price * size) of all orders in the ladder.
    #[must_use]
    pub fn exposures(&self) -> f64 {
        self.levels.values().map(BookLevel::exposure).sum()
    }

    /// Returns the `num_levels` best levels as `(price, aggregate size)` pairs.
    #[must_use]
    pub fn depth(&self, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .values()
            .take(num_levels)
            .map(|level| (level.price.value, level.size_qty()))
            .collect()
    }

    /// Simulates fills for an aggressing order against this ladder's liquidity.
    ///
    /// Returns the `(price, size)` portions consumed, walking levels from the best
    /// and orders in FIFO queue order, bounded by the order's limit price.
    #[must_use]
    pub fn simulate_fills(&self, order: &BookOrder) -> Vec<(Price, Quantity)> {
        let is_reversed = self.side == OrderSideSpecified::Buy;
        let mut fills = Vec::new();
        let mut cumulative = Quantity::zero(order.size.precision);
        let target = order.size;

        for level in self.levels.values() {
            if (is_reversed && level.price.value < order.price)
                || (!is_reversed && level.price.value > order.price)
            {
                break;
            }

            for book_order in level.orders.values() {
                let current = book_order.size;
                if cumulative + current >= target {
                    // This order fills the remainder
                    let remainder = target - cumulative;
                    if remainder.is_positive() {
                        fills.push((book_order.price, remainder));
                    }
                    return fills;
                }

                fills.push((book_order.price, current));
                cumulative = cumulative + current;
            }
        }

        fills
    }

    /// Validates that the order ID index and level contents are in bijection
    /// (debug builds only).
    fn check_integrity(&self) {
        debug_assert_eq!(
            self.cache.len(),
            self.levels.values().map(BookLevel::len).sum::<usize>(),
            "Ladder cache size should equal total orders across all levels"
        );
        debug_assert!(
            self.cache
                .iter()
                .all(|(order_id, price)| self
                    .levels
                    .get(price)
                    .is_some_and(|level| level.orders.contains_key(order_id))),
            "Ladder cache should map every order to its containing level"
        );
    }
}

impl Display for BookLadder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}(side={})", stringify!(BookLadder), self.side)?;
        for (price, level) in &self.levels {
            writeln!(f, "  {} -> {} orders", price, level.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl BookLadder {
    /// Adds multiple orders to the ladder.
    pub fn add_bulk(&mut self, orders: &[BookOrder]) {
        for order in orders {
            self.add(*order).unwrap();
        }
    }
}
