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

//! A performant, generic, multi-purpose order book.

use std::fmt::Display;

use meridian_core::UnixNanos;

use super::{analysis, display::pprint_book, level::BookLevel};
use crate::{
    data::{
        BookOrder, OrderBookDelta, OrderBookDeltas,
        order::OrderId,
    },
    enums::{BookAction, BookType, OrderSide, OrderSideSpecified, RecordFlag},
    identifiers::InstrumentId,
    orderbook::{error::BookError, ladder::BookLadder},
    types::{Price, Quantity, fixed::correct_raw_i64},
};

/// Provides a high-performance, versatile order book.
///
/// Maintains buy (bid) and sell (ask) orders in price-time priority, supporting
/// multiple market data granularities:
/// - L3 (MBO): market by order, tracks individual orders with venue order IDs.
/// - L2 (MBP): market by price, one logical order per level keyed by price.
/// - L1 (TBBO): top-of-book only, one level per side.
#[derive(Clone, Debug)]
pub struct OrderBook {
    /// The instrument ID for the order book.
    pub instrument_id: InstrumentId,
    /// The order book type (granularity).
    pub book_type: BookType,
    /// The last event sequence number applied to the order book.
    pub sequence: u64,
    /// The timestamp of the last event applied to the order book.
    pub ts_last: UnixNanos,
    /// The current count of updates applied to the order book.
    pub update_count: u64,
    pub(crate) bids: BookLadder,
    pub(crate) asks: BookLadder,
}

impl PartialEq for OrderBook {
    fn eq(&self, other: &Self) -> bool {
        self.instrument_id == other.instrument_id && self.book_type == other.book_type
    }
}

impl Eq for OrderBook {}

impl Display for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, book_type={}, update_count={})",
            stringify!(OrderBook),
            self.instrument_id,
            self.book_type,
            self.update_count,
        )
    }
}

impl OrderBook {
    /// Creates a new [`OrderBook`] instance.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, book_type: BookType) -> Self {
        Self {
            instrument_id,
            book_type,
            sequence: 0,
            ts_last: UnixNanos::default(),
            update_count: 0,
            bids: BookLadder::new(OrderSideSpecified::Buy),
            asks: BookLadder::new(OrderSideSpecified::Sell),
        }
    }

    /// Resets the order book to its initial empty state.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.sequence = 0;
        self.ts_last = UnixNanos::default();
        self.update_count = 0;
    }

    /// Adds an order to the book after preprocessing based on book type.
    ///
    /// For L1_TBBO books an add replaces the side's single level; for L2_MBP the order
    /// is keyed by price and an add at a known price aggregates into the level.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `order.side` is not specified ([`BookError::NoOrderSide`]).
    /// - If the price would cross the opposite side of an L2/L3 book
    ///   ([`BookError::CrossedBook`]); apply crossing orders through
    ///   [`OrderBook::apply_delta`], which resolves against the stale side instead.
    /// - If the order ID is already present on an L3_MBO book ([`BookError::DuplicateOrderId`]).
    /// - If aggregating the level size would overflow ([`BookError::Overflow`]).
    pub fn add(
        &mut self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = order_side_checked(&order)?;
        let book_type = self.book_type;
        let order = pre_process_order(book_type, order);
        self.check_uncrossed(side, order.price)?;
        let ladder = self.ladder_mut(side);

        match book_type {
            BookType::L1_TBBO => {
                // Top-of-book replacement
                ladder.clear();
                ladder.add(order)?;
            }
            BookType::L2_MBP => {
                // One logical order per level; adds at a known price aggregate into it
                if let Some(existing) = ladder.get(order.order_id).copied() {
                    let Some(raw) = existing.size.raw.checked_add(order.size.raw) else {
                        return Err(BookError::Overflow { price: order.price });
                    };
                    let size = Quantity::from_raw(
                        raw,
                        existing.size.precision.max(order.size.precision),
                    );
                    ladder.remove(order.order_id)?;
                    ladder.add(BookOrder { size, ..order })?;
                } else {
                    ladder.add(order)?;
                }
            }
            BookType::L3_MBO => ladder.add(order)?,
        }

        self.increment(sequence, ts_event);
        Ok(())
    }

    /// Updates an existing order in the book after preprocessing based on book type.
    ///
    /// For L3_MBO books the queue position is preserved when the price is unchanged
    /// and the size did not increase, otherwise the order moves to the tail of its
    /// (new) level. A zero size removes the order.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `order.side` is not specified ([`BookError::NoOrderSide`]).
    /// - If the new price would cross the opposite side of an L2/L3 book
    ///   ([`BookError::CrossedBook`]); apply crossing orders through
    ///   [`OrderBook::apply_delta`], which resolves against the stale side instead.
    /// - If the order ID is unknown on an L3_MBO book ([`BookError::UnknownOrderId`]).
    /// - If aggregating the level size would overflow ([`BookError::Overflow`]).
    pub fn update(
        &mut self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = order_side_checked(&order)?;
        let book_type = self.book_type;
        let order = pre_process_order(book_type, order);
        self.check_uncrossed(side, order.price)?;
        let ladder = self.ladder_mut(side);

        match book_type {
            BookType::L1_TBBO => {
                // Updates replace the top-of-book level
                ladder.clear();
                if order.size.is_positive() {
                    ladder.add(order)?;
                }
            }
            BookType::L2_MBP => {
                if ladder.cache.contains_key(&order.order_id) {
                    if order.size.is_positive() {
                        ladder.update(order)?;
                    } else {
                        ladder.remove(order.order_id)?;
                    }
                } else if order.size.is_positive() {
                    // Aggregated feeds update unseen levels directly
                    ladder.add(order)?;
                }
            }
            BookType::L3_MBO => ladder.update(order)?,
        }

        self.increment(sequence, ts_event);
        Ok(())
    }

    /// Deletes an order from the book after preprocessing based on book type.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `order.side` is not specified ([`BookError::NoOrderSide`]).
    /// - If the order ID is not present in the book ([`BookError::UnknownOrderId`]).
    pub fn delete(
        &mut self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = order_side_checked(&order)?;
        let order = pre_process_order(self.book_type, order);
        self.ladder_mut(side).remove(order.order_id)?;

        self.increment(sequence, ts_event);
        Ok(())
    }

    /// Clears all orders from both sides of the book.
    pub fn clear(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.bids.clear();
        self.asks.clear();
        self.increment(sequence, ts_event);
    }

    /// Clears all orders from the given side of the book.
    pub fn clear_side(&mut self, side: OrderSideSpecified, sequence: u64, ts_event: UnixNanos) {
        self.ladder_mut(side).clear();
        self.increment(sequence, ts_event);
    }

    /// Applies a single order book delta operation.
    ///
    /// An `Add` or `Update` which crosses an L2/L3 book treats the incoming (newer)
    /// side as authoritative: stale opposite-side levels at prices crossing the
    /// incoming order are removed first, in priority order, and the removals are
    /// returned as synthetic `Delete` deltas. The list is usually empty. L1_TBBO
    /// books accept crossed quotes as-is (stale snapshot tolerance).
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the delta's instrument ID does not match this book ([`BookError::InstrumentMismatch`]).
    /// - If the delta's sequence number is not greater than the last applied
    ///   ([`BookError::StaleDelta`]); unsequenced (0) and snapshot-flagged deltas bypass
    ///   the check.
    /// - If the dispatched operation fails (see [`OrderBook::add`], [`OrderBook::update`],
    ///   [`OrderBook::delete`]); [`BookError::CrossedBook`] is never returned from this
    ///   path.
    pub fn apply_delta(&mut self, delta: &OrderBookDelta) -> Result<Vec<OrderBookDelta>, BookError> {
        if delta.instrument_id != self.instrument_id {
            return Err(BookError::InstrumentMismatch {
                book_instrument_id: self.instrument_id,
                delta_instrument_id: delta.instrument_id,
            });
        }

        let is_snapshot = RecordFlag::F_SNAPSHOT.matches(delta.flags);
        if delta.sequence != 0
            && self.sequence != 0
            && delta.sequence <= self.sequence
            && !is_snapshot
        {
            return Err(BookError::StaleDelta {
                sequence: delta.sequence,
                last_sequence: self.sequence,
            });
        }

        let sequence = delta.sequence;
        let ts_event = delta.ts_event;

        match delta.action {
            BookAction::Add => {
                let side = order_side_checked(&delta.order)?;
                self.check_l3_order_id(BookAction::Add, side, delta.order.order_id)?;
                let removals = self.uncross(side, delta.order.price, ts_event);
                self.add(delta.order, sequence, ts_event)?;
                Ok(removals)
            }
            BookAction::Update => {
                let side = order_side_checked(&delta.order)?;
                self.check_l3_order_id(BookAction::Update, side, delta.order.order_id)?;
                let removals = self.uncross(side, delta.order.price, ts_event);
                self.update(delta.order, sequence, ts_event)?;
                Ok(removals)
            }
            BookAction::Delete => {
                self.delete(delta.order, sequence, ts_event)?;
                Ok(Vec::new())
            }
            BookAction::Clear => {
                self.clear(sequence, ts_event);
                Ok(Vec::new())
            }
        }
    }

    /// Applies multiple order book delta operations.
    ///
    /// On success, returns the accumulated synthetic `Delete` deltas produced by
    /// crossed-book resolution across the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if any individual delta application fails
    /// (see [`OrderBook::apply_delta`]).
    pub fn apply_deltas(
        &mut self,
        deltas: &OrderBookDeltas,
    ) -> Result<Vec<OrderBookDelta>, BookError> {
        let mut removals = Vec::new();
        for delta in &deltas.deltas {
            removals.extend(self.apply_delta(delta)?);
        }
        Ok(removals)
    }

    /// Checks that an order at `price` would not cross the opposite side (L2/L3 only).
    fn check_uncrossed(&self, side: OrderSideSpecified, price: Price) -> Result<(), BookError> {
        if self.book_type == BookType::L1_TBBO {
            return Ok(());
        }

        match side {
            OrderSideSpecified::Buy => {
                if let Some(ask) = self.best_ask_price()
                    && price >= ask
                {
                    return Err(BookError::CrossedBook { bid: price, ask });
                }
            }
            OrderSideSpecified::Sell => {
                if let Some(bid) = self.best_bid_price()
                    && price <= bid
                {
                    return Err(BookError::CrossedBook { bid, ask: price });
                }
            }
        }

        Ok(())
    }

    /// Pre-validates an L3 order ID so a failed delta leaves the book unchanged
    /// (the dispatched operation would otherwise fail after uncrossing).
    fn check_l3_order_id(
        &self,
        action: BookAction,
        side: OrderSideSpecified,
        order_id: OrderId,
    ) -> Result<(), BookError> {
        if self.book_type != BookType::L3_MBO {
            return Ok(());
        }

        let known = self.ladder(side).cache.contains_key(&order_id);
        match action {
            BookAction::Add if known => Err(BookError::DuplicateOrderId { order_id, side }),
            BookAction::Update if !known => Err(BookError::UnknownOrderId { order_id, side }),
            _ => Ok(()),
        }
    }

    /// Removes stale opposite-side levels at prices crossing an incoming order,
    /// treating the incoming (newer) side as authoritative.
    ///
    /// Returns the removals as synthetic `Delete` deltas for downstream consumers.
    /// L1_TBBO books accept crossed quotes as-is and always return an empty list.
    fn uncross(
        &mut self,
        incoming: OrderSideSpecified,
        price: Price,
        ts_event: UnixNanos,
    ) -> Vec<OrderBookDelta> {
        if self.book_type == BookType::L1_TBBO {
            return Vec::new();
        }

        let stale_ladder = match incoming {
            OrderSideSpecified::Buy => &mut self.asks,
            OrderSideSpecified::Sell => &mut self.bids,
        };

        let mut removed: Vec<BookOrder> = Vec::new();
        loop {
            let Some(top) = stale_ladder.top() else {
                break;
            };
            let crosses = match incoming {
                OrderSideSpecified::Buy => top.price.value <= price,
                OrderSideSpecified::Sell => top.price.value >= price,
            };
            if !crosses {
                break;
            }

            // The stale side's best level crosses; remove its orders in queue order
            let order_ids: Vec<OrderId> = top.orders.keys().copied().collect();
            for order_id in order_ids {
                // SAFETY: Unwrap safe as IDs were just read from the level
                removed.push(stale_ladder.remove(order_id).unwrap());
            }
        }

        if removed.is_empty() {
            return Vec::new();
        }

        log::warn!(
            "Resolved crossed book for instrument_id={}, removed {} stale {} order(s)",
            self.instrument_id,
            removed.len(),
            incoming.opposite(),
        );

        removed
            .into_iter()
            .map(|order| OrderBookDelta {
                instrument_id: self.instrument_id,
                action: BookAction::Delete,
                order,
                flags: 0,
                sequence: self.sequence,
                ts_event,
                ts_init: ts_event,
            })
            .collect()
    }

    /// Returns an iterator over bid price levels (best to worst).
    pub fn bids(&self, depth: Option<usize>) -> impl Iterator<Item = &BookLevel> {
        self.bids.levels.values().take(depth.unwrap_or(usize::MAX))
    }

    /// Returns an iterator over ask price levels (best to worst).
    pub fn asks(&self, depth: Option<usize>) -> impl Iterator<Item = &BookLevel> {
        self.asks.levels.values().take(depth.unwrap_or(usize::MAX))
    }

    /// Returns true if the book has any bid orders.
    #[must_use]
    pub fn has_bid(&self) -> bool {
        self.bids.top().is_some_and(|top| !top.orders.is_empty())
    }

    /// Returns true if the book has any ask orders.
    #[must_use]
    pub fn has_ask(&self) -> bool {
        self.asks.top().is_some_and(|top| !top.orders.is_empty())
    }

    /// Returns the best bid price if available.
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.top().map(|top| top.price.value)
    }

    /// Returns the best ask price if available.
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.top().map(|top| top.price.value)
    }

    /// Returns the aggregate size at the best bid price if available.
    #[must_use]
    pub fn best_bid_size(&self) -> Option<Quantity> {
        self.bids.top().map(BookLevel::size_qty)
    }

    /// Returns the aggregate size at the best ask price if available.
    #[must_use]
    pub fn best_ask_size(&self) -> Option<Quantity> {
        self.asks.top().map(BookLevel::size_qty)
    }

    /// Returns the spread (best ask - best bid) if both sides exist.
    ///
    /// The precision is the maximum of the two sides' precisions. A crossed L1_TBBO
    /// book yields a negative spread.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Returns the midpoint between the best bid and ask prices if both sides exist.
    ///
    /// The precision is the maximum of the two sides' precisions; the raw average is
    /// rounded to the nearest representable value at that precision.
    #[must_use]
    pub fn midpoint(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => {
                let precision = bid.precision.max(ask.precision);
                let mid = ((i128::from(bid.raw) + i128::from(ask.raw)) / 2) as i64;
                Some(Price::from_raw(correct_raw_i64(mid, precision), precision))
            }
            _ => None,
        }
    }

    /// Returns the spread as an `f64` for analytics.
    #[must_use]
    pub fn spread_f64(&self) -> Option<f64> {
        self.spread().map(|spread| spread.as_f64())
    }

    /// Returns the midpoint as an `f64` for analytics.
    #[must_use]
    pub fn midpoint_f64(&self) -> Option<f64> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some((bid.as_f64() + ask.as_f64()) / 2.0),
            _ => None,
        }
    }

    /// Returns the `num_levels` best levels for the given side as
    /// `(price, aggregate size)` pairs, best to worst.
    #[must_use]
    pub fn depth(&self, side: OrderSideSpecified, num_levels: usize) -> Vec<(Price, Quantity)> {
        self.ladder(side).depth(num_levels)
    }

    /// Returns the full ordered book state as `(side, price, orders)` rows,
    /// bids first, each side best to worst.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(OrderSideSpecified, Price, Vec<BookOrder>)> {
        let bids = self.bids.levels.values().map(|level| {
            (
                OrderSideSpecified::Buy,
                level.price.value,
                level.get_orders(),
            )
        });
        let asks = self.asks.levels.values().map(|level| {
            (
                OrderSideSpecified::Sell,
                level.price.value,
                level.get_orders(),
            )
        });
        bids.chain(asks).collect()
    }

    /// Simulates fills for an aggressing `order`, returning the `(price, size)`
    /// portions consumed from the opposite side of the book.
    ///
    /// # Panics
    ///
    /// Panics if `order.side` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn simulate_fills(&self, order: &BookOrder) -> Vec<(Price, Quantity)> {
        match order.side.as_specified() {
            OrderSideSpecified::Buy => self.asks.simulate_fills(order),
            OrderSideSpecified::Sell => self.bids.simulate_fills(order),
        }
    }

    /// Calculates the estimated average price to fill `qty` for an aggressing order
    /// of the given `order_side`.
    ///
    /// # Panics
    ///
    /// Panics if `order_side` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn get_avg_px_for_quantity(&self, qty: Quantity, order_side: OrderSide) -> f64 {
        let levels = match order_side.as_specified() {
            OrderSideSpecified::Buy => &self.asks.levels,
            OrderSideSpecified::Sell => &self.bids.levels,
        };

        analysis::get_avg_px_for_quantity(qty, levels)
    }

    /// Returns the cumulative size available at prices at-or-better than `price` for
    /// an aggressing order of the given `order_side`.
    ///
    /// # Panics
    ///
    /// Panics if `order_side` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn get_quantity_for_price(&self, price: Price, order_side: OrderSide) -> f64 {
        let side = order_side.as_specified();
        let levels = match side {
            OrderSideSpecified::Buy => &self.asks.levels,
            OrderSideSpecified::Sell => &self.bids.levels,
        };

        analysis::get_quantity_for_price(price, side, levels)
    }

    /// Returns a formatted string table of the top `num_levels` of the book.
    #[must_use]
    pub fn pprint(&self, num_levels: usize) -> String {
        pprint_book(self, num_levels)
    }

    fn ladder(&self, side: OrderSideSpecified) -> &BookLadder {
        match side {
            OrderSideSpecified::Buy => &self.bids,
            OrderSideSpecified::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: OrderSideSpecified) -> &mut BookLadder {
        match side {
            OrderSideSpecified::Buy => &mut self.bids,
            OrderSideSpecified::Sell => &mut self.asks,
        }
    }

    fn increment(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.sequence = self.sequence.max(sequence);
        self.ts_last = self.ts_last.max(ts_event);
        self.update_count += 1;
    }
}

fn order_side_checked(order: &BookOrder) -> Result<OrderSideSpecified, BookError> {
    match order.side {
        OrderSide::Buy => Ok(OrderSideSpecified::Buy),
        OrderSide::Sell => Ok(OrderSideSpecified::Sell),
        OrderSide::NoOrderSide => Err(BookError::NoOrderSide),
    }
}

/// Rewrites the order ID based on the book type.
///
/// - L1_TBBO books key the single top-of-book order per side by the side constant.
/// - L2_MBP books key one logical order per level by the raw price value.
/// - L3_MBO orders pass through with their venue order IDs.
fn pre_process_order(book_type: BookType, mut order: BookOrder) -> BookOrder {
    match book_type {
        BookType::L1_TBBO => order.order_id = order.side as OrderId,
        BookType::L2_MBP => order.order_id = order.price.raw as OrderId,
        BookType::L3_MBO => {}
    }
    order
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::order::NULL_ORDER;

    fn order(side: OrderSide, price: &str, size: u64, order_id: OrderId) -> BookOrder {
        BookOrder::new(side, Price::from(price), Quantity::from(size), order_id)
    }

    #[rstest]
    fn test_new_book_is_empty() {
        let book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);

        assert!(!book.has_bid());
        assert!(!book.has_ask());
        assert_eq!(book.best_bid_price(), None);
        assert_eq!(book.best_ask_price(), None);
        assert_eq!(book.spread(), None);
        assert_eq!(book.midpoint(), None);
        assert!(book.snapshot().is_empty());
    }

    #[rstest]
    fn test_l2_aggregation() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "100.00", 3, 2), 2, 2.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "99.99", 10, 3), 3, 3.into())
            .unwrap();

        // Adds at the same price aggregate into the level in L2
        assert_eq!(book.best_bid_price(), Some(Price::from("100.00")));
        assert_eq!(book.best_bid_size(), Some(Quantity::from(8)));
        assert_eq!(
            book.depth(OrderSideSpecified::Buy, 2),
            vec![
                (Price::from("100.00"), Quantity::from(8)),
                (Price::from("99.99"), Quantity::from(10)),
            ]
        );
    }

    #[rstest]
    fn test_l3_aggregation_at_level() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "100.00", 3, 2), 2, 2.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "99.99", 10, 3), 3, 3.into())
            .unwrap();

        assert_eq!(book.best_bid_price(), Some(Price::from("100.00")));
        assert_eq!(book.best_bid_size(), Some(Quantity::from(8)));
        assert_eq!(
            book.depth(OrderSideSpecified::Buy, 2),
            vec![
                (Price::from("100.00"), Quantity::from(8)),
                (Price::from("99.99"), Quantity::from(10)),
            ]
        );
    }

    #[rstest]
    fn test_l3_duplicate_order_id_rejected() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 1, 1.into())
            .unwrap();

        let result = book.add(order(OrderSide::Buy, "99.00", 5, 1), 2, 2.into());
        assert!(matches!(
            result,
            Err(BookError::DuplicateOrderId { order_id: 1, .. })
        ));
        assert_eq!(book.bids.len(), 1);
    }

    #[rstest]
    fn test_l3_update_priority_rules() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Sell, "101.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "101.00", 5, 2), 2, 2.into())
            .unwrap();

        // Size decrease preserves queue position
        book.update(order(OrderSide::Sell, "101.00", 4, 1), 3, 3.into())
            .unwrap();
        let ids: Vec<OrderId> = book
            .asks
            .top()
            .unwrap()
            .iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        // Size increase moves the order to the level tail
        book.update(order(OrderSide::Sell, "101.00", 10, 1), 4, 4.into())
            .unwrap();
        let level = book.asks.top().unwrap();
        let ids: Vec<OrderId> = level.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(level.get_orders()[1].size, Quantity::from(10));
    }

    #[rstest]
    fn test_l3_update_unknown_order_rejected() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        let result = book.update(order(OrderSide::Buy, "100.00", 5, 42), 1, 1.into());
        assert!(matches!(
            result,
            Err(BookError::UnknownOrderId { order_id: 42, .. })
        ));
    }

    #[rstest]
    fn test_delete_unknown_order_rejected() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        let result = book.delete(order(OrderSide::Buy, "100.00", 5, 42), 1, 1.into());
        assert!(matches!(
            result,
            Err(BookError::UnknownOrderId { order_id: 42, .. })
        ));
    }

    #[rstest]
    fn test_l1_add_replaces_level() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L1_TBBO);
        book.add(order(OrderSide::Buy, "100.00", 5, 0), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "99.00", 7, 0), 2, 2.into())
            .unwrap();

        // Replacement, not an error; price may degrade
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.best_bid_price(), Some(Price::from("99.00")));
        assert_eq!(book.best_bid_size(), Some(Quantity::from(7)));
    }

    #[rstest]
    fn test_l1_crossed_quote_accepted() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L1_TBBO);
        book.add(order(OrderSide::Buy, "100.00", 5, 0), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "99.00", 5, 0), 2, 2.into())
            .unwrap();

        // Crossed top-of-book is retained as-is
        assert_eq!(book.best_bid_price(), Some(Price::from("100.00")));
        assert_eq!(book.best_ask_price(), Some(Price::from("99.00")));
        assert_eq!(book.spread(), Some(Price::from("-1.00")));
    }

    #[rstest]
    fn test_l2_direct_crossing_add_rejected() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "100.00", 10, 1), 1, 1.into())
            .unwrap();

        let result = book.add(order(OrderSide::Sell, "99.00", 4, 2), 2, 2.into());
        assert_eq!(
            result,
            Err(BookError::CrossedBook {
                bid: Price::from("100.00"),
                ask: Price::from("99.00"),
            })
        );

        // Book unchanged
        assert_eq!(book.best_bid_price(), Some(Price::from("100.00")));
        assert!(!book.has_ask());
    }

    #[rstest]
    fn test_l3_direct_crossing_update_rejected() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Buy, "99.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "101.00", 5, 2), 2, 2.into())
            .unwrap();
        let before = book.snapshot();

        // A locked price (bid == ask) counts as crossed
        let result = book.update(order(OrderSide::Buy, "101.00", 5, 1), 3, 3.into());
        assert_eq!(
            result,
            Err(BookError::CrossedBook {
                bid: Price::from("101.00"),
                ask: Price::from("101.00"),
            })
        );
        assert_eq!(book.snapshot(), before);
    }

    #[rstest]
    fn test_crossed_resolution_favors_newer_side() {
        let instrument_id = InstrumentId::from("AAPL.XNAS");
        let mut book = OrderBook::new(instrument_id, BookType::L2_MBP);
        book.apply_delta(&OrderBookDelta::new(
            instrument_id,
            BookAction::Add,
            order(OrderSide::Buy, "100.00", 10, 1),
            0,
            1,
            1.into(),
            1.into(),
        ))
        .unwrap();

        let removals = book
            .apply_delta(&OrderBookDelta::new(
                instrument_id,
                BookAction::Add,
                order(OrderSide::Sell, "99.00", 4, 99),
                0,
                2,
                2.into(),
                2.into(),
            ))
            .unwrap();

        // The stale bid is removed and emitted as a synthetic delete
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].action, BookAction::Delete);
        assert_eq!(removals[0].order.price, Price::from("100.00"));
        assert!(!book.has_bid());
        assert_eq!(book.best_ask_price(), Some(Price::from("99.00")));
    }

    #[rstest]
    fn test_apply_delta_instrument_mismatch() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        let delta = OrderBookDelta::new(
            InstrumentId::from("MSFT.XNAS"),
            BookAction::Add,
            order(OrderSide::Buy, "100.00", 10, 1),
            0,
            1,
            1.into(),
            1.into(),
        );

        assert!(matches!(
            book.apply_delta(&delta),
            Err(BookError::InstrumentMismatch { .. })
        ));
    }

    #[rstest]
    fn test_apply_delta_stale_sequence_rejected() {
        let instrument_id = InstrumentId::from("AAPL.XNAS");
        let mut book = OrderBook::new(instrument_id, BookType::L2_MBP);
        book.apply_delta(&OrderBookDelta::new(
            instrument_id,
            BookAction::Add,
            order(OrderSide::Buy, "100.00", 10, 1),
            0,
            5,
            1.into(),
            1.into(),
        ))
        .unwrap();

        let stale = OrderBookDelta::new(
            instrument_id,
            BookAction::Add,
            order(OrderSide::Buy, "99.00", 10, 2),
            0,
            5,
            2.into(),
            2.into(),
        );
        assert_eq!(
            book.apply_delta(&stale),
            Err(BookError::StaleDelta {
                sequence: 5,
                last_sequence: 5,
            })
        );

        // Book unchanged
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.sequence, 5);
    }

    #[rstest]
    fn test_apply_delta_clear() {
        let instrument_id = InstrumentId::from("AAPL.XNAS");
        let mut book = OrderBook::new(instrument_id, BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "100.00", 10, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "101.00", 10, 2), 2, 2.into())
            .unwrap();

        let delta = OrderBookDelta::clear(instrument_id, 3, 3.into(), 3.into());
        book.apply_delta(&delta).unwrap();

        assert_eq!(book.best_bid_price(), None);
        assert_eq!(book.best_ask_price(), None);
        assert!(book.snapshot().is_empty());
        assert_eq!(book.sequence, 3);
        assert_eq!(book.ts_last, 3);
    }

    #[rstest]
    fn test_apply_delta_no_order_side() {
        let instrument_id = InstrumentId::from("AAPL.XNAS");
        let mut book = OrderBook::new(instrument_id, BookType::L3_MBO);
        let delta = OrderBookDelta {
            instrument_id,
            action: BookAction::Delete,
            order: NULL_ORDER,
            flags: 0,
            sequence: 1,
            ts_event: 1.into(),
            ts_init: 1.into(),
        };

        assert_eq!(book.apply_delta(&delta), Err(BookError::NoOrderSide));
    }

    #[rstest]
    fn test_midpoint_precision() {
        let mut book = OrderBook::new(InstrumentId::from("AUD/USD.SIM"), BookType::L2_MBP);
        book.add(order_with_price_str(OrderSide::Buy, "1.2345", 1), 1, 1.into())
            .unwrap();
        book.add(order_with_price_str(OrderSide::Sell, "1.23456", 2), 2, 2.into())
            .unwrap();

        let midpoint = book.midpoint().unwrap();
        assert_eq!(midpoint, Price::from("1.23453"));
        assert_eq!(midpoint.precision, 5);
    }

    fn order_with_price_str(side: OrderSide, price: &str, order_id: OrderId) -> BookOrder {
        BookOrder::new(side, Price::from(price), Quantity::from(100), order_id)
    }

    #[rstest]
    fn test_spread_takes_max_precision() {
        let mut book = OrderBook::new(InstrumentId::from("AUD/USD.SIM"), BookType::L2_MBP);
        book.add(order_with_price_str(OrderSide::Buy, "1.2345", 1), 1, 1.into())
            .unwrap();
        book.add(order_with_price_str(OrderSide::Sell, "1.23456", 2), 2, 2.into())
            .unwrap();

        let spread = book.spread().unwrap();
        assert_eq!(spread, Price::from("0.00006"));
        assert_eq!(spread.precision, 5);
    }

    #[rstest]
    fn test_snapshot_ordering() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "99.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "100.00", 5, 2), 2, 2.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "101.00", 5, 3), 3, 3.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "102.00", 5, 4), 4, 4.into())
            .unwrap();

        let snapshot = book.snapshot();
        let prices: Vec<Price> = snapshot.iter().map(|(_, price, _)| *price).collect();
        assert_eq!(
            prices,
            vec![
                Price::from("100.00"),
                Price::from("99.00"),
                Price::from("101.00"),
                Price::from("102.00"),
            ]
        );
        assert_eq!(snapshot[0].0, OrderSideSpecified::Buy);
        assert_eq!(snapshot[2].0, OrderSideSpecified::Sell);
    }

    #[rstest]
    fn test_ts_last_and_sequence_monotonic() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 1, 100.into())
            .unwrap();
        book.add(order(OrderSide::Buy, "99.00", 5, 2), 2, 50.into())
            .unwrap();

        assert_eq!(book.ts_last, 100);
        assert_eq!(book.sequence, 2);
        assert_eq!(book.update_count, 2);
    }

    #[rstest]
    fn test_simulate_fills() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L3_MBO);
        book.add(order(OrderSide::Sell, "101.00", 10, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "102.00", 20, 2), 2, 2.into())
            .unwrap();

        let taker = order(OrderSide::Buy, "102.00", 15, 3);
        let fills = book.simulate_fills(&taker);
        assert_eq!(
            fills,
            vec![
                (Price::from("101.00"), Quantity::from(10)),
                (Price::from("102.00"), Quantity::from(5)),
            ]
        );
    }

    #[rstest]
    fn test_get_avg_px_for_quantity() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Sell, "101.00", 10, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "102.00", 10, 2), 2, 2.into())
            .unwrap();

        let avg = book.get_avg_px_for_quantity(Quantity::from(20), OrderSide::Buy);
        assert_eq!(avg, 101.5);
    }

    #[rstest]
    fn test_clear_side() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 1, 1.into())
            .unwrap();
        book.add(order(OrderSide::Sell, "101.00", 5, 2), 2, 2.into())
            .unwrap();

        book.clear_side(OrderSideSpecified::Buy, 3, 3.into());
        assert!(!book.has_bid());
        assert!(book.has_ask());
    }

    #[rstest]
    fn test_reset() {
        let mut book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        book.add(order(OrderSide::Buy, "100.00", 5, 1), 7, 7.into())
            .unwrap();

        book.reset();
        assert_eq!(book.sequence, 0);
        assert_eq!(book.ts_last, 0);
        assert_eq!(book.update_count, 0);
        assert!(!book.has_bid());
    }

    #[rstest]
    fn test_display() {
        let book = OrderBook::new(InstrumentId::from("AAPL.XNAS"), BookType::L2_MBP);
        assert_eq!(
            book.to_string(),
            "OrderBook(instrument_id=AAPL.XNAS, book_type=L2_MBP, update_count=0)"
        );
    }
}
