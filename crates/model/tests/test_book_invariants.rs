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

//! Property-based tests for order book and value type invariants.

use std::collections::HashMap;

use meridian_core::UnixNanos;
use meridian_model::{
    data::{BookOrder, order::OrderId},
    enums::{BookType, OrderSide, OrderSideSpecified},
    identifiers::InstrumentId,
    orderbook::OrderBook,
    types::{Currency, Money, Price, Quantity},
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum BookOp {
    Add {
        side: bool,
        price_ticks: u8,
        size: u16,
    },
    Update {
        key: usize,
        price_ticks: u8,
        size: u16,
    },
    Delete {
        key: usize,
    },
}

fn book_op_strategy() -> impl Strategy<Value = BookOp> {
    prop_oneof![
        (any::<bool>(), 1u8..=20, 1u16..=1_000).prop_map(|(side, price_ticks, size)| {
            BookOp::Add {
                side,
                price_ticks,
                size,
            }
        }),
        (any::<usize>(), 1u8..=20, 0u16..=1_000).prop_map(|(key, price_ticks, size)| {
            BookOp::Update {
                key,
                price_ticks,
                size,
            }
        }),
        any::<usize>().prop_map(|key| BookOp::Delete { key }),
    ]
}

/// Maps a tick offset into disjoint per-side price bands (bids 100.01..=100.20,
/// asks 100.21..=100.40) so no generated operation can cross the book.
fn tick_price(ticks: u8, side: OrderSide) -> Price {
    let offset = match side {
        OrderSide::Sell => 0.20,
        _ => 0.0,
    };
    Price::new(100.0 + offset + f64::from(ticks) * 0.01, 2)
}

/// Drives a random operation sequence on an L3 book and verifies the structural
/// invariants hold after every accepted operation.
fn run_l3_op_sequence(ops: Vec<BookOp>) {
    let instrument_id = InstrumentId::from("AAPL.XNAS");
    let mut book = OrderBook::new(instrument_id, BookType::L3_MBO);

    // Shadow model: order_id -> (side, price, size)
    let mut shadow: HashMap<OrderId, (OrderSide, Price, Quantity)> = HashMap::new();
    let mut next_order_id: OrderId = 1;
    let mut sequence = 0u64;

    for op in ops {
        sequence += 1;
        let ts = UnixNanos::from(sequence);

        match op {
            BookOp::Add {
                side,
                price_ticks,
                size,
            } => {
                let side = if side { OrderSide::Buy } else { OrderSide::Sell };
                let order = BookOrder::new(
                    side,
                    tick_price(price_ticks, side),
                    Quantity::from(u64::from(size)),
                    next_order_id,
                );
                book.add(order, sequence, ts).unwrap();
                shadow.insert(next_order_id, (side, order.price, order.size));
                next_order_id += 1;
            }
            BookOp::Update {
                key,
                price_ticks,
                size,
            } => {
                let Some(order_id) = nth_key(&shadow, key) else {
                    continue;
                };
                let (side, _, _) = shadow[&order_id];
                let order = BookOrder::new(
                    side,
                    tick_price(price_ticks, side),
                    Quantity::from(u64::from(size)),
                    order_id,
                );
                book.update(order, sequence, ts).unwrap();
                if size == 0 {
                    shadow.remove(&order_id);
                } else {
                    shadow.insert(order_id, (side, order.price, order.size));
                }
            }
            BookOp::Delete { key } => {
                let Some(order_id) = nth_key(&shadow, key) else {
                    continue;
                };
                let (side, price, size) = shadow.remove(&order_id).unwrap();
                let order = BookOrder::new(side, price, size, order_id);
                book.delete(order, sequence, ts).unwrap();
            }
        }

        assert_book_matches_shadow(&book, &shadow);
    }
}

fn nth_key(shadow: &HashMap<OrderId, (OrderSide, Price, Quantity)>, key: usize) -> Option<OrderId> {
    if shadow.is_empty() {
        return None;
    }
    let mut keys: Vec<OrderId> = shadow.keys().copied().collect();
    keys.sort_unstable();
    Some(keys[key % keys.len()])
}

fn assert_book_matches_shadow(
    book: &OrderBook,
    shadow: &HashMap<OrderId, (OrderSide, Price, Quantity)>,
) {
    let snapshot = book.snapshot();

    // No empty levels, and the order contents are in bijection with the shadow model
    let mut seen = 0usize;
    for (side, price, orders) in &snapshot {
        assert!(!orders.is_empty(), "empty level in snapshot at {price}");
        for order in orders {
            let (expected_side, expected_price, expected_size) = shadow
                .get(&order.order_id)
                .unwrap_or_else(|| panic!("unexpected order {} in book", order.order_id));
            assert_eq!(expected_side.as_specified(), *side);
            assert_eq!(expected_price, price);
            assert_eq!(expected_size, &order.size);
            seen += 1;
        }
    }
    assert_eq!(seen, shadow.len(), "book and shadow model diverged");

    // Price keys are best-to-worst per side
    let bid_prices: Vec<Price> = snapshot
        .iter()
        .filter(|(side, _, _)| *side == OrderSideSpecified::Buy)
        .map(|(_, price, _)| *price)
        .collect();
    assert!(bid_prices.windows(2).all(|w| w[0] > w[1]));

    let ask_prices: Vec<Price> = snapshot
        .iter()
        .filter(|(side, _, _)| *side == OrderSideSpecified::Sell)
        .map(|(_, price, _)| *price)
        .collect();
    assert!(ask_prices.windows(2).all(|w| w[0] < w[1]));
}

proptest! {
    #[test]
    fn prop_l3_book_invariants(ops in proptest::collection::vec(book_op_strategy(), 1..60)) {
        run_l3_op_sequence(ops);
    }

    #[test]
    fn prop_price_raw_ordering_matches_value_ordering(
        a in -1_000_000_00i64..1_000_000_00,
        b in -1_000_000_00i64..1_000_000_00,
    ) {
        // Cent multiples at precision 2
        let price_a = Price::from_raw(a * 10_000_000, 2);
        let price_b = Price::from_raw(b * 10_000_000, 2);

        prop_assert_eq!(price_a.raw < price_b.raw, price_a < price_b);
        prop_assert_eq!(price_a.raw == price_b.raw, price_a == price_b);
    }

    #[test]
    fn prop_money_raw_round_trip(amount_cents in -1_000_000_00i64..1_000_000_00) {
        let money = Money::from_raw(amount_cents * 10_000_000, Currency::USD());
        let round_tripped = Money::from_raw(money.raw, Currency::USD());
        prop_assert_eq!(round_tripped.raw, money.raw);
        prop_assert_eq!(round_tripped, money);
    }

    #[test]
    fn prop_quantity_add_sub_round_trip(
        a in 0u64..1_000_000,
        b in 0u64..1_000_000,
    ) {
        let qty_a = Quantity::from(a);
        let qty_b = Quantity::from(b);
        prop_assert_eq!((qty_a + qty_b) - qty_b, qty_a);
    }

    #[test]
    fn prop_clear_always_empties_book(n_orders in 1usize..20) {
        let instrument_id = InstrumentId::from("AAPL.XNAS");
        let mut book = OrderBook::new(instrument_id, BookType::L3_MBO);

        for i in 0..n_orders {
            let side = if i % 2 == 0 { OrderSide::Buy } else { OrderSide::Sell };
            let price = if i % 2 == 0 { "99.00" } else { "101.00" };
            let order = BookOrder::new(
                side,
                Price::from(price),
                Quantity::from(10),
                i as OrderId + 1,
            );
            book.add(order, i as u64 + 1, UnixNanos::from(i as u64)).unwrap();
        }

        book.clear(n_orders as u64 + 1, UnixNanos::from(n_orders as u64));

        prop_assert_eq!(book.best_bid_price(), None);
        prop_assert_eq!(book.best_ask_price(), None);
        prop_assert!(book.snapshot().is_empty());
    }
}
