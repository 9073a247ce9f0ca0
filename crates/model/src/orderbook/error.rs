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

//! Error types for order book operations.

use thiserror::Error;

use crate::{
    data::order::OrderId,
    enums::OrderSideSpecified,
    identifiers::InstrumentId,
    types::Price,
};

/// The typed failure taxonomy for order book operations.
///
/// A failed operation leaves the book unchanged, except for [`BookError::Overflow`]
/// which poisons the affected book (callers should discard and resubscribe).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// An `Add` was given for an order ID already present in the book.
    #[error("Duplicate order ID {order_id} on {side} side of book")]
    DuplicateOrderId {
        /// The duplicated order ID.
        order_id: OrderId,
        /// The book side for the operation.
        side: OrderSideSpecified,
    },
    /// An `Update` or `Delete` was given for an order ID not present in the book.
    #[error("Unknown order ID {order_id} on {side} side of book")]
    UnknownOrderId {
        /// The unknown order ID.
        order_id: OrderId,
        /// The book side for the operation.
        side: OrderSideSpecified,
    },
    /// A direct `Add` or `Update` would cross the book (L2/L3 only).
    ///
    /// The delta path never returns this: applied deltas treat the incoming side as
    /// authoritative and resolve the crossing by removing stale opposite-side levels.
    #[error("Crossed book: bid {bid} at or through ask {ask}")]
    CrossedBook {
        /// The crossing bid price.
        bid: Price,
        /// The crossing ask price.
        ask: Price,
    },
    /// A delta was applied out of sequence order.
    #[error("Stale delta: sequence {sequence} not greater than last applied {last_sequence}")]
    StaleDelta {
        /// The out-of-order sequence number received.
        sequence: u64,
        /// The last sequence number applied to the book.
        last_sequence: u64,
    },
    /// A delta was applied against a book for a different instrument.
    #[error("Instrument mismatch: book {book_instrument_id} vs delta {delta_instrument_id}")]
    InstrumentMismatch {
        /// The book's instrument ID.
        book_instrument_id: InstrumentId,
        /// The delta's instrument ID.
        delta_instrument_id: InstrumentId,
    },
    /// An order or delta was given with no specified side where one is required.
    #[error("Order side must be specified (was `NO_ORDER_SIDE`)")]
    NoOrderSide,
    /// Aggregating order sizes at a price level overflowed the raw integer range.
    #[error("Numeric overflow aggregating level at price {price}")]
    Overflow {
        /// The price of the affected level.
        price: Price,
    },
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_display_messages() {
        let error = BookError::DuplicateOrderId {
            order_id: 42,
            side: OrderSideSpecified::Buy,
        };
        assert_eq!(error.to_string(), "Duplicate order ID 42 on BUY side of book");

        let error = BookError::CrossedBook {
            bid: Price::from("100.00"),
            ask: Price::from("99.00"),
        };
        assert_eq!(
            error.to_string(),
            "Crossed book: bid 100.00 at or through ask 99.00"
        );

        let error = BookError::StaleDelta {
            sequence: 5,
            last_sequence: 7,
        };
        assert_eq!(
            error.to_string(),
            "Stale delta: sequence 5 not greater than last applied 7"
        );
    }
}
