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

//! An `OrderBookDeltas` batch of changes intended to be applied atomically.

use std::fmt::Display;

use meridian_core::{UnixNanos, correctness::FAILED, serialization::Serializable};
use serde::{Deserialize, Serialize};

use super::{HasTsInit, delta::OrderBookDelta};
use crate::{enums::RecordFlag, identifiers::InstrumentId};

/// Represents a batch of order book changes, applied as one logical event.
///
/// The `flags` field of the final delta carries `F_LAST` marking the end of the batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderBookDeltas {
    /// The instrument ID for the book.
    pub instrument_id: InstrumentId,
    /// The batch of order book deltas.
    pub deltas: Vec<OrderBookDelta>,
    /// The record flags of the final delta in the batch.
    pub flags: u8,
    /// The message sequence number of the final delta in the batch.
    pub sequence: u64,
    /// UNIX timestamp (nanoseconds) when the final book event occurred.
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the struct was initialized.
    pub ts_init: UnixNanos,
}

impl OrderBookDeltas {
    /// Creates a new [`OrderBookDeltas`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `deltas` is empty.
    pub fn new_checked(
        instrument_id: InstrumentId,
        deltas: Vec<OrderBookDelta>,
    ) -> anyhow::Result<Self> {
        if deltas.is_empty() {
            anyhow::bail!("`deltas` cannot be empty")
        }

        // SAFETY: Unwrap safe as non-empty checked above
        let last = deltas.last().unwrap();
        let flags = last.flags;
        let sequence = last.sequence;
        let ts_event = last.ts_event;
        let ts_init = last.ts_init;

        Ok(Self {
            instrument_id,
            deltas,
            flags,
            sequence,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`OrderBookDeltas`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `deltas` is empty.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, deltas: Vec<OrderBookDelta>) -> Self {
        Self::new_checked(instrument_id, deltas).expect(FAILED)
    }

    /// Returns whether this batch is a snapshot (leading `Clear` action).
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        RecordFlag::F_SNAPSHOT.matches(self.flags)
    }

    /// Returns the number of deltas in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Returns whether the batch is empty (never true for a validly constructed instance).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

impl Display for OrderBookDeltas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, len={}, flags={}, sequence={}, ts_event={}, ts_init={})",
            stringify!(OrderBookDeltas),
            self.instrument_id,
            self.deltas.len(),
            self.flags,
            self.sequence,
            self.ts_event,
            self.ts_init,
        )
    }
}

impl Serializable for OrderBookDeltas {}

impl HasTsInit for OrderBookDeltas {
    fn ts_init(&self) -> UnixNanos {
        self.ts_init
    }
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
        enums::{BookAction, OrderSide},
        types::{Price, Quantity},
    };

    fn delta(action: BookAction, order_id: u64, sequence: u64, flags: u8) -> OrderBookDelta {
        OrderBookDelta::new(
            InstrumentId::from("AAPL.XNAS"),
            action,
            BookOrder::new(
                OrderSide::Buy,
                Price::from("100.00"),
                Quantity::from(10),
                order_id,
            ),
            flags,
            sequence,
            UnixNanos::from(sequence),
            UnixNanos::from(sequence + 1),
        )
    }

    #[rstest]
    fn test_new_takes_final_delta_fields() {
        let deltas = OrderBookDeltas::new(
            InstrumentId::from("AAPL.XNAS"),
            vec![
                delta(BookAction::Add, 1, 1, 0),
                delta(BookAction::Add, 2, 2, RecordFlag::F_LAST as u8),
            ],
        );

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas.sequence, 2);
        assert_eq!(deltas.flags, RecordFlag::F_LAST as u8);
        assert_eq!(deltas.ts_event, 2);
        assert_eq!(deltas.ts_init, 3);
        assert!(!deltas.is_snapshot());
    }

    #[rstest]
    fn test_empty_deltas_fails() {
        let result = OrderBookDeltas::new_checked(InstrumentId::from("AAPL.XNAS"), vec![]);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_snapshot_flag() {
        let deltas = OrderBookDeltas::new(
            InstrumentId::from("AAPL.XNAS"),
            vec![delta(BookAction::Add, 1, 1, RecordFlag::F_SNAPSHOT as u8)],
        );
        assert!(deltas.is_snapshot());
    }
}
