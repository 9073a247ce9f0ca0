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

//! Bar aggregate structures, data types and functionality.

use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    num::NonZeroUsize,
    str::FromStr,
};

use chrono::{Duration, TimeDelta};
use derive_builder::Builder;
use indexmap::IndexMap;
use meridian_core::{
    UnixNanos,
    correctness::{FAILED, check_predicate_true},
    serialization::Serializable,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::HasTsInit;
use crate::{
    enums::{AggregationSource, BarAggregation, PriceType},
    identifiers::InstrumentId,
    types::{Price, Quantity, fixed::FIXED_SIZE_BINARY},
};

/// Represents a bar aggregation specification: a step, an aggregation method and a price type.
#[repr(C)]
#[derive(
    Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Builder,
)]
pub struct BarSpecification {
    /// The step for binning samples for bar aggregation.
    pub step: NonZeroUsize,
    /// The type of bar aggregation.
    pub aggregation: BarAggregation,
    /// The price type to use for aggregation.
    pub price_type: PriceType,
}

impl BarSpecification {
    /// Creates a new [`BarSpecification`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is not positive (> 0).
    pub fn new_checked(
        step: usize,
        aggregation: BarAggregation,
        price_type: PriceType,
    ) -> anyhow::Result<Self> {
        let step = NonZeroUsize::new(step)
            .ok_or_else(|| anyhow::anyhow!("Invalid step: {step} (must be non-zero)"))?;
        Ok(Self {
            step,
            aggregation,
            price_type,
        })
    }

    /// Creates a new [`BarSpecification`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not positive (> 0).
    #[must_use]
    pub fn new(step: usize, aggregation: BarAggregation, price_type: PriceType) -> Self {
        Self::new_checked(step, aggregation, price_type).expect(FAILED)
    }

    /// Returns whether the aggregation method is driven by the passage of time.
    #[must_use]
    pub fn is_time_aggregated(&self) -> bool {
        self.aggregation.is_time_driven()
    }

    /// Returns the bar interval as a `TimeDelta`.
    ///
    /// # Panics
    ///
    /// Panics if the aggregation method is not time driven.
    #[must_use]
    pub fn timedelta(&self) -> TimeDelta {
        let step = self.step.get() as i64;
        match self.aggregation {
            BarAggregation::Millisecond => Duration::milliseconds(step),
            BarAggregation::Second => Duration::seconds(step),
            BarAggregation::Minute => Duration::minutes(step),
            BarAggregation::Hour => Duration::hours(step),
            BarAggregation::Day => Duration::days(step),
            BarAggregation::Week => Duration::days(7 * step),
            _ => panic!(
                "Timedelta not supported for aggregation type: {:?}",
                self.aggregation
            ),
        }
    }
}

impl Display for BarSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.step, self.aggregation, self.price_type)
    }
}

/// Represents a bar type including the instrument ID, bar specification and
/// aggregation source.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BarType {
    /// The bar type's instrument ID.
    pub instrument_id: InstrumentId,
    /// The bar type's specification.
    pub spec: BarSpecification,
    /// The bar type's aggregation source.
    pub aggregation_source: AggregationSource,
}

impl BarType {
    /// Creates a new [`BarType`] instance.
    #[must_use]
    pub fn new(
        instrument_id: InstrumentId,
        spec: BarSpecification,
        aggregation_source: AggregationSource,
    ) -> Self {
        Self {
            instrument_id,
            spec,
            aggregation_source,
        }
    }

    /// Returns the [`InstrumentId`] for this bar type.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Returns the [`BarSpecification`] for this bar type.
    #[must_use]
    pub fn spec(&self) -> BarSpecification {
        self.spec
    }

    /// Returns the [`AggregationSource`] for this bar type.
    #[must_use]
    pub fn aggregation_source(&self) -> AggregationSource {
        self.aggregation_source
    }
}

/// The error produced when parsing a [`BarType`] from a string.
#[derive(thiserror::Error, Debug)]
#[error("Error parsing `BarType` from '{input}', invalid token: '{token}' at position {position}")]
pub struct BarTypeParseError {
    input: String,
    token: String,
    position: usize,
}

impl FromStr for BarType {
    type Err = BarTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pieces: Vec<&str> = s.rsplitn(5, '-').collect();
        let rev_pieces: Vec<&str> = pieces.into_iter().rev().collect();
        if rev_pieces.len() != 5 {
            return Err(BarTypeParseError {
                input: s.to_string(),
                token: String::new(),
                position: 0,
            });
        }

        let instrument_id =
            InstrumentId::from_str(rev_pieces[0]).map_err(|_| BarTypeParseError {
                input: s.to_string(),
                token: rev_pieces[0].to_string(),
                position: 0,
            })?;
        let step: usize = rev_pieces[1].parse().map_err(|_| BarTypeParseError {
            input: s.to_string(),
            token: rev_pieces[1].to_string(),
            position: 1,
        })?;
        let aggregation =
            BarAggregation::from_str(rev_pieces[2]).map_err(|_| BarTypeParseError {
                input: s.to_string(),
                token: rev_pieces[2].to_string(),
                position: 2,
            })?;
        let price_type = PriceType::from_str(rev_pieces[3]).map_err(|_| BarTypeParseError {
            input: s.to_string(),
            token: rev_pieces[3].to_string(),
            position: 3,
        })?;
        let aggregation_source =
            AggregationSource::from_str(rev_pieces[4]).map_err(|_| BarTypeParseError {
                input: s.to_string(),
                token: rev_pieces[4].to_string(),
                position: 4,
            })?;

        Ok(Self {
            instrument_id,
            spec: BarSpecification::new(step, aggregation, price_type),
            aggregation_source,
        })
    }
}

impl From<&str> for BarType {
    /// Creates a [`BarType`] from a string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid bar type string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Display for BarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.instrument_id, self.spec, self.aggregation_source
        )
    }
}

impl Serialize for BarType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BarType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&value_str).map_err(serde::de::Error::custom)
    }
}

/// Returns the bar interval as a `TimeDelta`.
///
/// # Panics
///
/// Panics if the aggregation method of the given `bar_type` is not time driven.
#[must_use]
pub fn get_bar_interval(bar_type: &BarType) -> TimeDelta {
    bar_type.spec().timedelta()
}

/// Returns the bar interval as `UnixNanos`.
///
/// # Panics
///
/// Panics if the aggregation method of the given `bar_type` is not time driven.
#[must_use]
pub fn get_bar_interval_ns(bar_type: &BarType) -> UnixNanos {
    let interval_ns = get_bar_interval(bar_type)
        .num_nanoseconds()
        .expect("Invalid bar interval") as u64;
    UnixNanos::from(interval_ns)
}

/// Represents an aggregated bar.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
#[serde(tag = "type")]
pub struct Bar {
    /// The bar type for this bar.
    pub bar_type: BarType,
    /// The bars open price.
    pub open: Price,
    /// The bars highest price.
    pub high: Price,
    /// The bars lowest price.
    pub low: Price,
    /// The bars close price.
    pub close: Price,
    /// The bars volume.
    pub volume: Quantity,
    /// UNIX timestamp (nanoseconds) when the bar event occurred (close time).
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the struct was initialized.
    pub ts_init: UnixNanos,
}

impl Bar {
    /// Creates a new [`Bar`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `high` is not greater than or equal to `low`.
    /// - If `high` is not greater than or equal to `open` and `close`.
    /// - If `low` is not less than or equal to `open` and `close`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_checked(
        bar_type: BarType,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_predicate_true(high >= low, "high was < low")?;
        check_predicate_true(high >= open, "high was < open")?;
        check_predicate_true(high >= close, "high was < close")?;
        check_predicate_true(low <= open, "low was > open")?;
        check_predicate_true(low <= close, "low was > close")?;

        Ok(Self {
            bar_type,
            open,
            high,
            low,
            close,
            volume,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`Bar`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Bar::new_checked`]).
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        bar_type: BarType,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(bar_type, open, high, low, close, volume, ts_event, ts_init)
            .expect(FAILED)
    }

    /// Returns the instrument ID for this bar.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        self.bar_type.instrument_id()
    }

    /// Returns the metadata for the type, for use with serialization formats.
    #[must_use]
    pub fn get_metadata(
        bar_type: &BarType,
        price_precision: u8,
        size_precision: u8,
    ) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert("bar_type".to_string(), bar_type.to_string());
        metadata.insert(
            "instrument_id".to_string(),
            bar_type.instrument_id().to_string(),
        );
        metadata.insert("price_precision".to_string(), price_precision.to_string());
        metadata.insert("size_precision".to_string(), size_precision.to_string());
        metadata
    }

    /// Returns the field map for the type, for use with flat columnar schemas.
    ///
    /// The column order and types are stable and constitute the on-disk format;
    /// any change is a breaking format revision.
    #[must_use]
    pub fn get_fields() -> IndexMap<String, String> {
        let mut metadata = IndexMap::new();
        metadata.insert("open".to_string(), FIXED_SIZE_BINARY.to_string());
        metadata.insert("high".to_string(), FIXED_SIZE_BINARY.to_string());
        metadata.insert("low".to_string(), FIXED_SIZE_BINARY.to_string());
        metadata.insert("close".to_string(), FIXED_SIZE_BINARY.to_string());
        metadata.insert("volume".to_string(), FIXED_SIZE_BINARY.to_string());
        metadata.insert("ts_event".to_string(), "UInt64".to_string());
        metadata.insert("ts_init".to_string(), "UInt64".to_string());
        metadata
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.bar_type, self.open, self.high, self.low, self.close, self.volume, self.ts_event,
        )
    }
}

impl Serializable for Bar {}

impl HasTsInit for Bar {
    fn ts_init(&self) -> UnixNanos {
        self.ts_init
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::data::stubs::stub_bar;

    #[rstest]
    fn test_bar_spec_new() {
        let spec = BarSpecification::new(1, BarAggregation::Minute, PriceType::Last);
        assert_eq!(spec.step.get(), 1);
        assert_eq!(spec.to_string(), "1-MINUTE-LAST");
    }

    #[rstest]
    fn test_bar_spec_zero_step_fails() {
        assert!(BarSpecification::new_checked(0, BarAggregation::Tick, PriceType::Last).is_err());
    }

    #[rstest]
    #[case(BarAggregation::Millisecond, 1, Duration::milliseconds(1))]
    #[case(BarAggregation::Second, 1, Duration::seconds(1))]
    #[case(BarAggregation::Minute, 5, Duration::minutes(5))]
    #[case(BarAggregation::Hour, 1, Duration::hours(1))]
    #[case(BarAggregation::Day, 1, Duration::days(1))]
    #[case(BarAggregation::Week, 1, Duration::days(7))]
    fn test_timedelta(
        #[case] aggregation: BarAggregation,
        #[case] step: usize,
        #[case] expected: TimeDelta,
    ) {
        let spec = BarSpecification::new(step, aggregation, PriceType::Last);
        assert_eq!(spec.timedelta(), expected);
    }

    #[rstest]
    #[should_panic(expected = "Timedelta not supported for aggregation type")]
    fn test_timedelta_threshold_panics() {
        let spec = BarSpecification::new(100, BarAggregation::Tick, PriceType::Last);
        let _ = spec.timedelta();
    }

    #[rstest]
    fn test_bar_type_parse_valid() {
        let input = "BTCUSDT.BINANCE-1-MINUTE-LAST-INTERNAL";
        let bar_type = BarType::from(input);

        assert_eq!(
            bar_type.instrument_id(),
            InstrumentId::from("BTCUSDT.BINANCE")
        );
        assert_eq!(
            bar_type.spec(),
            BarSpecification::new(1, BarAggregation::Minute, PriceType::Last)
        );
        assert_eq!(bar_type.aggregation_source(), AggregationSource::Internal);
        assert_eq!(bar_type.to_string(), input);
    }

    #[rstest]
    #[case("BTCUSDT-1-MINUTE-LAST")] // Missing aggregation source
    #[case("BTCUSDT.BINANCE-x-MINUTE-LAST-INTERNAL")] // Bad step
    #[case("BTCUSDT.BINANCE-1-YEARLY-LAST-INTERNAL")] // Unknown aggregation
    #[case("BTCUSDT.BINANCE-1-MINUTE-WRONG-INTERNAL")] // Unknown price type
    #[case("BTCUSDT.BINANCE-1-MINUTE-LAST-SOMEWHERE")] // Unknown source
    fn test_bar_type_parse_invalid(#[case] input: &str) {
        assert!(BarType::from_str(input).is_err());
    }

    #[rstest]
    fn test_get_bar_interval_ns() {
        let bar_type = BarType::from("AUD/USD.SIM-1-MINUTE-LAST-INTERNAL");
        assert_eq!(get_bar_interval_ns(&bar_type), 60_000_000_000);
    }

    #[rstest]
    fn test_bar_new_invariants() {
        let bar_type = BarType::from("AUD/USD.SIM-1-MINUTE-LAST-INTERNAL");
        let result = Bar::new_checked(
            bar_type,
            Price::from("1.00010"),
            Price::from("1.00000"), // high < open
            Price::from("0.99990"),
            Price::from("1.00005"),
            Quantity::from(100_000),
            UnixNanos::from(0),
            UnixNanos::from(1),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_bar_new_low_above_close_fails() {
        let bar_type = BarType::from("AUD/USD.SIM-1-MINUTE-LAST-INTERNAL");
        let result = Bar::new_checked(
            bar_type,
            Price::from("1.00010"),
            Price::from("1.00020"),
            Price::from("1.00005"),
            Price::from("1.00000"), // close < low
            Quantity::from(100_000),
            UnixNanos::from(0),
            UnixNanos::from(1),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_bar_display(stub_bar: Bar) {
        assert_eq!(
            stub_bar.to_string(),
            "AUD/USD.SIM-1-MINUTE-BID-EXTERNAL,1.00002,1.00010,1.00000,1.00007,100000,0"
        );
    }

    #[rstest]
    fn test_bar_serde_round_trip(stub_bar: Bar) {
        let serialized = stub_bar.as_json_bytes().unwrap();
        let deserialized = Bar::from_json_bytes(serialized.as_ref()).unwrap();
        assert_eq!(deserialized, stub_bar);
    }
}
