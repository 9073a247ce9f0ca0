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

//! Bar aggregation machinery.

use std::fmt::Debug;

use meridian_core::{
    AtomicTime, UnixNanos,
    correctness::{FAILED, check_equal},
};
use meridian_model::{
    data::{
        Bar, BarType, QuoteTick, TradeTick,
        bar::get_bar_interval_ns,
    },
    enums::AggregationSource,
    types::{Price, Quantity, fixed::FIXED_SCALAR, quantity::QuantityRaw},
};

/// A stateful aggregator consuming ticks and emitting bars for one [`BarType`].
pub trait BarAggregator {
    /// The [`BarType`] being aggregated.
    fn bar_type(&self) -> BarType;

    /// Updates the aggregator with the given price and size.
    fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos);

    /// Updates the aggregator with the given quote.
    fn handle_quote(&mut self, quote: QuoteTick) {
        let spec = self.bar_type().spec();
        self.update(
            quote.extract_price(spec.price_type),
            quote.extract_size(spec.price_type),
            quote.ts_event,
        );
    }

    /// Updates the aggregator with the given trade.
    fn handle_trade(&mut self, trade: TradeTick) {
        self.update(trade.price, trade.size, trade.ts_event);
    }
}

/// Provides a generic bar builder for aggregation.
pub struct BarBuilder {
    bar_type: BarType,
    size_precision: u8,
    initialized: bool,
    ts_last: UnixNanos,
    count: usize,
    last_close: Option<Price>,
    open: Option<Price>,
    high: Option<Price>,
    low: Option<Price>,
    close: Option<Price>,
    volume: Quantity,
}

impl Debug for BarBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(bar_type={}, count={})",
            stringify!(BarBuilder),
            self.bar_type,
            self.count,
        )
    }
}

impl BarBuilder {
    /// Creates a new [`BarBuilder`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `bar_type.aggregation_source` is not [`AggregationSource::Internal`]
    /// (aggregators never emit externally aggregated bars).
    #[must_use]
    pub fn new(bar_type: BarType, size_precision: u8) -> Self {
        check_equal(
            bar_type.aggregation_source(),
            AggregationSource::Internal,
            "bar_type.aggregation_source",
            "AggregationSource::Internal",
        )
        .expect(FAILED);

        Self {
            bar_type,
            size_precision,
            initialized: false,
            ts_last: UnixNanos::default(),
            count: 0,
            last_close: None,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: Quantity::zero(size_precision),
        }
    }

    /// Returns whether the builder has applied at least one update.
    #[must_use]
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the count of updates for the bar under construction.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Updates the builder with the given price, size and timestamp.
    ///
    /// Updates older than the last applied timestamp are dropped.
    pub fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        if ts_event < self.ts_last {
            return; // Not applicable
        }

        match self.open {
            None => {
                self.open = Some(price);
                self.high = Some(price);
                self.low = Some(price);
                self.initialized = true;
            }
            Some(_) => {
                if Some(price) > self.high {
                    self.high = Some(price);
                }
                if Some(price) < self.low {
                    self.low = Some(price);
                }
            }
        }

        self.close = Some(price);
        self.volume = self.volume + size;
        self.count += 1;
        self.ts_last = ts_event;
    }

    /// Resets all stateful fields to their initial value.
    pub fn reset(&mut self) {
        self.open = None;
        self.high = None;
        self.low = None;
        self.close = None;
        self.volume = Quantity::zero(self.size_precision);
        self.count = 0;
    }

    /// Returns the aggregated bar with `ts_event` as the last update time, and resets.
    pub fn build_now(&mut self, ts_init: UnixNanos) -> Bar {
        self.build(self.ts_last, ts_init)
    }

    /// Returns the aggregated bar with the given closing timestamp, and resets.
    ///
    /// A bar built with no updates carries the previous close forward.
    ///
    /// # Panics
    ///
    /// Panics if no updates were applied and there is no previous close.
    pub fn build(&mut self, ts_event: UnixNanos, ts_init: UnixNanos) -> Bar {
        if self.open.is_none() {
            self.open = self.last_close;
            self.high = self.last_close;
            self.low = self.last_close;
            self.close = self.last_close;
        }

        // SAFETY: The open was checked, so we can assume all prices are Some
        let bar = Bar::new(
            self.bar_type,
            self.open.expect("No open price (no updates or previous close)"),
            self.high.unwrap(),
            self.low.unwrap(),
            self.close.unwrap(),
            self.volume,
            ts_event,
            ts_init,
        );

        self.last_close = self.close;
        self.reset();
        bar
    }
}

/// Provides common aggregator state and bar emission for the concrete aggregators.
pub struct BarAggregatorCore<H>
where
    H: FnMut(Bar),
{
    bar_type: BarType,
    builder: BarBuilder,
    handler: H,
    clock: &'static AtomicTime,
}

impl<H> Debug for BarAggregatorCore<H>
where
    H: FnMut(Bar),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(bar_type={})",
            stringify!(BarAggregatorCore),
            self.bar_type,
        )
    }
}

impl<H> BarAggregatorCore<H>
where
    H: FnMut(Bar),
{
    /// Creates a new [`BarAggregatorCore`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `bar_type.aggregation_source` is not [`AggregationSource::Internal`].
    pub fn new(
        bar_type: BarType,
        size_precision: u8,
        handler: H,
        clock: &'static AtomicTime,
    ) -> Self {
        Self {
            bar_type,
            builder: BarBuilder::new(bar_type, size_precision),
            handler,
            clock,
        }
    }

    fn apply_update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        self.builder.update(price, size, ts_event);
    }

    /// Builds a bar from the current builder state and sends it to the handler.
    ///
    /// The emitted bar carries the last update time as `ts_event` and the emit
    /// wall-clock time as `ts_init`.
    fn build_now_and_send(&mut self) {
        let ts_init = self.clock.get_time_ns();
        let bar = self.builder.build_now(ts_init);
        log::debug!("Built {bar}");
        (self.handler)(bar);
    }

    /// Builds a bar with the given closing timestamp and sends it to the handler.
    fn build_and_send(&mut self, ts_event: UnixNanos) {
        let ts_init = self.clock.get_time_ns();
        let bar = self.builder.build(ts_event, ts_init);
        log::debug!("Built {bar}");
        (self.handler)(bar);
    }
}

/// Provides a means of building tick bars aggregated from quotes and trades.
///
/// When the received tick count reaches the step threshold of the bar
/// specification, a bar is created and sent to the handler.
pub struct TickBarAggregator<H>
where
    H: FnMut(Bar),
{
    core: BarAggregatorCore<H>,
}

impl<H> Debug for TickBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(bar_type={})", stringify!(TickBarAggregator), self.core.bar_type)
    }
}

impl<H> TickBarAggregator<H>
where
    H: FnMut(Bar),
{
    /// Creates a new [`TickBarAggregator`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `bar_type.aggregation_source` is not [`AggregationSource::Internal`].
    pub fn new(
        bar_type: BarType,
        size_precision: u8,
        handler: H,
        clock: &'static AtomicTime,
    ) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, size_precision, handler, clock),
        }
    }
}

impl<H> BarAggregator for TickBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        self.core.apply_update(price, size, ts_event);
        let spec = self.core.bar_type.spec();

        if self.core.builder.count >= spec.step.get() {
            self.core.build_now_and_send();
        }
    }
}

/// Provides a means of building volume bars aggregated from quotes and trades.
///
/// An update whose size crosses the step threshold is split across consecutive bars.
pub struct VolumeBarAggregator<H>
where
    H: FnMut(Bar),
{
    core: BarAggregatorCore<H>,
}

impl<H> Debug for VolumeBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(bar_type={})", stringify!(VolumeBarAggregator), self.core.bar_type)
    }
}

impl<H> VolumeBarAggregator<H>
where
    H: FnMut(Bar),
{
    /// Creates a new [`VolumeBarAggregator`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `bar_type.aggregation_source` is not [`AggregationSource::Internal`].
    pub fn new(
        bar_type: BarType,
        size_precision: u8,
        handler: H,
        clock: &'static AtomicTime,
    ) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, size_precision, handler, clock),
        }
    }
}

impl<H> BarAggregator for VolumeBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        let mut raw_size_update = size.raw;
        let spec = self.core.bar_type.spec();
        let raw_step = (spec.step.get() as f64 * FIXED_SCALAR) as QuantityRaw;

        while raw_size_update > 0 {
            if self.core.builder.volume.raw + raw_size_update < raw_step {
                self.core.apply_update(
                    price,
                    Quantity::from_raw(raw_size_update, size.precision),
                    ts_event,
                );
                break;
            }

            let raw_size_diff = raw_step - self.core.builder.volume.raw;
            self.core.apply_update(
                price,
                Quantity::from_raw(raw_size_diff, size.precision),
                ts_event,
            );

            self.core.build_now_and_send();
            raw_size_update -= raw_size_diff;
        }
    }
}

/// Provides a means of building value bars aggregated from quotes and trades.
///
/// The notional value (price * size) accumulates until the step threshold; an
/// update crossing the threshold is split proportionally across consecutive bars.
pub struct ValueBarAggregator<H>
where
    H: FnMut(Bar),
{
    core: BarAggregatorCore<H>,
    cum_value: f64,
}

impl<H> Debug for ValueBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(bar_type={})", stringify!(ValueBarAggregator), self.core.bar_type)
    }
}

impl<H> ValueBarAggregator<H>
where
    H: FnMut(Bar),
{
    /// Creates a new [`ValueBarAggregator`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `bar_type.aggregation_source` is not [`AggregationSource::Internal`].
    pub fn new(
        bar_type: BarType,
        size_precision: u8,
        handler: H,
        clock: &'static AtomicTime,
    ) -> Self {
        Self {
            core: BarAggregatorCore::new(bar_type, size_precision, handler, clock),
            cum_value: 0.0,
        }
    }

    /// Returns the cumulative notional value for the bar under construction.
    #[must_use]
    pub fn get_cumulative_value(&self) -> f64 {
        self.cum_value
    }
}

impl<H> BarAggregator for ValueBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        let mut size_update = size.as_f64();
        let spec = self.core.bar_type.spec();

        while size_update > 0.0 {
            let value_update = price.as_f64() * size_update;
            if self.cum_value + value_update < spec.step.get() as f64 {
                self.cum_value += value_update;
                self.core.apply_update(
                    price,
                    Quantity::new(size_update, size.precision),
                    ts_event,
                );
                break;
            }

            let value_diff = spec.step.get() as f64 - self.cum_value;
            let size_diff = size_update * (value_diff / value_update);
            self.core
                .apply_update(price, Quantity::new(size_diff, size.precision), ts_event);

            self.core.build_now_and_send();
            self.cum_value = 0.0;
            size_update -= size_diff;
        }
    }
}

/// Provides a means of building time bars aggregated from quotes and trades.
///
/// Aggregation is tick-driven: the open bar closes at the first update whose
/// `ts_event` is at or past the interval boundary, with the boundary as the bar's
/// `ts_event` and the emit wall-clock time as `ts_init`. Intervals with no updates
/// emit no bars.
pub struct TimeBarAggregator<H>
where
    H: FnMut(Bar),
{
    core: BarAggregatorCore<H>,
    interval_ns: UnixNanos,
    next_close_ns: UnixNanos,
}

impl<H> Debug for TimeBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(bar_type={})", stringify!(TimeBarAggregator), self.core.bar_type)
    }
}

impl<H> TimeBarAggregator<H>
where
    H: FnMut(Bar),
{
    /// Creates a new [`TimeBarAggregator`] instance.
    ///
    /// # Panics
    ///
    /// This function panics:
    /// - If `bar_type.aggregation_source` is not [`AggregationSource::Internal`].
    /// - If the aggregation method of `bar_type` is not time driven.
    pub fn new(
        bar_type: BarType,
        size_precision: u8,
        handler: H,
        clock: &'static AtomicTime,
    ) -> Self {
        let interval_ns = get_bar_interval_ns(&bar_type);
        Self {
            core: BarAggregatorCore::new(bar_type, size_precision, handler, clock),
            interval_ns,
            next_close_ns: UnixNanos::default(),
        }
    }

    /// Returns the next interval close boundary in UNIX nanoseconds.
    #[must_use]
    pub fn next_close_ns(&self) -> UnixNanos {
        self.next_close_ns
    }
}

impl<H> BarAggregator for TimeBarAggregator<H>
where
    H: FnMut(Bar),
{
    fn bar_type(&self) -> BarType {
        self.core.bar_type
    }

    fn update(&mut self, price: Price, size: Quantity, ts_event: UnixNanos) {
        let interval = self.interval_ns.as_u64();

        if self.next_close_ns == 0 {
            // Anchor interval boundaries to the epoch from the first update
            self.next_close_ns =
                UnixNanos::from((ts_event.as_u64() / interval + 1) * interval);
        }

        if ts_event >= self.next_close_ns {
            if self.core.builder.count > 0 {
                let close_ns = self.next_close_ns;
                self.core.build_and_send(close_ns);
            }

            // Skip over any intervals without updates
            while self.next_close_ns <= ts_event {
                self.next_close_ns += interval;
            }
        }

        self.core.apply_update(price, size, ts_event);
    }
}
