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

//! The core `AtomicTime` for real-time and static clocks.
//!
//! In **real-time mode** the clock reads the system wall clock while guaranteeing that
//! successive observations are strictly increasing (each read advances by at least one
//! nanosecond). In **static mode** the stored value only changes via [`AtomicTime::set_time`]
//! or [`AtomicTime::increment_time`], which suits deterministic tests and backtests.

use std::{
    ops::Deref,
    sync::{
        OnceLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::{datetime::NANOSECONDS_IN_SECOND, nanos::UnixNanos};

/// Global atomic clock in **real-time mode** for use across the system.
pub static ATOMIC_CLOCK_REALTIME: OnceLock<AtomicTime> = OnceLock::new();

/// Global atomic clock in **static mode** for use across the system.
pub static ATOMIC_CLOCK_STATIC: OnceLock<AtomicTime> = OnceLock::new();

/// Returns a static reference to the global atomic clock in **real-time mode**.
pub fn get_atomic_clock_realtime() -> &'static AtomicTime {
    ATOMIC_CLOCK_REALTIME.get_or_init(AtomicTime::default)
}

/// Returns a static reference to the global atomic clock in **static mode**.
pub fn get_atomic_clock_static() -> &'static AtomicTime {
    ATOMIC_CLOCK_STATIC.get_or_init(|| AtomicTime::new(false, UnixNanos::default()))
}

/// Returns the duration since the UNIX epoch from the system wall clock.
///
/// # Panics
///
/// Panics if the system clock reads as earlier than the UNIX epoch.
#[must_use]
pub fn duration_since_unix_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Error calling `SystemTime::now.duration_since`")
}

/// Returns the number of nanoseconds since the UNIX epoch from the system wall clock.
#[must_use]
pub fn nanos_since_unix_epoch() -> u64 {
    let duration = duration_since_unix_epoch();
    duration.as_secs() * NANOSECONDS_IN_SECOND + u64::from(duration.subsec_nanos())
}

/// Represents an atomic timekeeping structure.
///
/// [`AtomicTime`] can act as a real-time clock or static clock based on its mode.
#[derive(Debug)]
pub struct AtomicTime {
    /// Whether the clock is operating in **real-time mode** (`true`) or **static mode** (`false`).
    pub realtime: AtomicBool,
    /// The last recorded time in UNIX nanoseconds.
    pub timestamp_ns: AtomicU64,
}

impl Deref for AtomicTime {
    type Target = AtomicU64;

    fn deref(&self) -> &Self::Target {
        &self.timestamp_ns
    }
}

impl Default for AtomicTime {
    /// Creates a new default [`AtomicTime`] instance in **real-time mode**.
    fn default() -> Self {
        Self::new(true, UnixNanos::default())
    }
}

impl AtomicTime {
    /// Creates a new [`AtomicTime`] instance.
    ///
    /// - If `realtime` is `true`, the clock tracks the system wall clock.
    /// - If `realtime` is `false`, the clock starts in **static mode** at the given `time`.
    #[must_use]
    pub fn new(realtime: bool, time: UnixNanos) -> Self {
        Self {
            realtime: AtomicBool::new(realtime),
            timestamp_ns: AtomicU64::new(time.as_u64()),
        }
    }

    /// Returns the current UNIX timestamp in nanoseconds.
    ///
    /// In **real-time mode** each call returns a strictly increasing value.
    /// In **static mode** the stored value is returned unchanged.
    #[must_use]
    pub fn get_time_ns(&self) -> UnixNanos {
        if self.realtime.load(Ordering::Acquire) {
            self.time_since_epoch()
        } else {
            UnixNanos::from(self.timestamp_ns.load(Ordering::Acquire))
        }
    }

    /// Returns the current UNIX timestamp in microseconds.
    #[must_use]
    pub fn get_time_us(&self) -> u64 {
        self.get_time_ns().as_u64() / 1_000
    }

    /// Returns the current UNIX timestamp in milliseconds.
    #[must_use]
    pub fn get_time_ms(&self) -> u64 {
        self.get_time_ns().as_u64() / 1_000_000
    }

    /// Returns the current UNIX timestamp in seconds as `f64`.
    #[must_use]
    pub fn get_time(&self) -> f64 {
        self.get_time_ns().as_f64() / (NANOSECONDS_IN_SECOND as f64)
    }

    /// Manually sets a new time for the clock (only meaningful in **static mode**).
    pub fn set_time(&self, time: UnixNanos) {
        self.store(time.as_u64(), Ordering::Release);
    }

    /// Increments the current time by the given `delta` and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if incrementing would overflow `u64`.
    pub fn increment_time(&self, delta: u64) -> anyhow::Result<UnixNanos> {
        let current = self.load(Ordering::Acquire);
        let new = current
            .checked_add(delta)
            .ok_or_else(|| anyhow::anyhow!("Increment overflowed UNIX nanoseconds"))?;
        self.store(new, Ordering::Release);
        Ok(UnixNanos::from(new))
    }

    /// Returns a strictly increasing wall-clock time since the UNIX epoch.
    ///
    /// The returned value is at least one nanosecond greater than the previously
    /// observed value, regardless of system clock adjustments.
    #[must_use]
    pub fn time_since_epoch(&self) -> UnixNanos {
        let now = nanos_since_unix_epoch();
        let mut last = self.timestamp_ns.load(Ordering::Relaxed);
        loop {
            let next = now.max(last.saturating_add(1));
            match self.timestamp_ns.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return UnixNanos::from(next),
                Err(observed) => last = observed,
            }
        }
    }

    /// Switches the clock to **real-time mode**.
    pub fn make_realtime(&self) {
        self.realtime.store(true, Ordering::Release);
    }

    /// Switches the clock to **static mode**.
    pub fn make_static(&self) {
        self.realtime.store(false, Ordering::Release);
    }
}
