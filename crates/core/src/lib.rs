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

//! Core foundational types and utilities for the Meridian trading engine.
//!
//! The *core* crate is intentionally small and dependency-light. It supplies the building
//! blocks shared by every other crate in the workspace:
//!
//! - Nanosecond UNIX timestamp handling ([`UnixNanos`]).
//! - An atomic monotonic clock for wall-clock stamping ([`AtomicTime`]).
//! - Correctness validation functions in the *design by contract* style.
//! - Decimal precision inference for string parsing.
//! - Serialization traits for JSON and MsgPack encodings.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod correctness;
pub mod datetime;
pub mod nanos;
pub mod parsing;
pub mod serialization;
pub mod time;

// Re-exports
pub use crate::{nanos::UnixNanos, time::AtomicTime};
