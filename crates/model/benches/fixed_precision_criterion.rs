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

use std::hint::black_box;

use criterion::{Criterion, criterion_group};
use meridian_model::types::{
    Price, Quantity,
    fixed::{f64_to_fixed_i64, f64_to_fixed_u64},
};

pub fn bench_fixed_conversions(c: &mut Criterion) {
    c.bench_function("f64_to_fixed_i64", |b| {
        b.iter(|| f64_to_fixed_i64(black_box(-1.0), black_box(1)));
    });
    c.bench_function("f64_to_fixed_u64", |b| {
        b.iter(|| f64_to_fixed_u64(black_box(1.0), black_box(1)));
    });
}

pub fn bench_price_from_str(c: &mut Criterion) {
    c.bench_function("price_from_str", |b| {
        b.iter(|| Price::from(black_box("100.1234")));
    });
}

pub fn bench_price_add(c: &mut Criterion) {
    let a = Price::from("100.1234");
    let b_price = Price::from("0.0001");
    c.bench_function("price_add", |b| {
        b.iter(|| black_box(a) + black_box(b_price));
    });
}

pub fn bench_quantity_add(c: &mut Criterion) {
    let a = Quantity::from("100.1234");
    let b_qty = Quantity::from("0.0001");
    c.bench_function("quantity_add", |b| {
        b.iter(|| black_box(a) + black_box(b_qty));
    });
}

criterion_group!(
    benches,
    bench_fixed_conversions,
    bench_price_from_str,
    bench_price_add,
    bench_quantity_add
);
criterion::criterion_main!(benches);
