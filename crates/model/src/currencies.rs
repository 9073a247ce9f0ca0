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

//! Common `Currency` constants and the global currency registry.

use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex, OnceLock},
};

use ustr::Ustr;

use crate::{enums::CurrencyType, types::Currency};

/// The process-wide currency registry, seeded lazily with the built-in constants.
///
/// User-defined currencies are added via `Currency::register`.
pub static CURRENCY_MAP: LazyLock<Mutex<HashMap<String, Currency>>> = LazyLock::new(|| {
    let currencies = [
        // Fiat currencies
        Currency::AUD(),
        Currency::BRL(),
        Currency::CAD(),
        Currency::CHF(),
        Currency::CNY(),
        Currency::EUR(),
        Currency::GBP(),
        Currency::HKD(),
        Currency::INR(),
        Currency::JPY(),
        Currency::KRW(),
        Currency::MXN(),
        Currency::NOK(),
        Currency::NZD(),
        Currency::SEK(),
        Currency::SGD(),
        Currency::TRY(),
        Currency::USD(),
        Currency::ZAR(),
        // Commodity backed currencies
        Currency::XAG(),
        Currency::XAU(),
        // Crypto currencies
        Currency::ADA(),
        Currency::BNB(),
        Currency::BTC(),
        Currency::DOGE(),
        Currency::DOT(),
        Currency::ETH(),
        Currency::LTC(),
        Currency::SOL(),
        Currency::USDC(),
        Currency::USDT(),
        Currency::XRP(),
    ];

    Mutex::new(
        currencies
            .into_iter()
            .map(|currency| (currency.code.to_string(), currency))
            .collect(),
    )
});

macro_rules! define_currency {
    ($fn_name:ident, $code:literal, $precision:literal, $iso4217:literal, $name:literal, $currency_type:ident) => {
        #[allow(non_snake_case)]
        #[must_use]
        pub fn $fn_name() -> Self {
            static LOCK: OnceLock<Currency> = OnceLock::new();
            *LOCK.get_or_init(|| Self {
                code: Ustr::from($code),
                precision: $precision,
                iso4217: $iso4217,
                name: Ustr::from($name),
                currency_type: CurrencyType::$currency_type,
            })
        }
    };
}

impl Currency {
    ///////////////////////////////////////////////////////////////////////////
    // Fiat currencies
    ///////////////////////////////////////////////////////////////////////////
    define_currency!(AUD, "AUD", 2, 36, "Australian dollar", Fiat);
    define_currency!(BRL, "BRL", 2, 986, "Brazilian real", Fiat);
    define_currency!(CAD, "CAD", 2, 124, "Canadian dollar", Fiat);
    define_currency!(CHF, "CHF", 2, 756, "Swiss franc", Fiat);
    define_currency!(CNY, "CNY", 2, 156, "Chinese yuan", Fiat);
    define_currency!(EUR, "EUR", 2, 978, "Euro", Fiat);
    define_currency!(GBP, "GBP", 2, 826, "British pound", Fiat);
    define_currency!(HKD, "HKD", 2, 344, "Hong Kong dollar", Fiat);
    define_currency!(INR, "INR", 2, 356, "Indian rupee", Fiat);
    define_currency!(JPY, "JPY", 0, 392, "Japanese yen", Fiat);
    define_currency!(KRW, "KRW", 0, 410, "South Korean won", Fiat);
    define_currency!(MXN, "MXN", 2, 484, "Mexican peso", Fiat);
    define_currency!(NOK, "NOK", 2, 578, "Norwegian krone", Fiat);
    define_currency!(NZD, "NZD", 2, 554, "New Zealand dollar", Fiat);
    define_currency!(SEK, "SEK", 2, 752, "Swedish krona", Fiat);
    define_currency!(SGD, "SGD", 2, 702, "Singapore dollar", Fiat);
    define_currency!(TRY, "TRY", 2, 949, "Turkish lira", Fiat);
    define_currency!(USD, "USD", 2, 840, "United States dollar", Fiat);
    define_currency!(ZAR, "ZAR", 2, 710, "South African rand", Fiat);

    ///////////////////////////////////////////////////////////////////////////
    // Commodity backed currencies
    ///////////////////////////////////////////////////////////////////////////
    define_currency!(XAG, "XAG", 2, 961, "Silver (one troy ounce)", CommodityBacked);
    define_currency!(XAU, "XAU", 2, 959, "Gold (one troy ounce)", CommodityBacked);

    ///////////////////////////////////////////////////////////////////////////
    // Crypto currencies
    ///////////////////////////////////////////////////////////////////////////
    define_currency!(ADA, "ADA", 6, 0, "Cardano", Crypto);
    define_currency!(BNB, "BNB", 8, 0, "BNB", Crypto);
    define_currency!(BTC, "BTC", 8, 0, "Bitcoin", Crypto);
    define_currency!(DOGE, "DOGE", 8, 0, "Dogecoin", Crypto);
    define_currency!(DOT, "DOT", 8, 0, "Polkadot", Crypto);
    define_currency!(ETH, "ETH", 8, 0, "Ether", Crypto);
    define_currency!(LTC, "LTC", 8, 0, "Litecoin", Crypto);
    define_currency!(SOL, "SOL", 8, 0, "Solana", Crypto);
    define_currency!(USDC, "USDC", 8, 0, "USD Coin", Crypto);
    define_currency!(USDT, "USDT", 8, 0, "Tether", Crypto);
    define_currency!(XRP, "XRP", 6, 0, "XRP", Crypto);
}
