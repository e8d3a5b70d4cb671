use std::collections::HashMap;

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Fixed 23% VAT rate.
pub const VAT_RATE: Decimal = Decimal::from_parts(23, 0, 0, false, 2);

/// Package price table. Enterprise is quote-on-request and deliberately
/// priced at zero here; display layers special-case it.
pub static PACKAGE_PRICES: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    HashMap::from([
        ("basic", Decimal::from(990)),
        ("standard", Decimal::from(2490)),
        ("premium", Decimal::from(4990)),
        ("enterprise", Decimal::ZERO),
    ])
});

pub static ADDITIONAL_SERVICE_PRICES: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    HashMap::from([
        ("drone", Decimal::from(800)),
        ("commentator", Decimal::from(600)),
        ("graphics_custom", Decimal::from(400)),
        ("highlights", Decimal::from(500)),
        ("multistream", Decimal::from(300)),
        ("vod", Decimal::from(200)),
        ("led_screen", Decimal::from(1500)),
        ("sound_system", Decimal::from(800)),
        ("photographer", Decimal::from(700)),
        ("transcript", Decimal::from(350)),
    ])
});

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub additional_total: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

/// Prices a package selection with add-ons and a percentage discount.
///
/// Unknown package or add-on codes price as zero instead of failing; callers
/// that want to reject them do so before quoting. The discount may be
/// negative (a surcharge) or above 100 (net goes negative and is reported as
/// computed). Only the gross is rounded, to 2 decimals, half-up.
pub fn quote<'a, I>(package: &str, additional_services: I, discount_percent: Decimal) -> PriceBreakdown
where
    I: IntoIterator<Item = &'a str>,
{
    let base_price = PACKAGE_PRICES
        .get(package)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let additional_total = additional_services
        .into_iter()
        .map(|code| {
            ADDITIONAL_SERVICE_PRICES
                .get(code)
                .copied()
                .unwrap_or(Decimal::ZERO)
        })
        .sum::<Decimal>();
    let subtotal = base_price + additional_total;
    let discount_amount = subtotal * discount_percent / Decimal::from(100);
    let net = subtotal - discount_amount;
    let vat = net * VAT_RATE;
    let gross = (net + vat).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    PriceBreakdown {
        base_price,
        additional_total,
        subtotal,
        discount_amount,
        net,
        vat,
        gross,
    }
}

/// Offer expiry date: today plus the validity window, as an ISO calendar date.
pub fn valid_until(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub const DEFAULT_VALID_DAYS: i64 = 14;
