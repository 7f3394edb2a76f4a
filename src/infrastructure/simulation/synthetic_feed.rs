//! Synthetic daily price history for demos and tests.
//!
//! Each day's price is the commodity average scaled by a yearly sine wave,
//! uniform noise and a 2% per year drift, clamped to the commodity's range.

use crate::domain::market::price_series::PricePoint;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;

const SEASONAL_AMPLITUDE: f64 = 0.2;
const YEARLY_DRIFT: f64 = 0.02;

/// Price band of one commodity, per kg.
#[derive(Debug, Clone, PartialEq)]
pub struct CommodityProfile {
    pub name: String,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
}

impl CommodityProfile {
    pub fn new(name: &str, min_price: f64, max_price: f64, avg_price: f64) -> Self {
        Self {
            name: name.to_string(),
            min_price,
            max_price,
            avg_price,
        }
    }
}

/// Typical Kerala market bands.
pub fn kerala_profiles() -> Vec<CommodityProfile> {
    [
        ("Rice", 25.0, 35.0, 30.0),
        ("Coconut", 12.0, 22.0, 17.0),
        ("Pepper", 400.0, 550.0, 475.0),
        ("Cardamom", 1000.0, 1500.0, 1250.0),
        ("Rubber", 120.0, 180.0, 150.0),
        ("Banana", 20.0, 35.0, 27.0),
        ("Ginger", 60.0, 120.0, 90.0),
        ("Turmeric", 80.0, 150.0, 115.0),
        ("Tea", 200.0, 300.0, 250.0),
        ("Coffee", 300.0, 450.0, 375.0),
    ]
    .into_iter()
    .map(|(name, min, max, avg)| CommodityProfile::new(name, min, max, avg))
    .collect()
}

pub struct SyntheticFeed {
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
}

impl SyntheticFeed {
    /// Inclusive date range. Each commodity draws from its own RNG derived
    /// from `seed`, so output does not depend on generation order.
    pub fn new(start: NaiveDate, end: NaiveDate, seed: u64) -> Self {
        Self { start, end, seed }
    }

    fn commodity_seed(&self, name: &str) -> u64 {
        name.bytes()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
    }

    pub fn generate(&self, profile: &CommodityProfile) -> Vec<PricePoint> {
        let mut rng = StdRng::seed_from_u64(self.commodity_seed(&profile.name));
        let start_year = self.start.year();

        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .map(|date| {
                let seasonal =
                    1.0 + SEASONAL_AMPLITUDE * (2.0 * PI * date.ordinal() as f64 / 365.0).sin();
                let noise = rng.random_range(0.9..=1.1);
                let drift = 1.0 + (date.year() - start_year) as f64 * YEARLY_DRIFT;
                let raw = profile.avg_price * seasonal * noise * drift;
                let price = (raw.clamp(profile.min_price, profile.max_price) * 100.0).round() / 100.0;

                let mut point = PricePoint::new(&profile.name, date, price);
                point.market = "Kerala Market".to_string();
                point.quality = "Grade A".to_string();
                point.source = "Historical Data".to_string();
                point
            })
            .collect()
    }

    pub fn generate_all(&self, profiles: &[CommodityProfile]) -> BTreeMap<String, Vec<PricePoint>> {
        profiles
            .iter()
            .map(|p| (p.name.clone(), self.generate(p)))
            .collect()
    }
}
