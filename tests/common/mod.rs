#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate};
use cropcast::application::ForecastService;
use cropcast::domain::config::{ForecastConfig, TrainingConfig};
use cropcast::domain::market::PricePoint;
use cropcast::infrastructure::FixedClock;
use std::f64::consts::PI;
use std::sync::Arc;

/// Day after which forecasts start in every test service.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

/// `days` daily points ending today: `avg` with a ±10% yearly swing and a
/// small deterministic wobble.
pub fn seasonal_points(commodity: &str, avg: f64, days: i64) -> Vec<PricePoint> {
    let start = today() - Duration::days(days - 1);
    (0..days)
        .map(|i| {
            let date = start + Duration::days(i);
            let season = 1.0 + 0.1 * (2.0 * PI * date.ordinal0() as f64 / 365.0).sin();
            let wobble = 1.0 + 0.01 * ((i * 7 % 5) as f64 - 2.0);
            let price = (avg * season * wobble * 100.0).round() / 100.0;
            PricePoint::new(commodity, date, price)
        })
        .collect()
}

pub fn service() -> ForecastService {
    ForecastService::in_memory(TrainingConfig::lightweight(), ForecastConfig::default())
        .with_clock(Arc::new(FixedClock(today())))
}

pub fn service_with(points: &[(&str, f64, i64)]) -> ForecastService {
    let service = service();
    for (commodity, avg, days) in points {
        service
            .replace_series(commodity, seasonal_points(commodity, *avg, *days))
            .unwrap();
    }
    service
}

pub fn temp_dir(tag: &str) -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let dir = std::env::temp_dir().join(format!(
        "cropcast_{}_{}_{}",
        tag,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).expect("Failed to create test temp dir");
    dir
}
