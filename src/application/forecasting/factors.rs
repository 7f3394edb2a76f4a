use crate::domain::forecast::prediction::PredictionFactors;
use crate::domain::market::seasonal_calendar::SeasonalCalendar;
use crate::domain::ports::IndicatorSource;
use chrono::NaiveDate;
use statrs::statistics::{Data, Distribution};
use std::sync::Arc;

/// Trailing window used for trend and volatility.
pub const FACTOR_WINDOW: usize = 30;

pub const CONFIDENCE_FLOOR: f64 = 0.5;
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// Base confidence from how much history the model has seen.
pub fn base_confidence(series_len: usize) -> f64 {
    if series_len > 1000 {
        0.85
    } else if series_len > 500 {
        0.75
    } else {
        0.65
    }
}

fn window(prices: &[f64]) -> &[f64] {
    &prices[prices.len().saturating_sub(FACTOR_WINDOW)..]
}

/// Relative change from the first to the last of the trailing prices.
pub fn price_trend(prices: &[f64]) -> f64 {
    match window(prices) {
        [first, .., last] if *first != 0.0 => (last - first) / first,
        _ => 0.0,
    }
}

/// Coefficient of variation (sample std / mean) of the trailing prices.
pub fn market_volatility(prices: &[f64]) -> f64 {
    let recent = window(prices);
    if recent.len() < 2 {
        return 0.0;
    }
    let data = Data::new(recent.to_vec());
    match (data.mean(), data.std_dev()) {
        (Some(mean), Some(std_dev)) if mean > 0.0 && std_dev.is_finite() => std_dev / mean,
        _ => 0.0,
    }
}

/// Derives the explanatory factors and confidence of a prediction.
pub struct FactorAnalyzer {
    calendar: SeasonalCalendar,
    indicators: Arc<dyn IndicatorSource>,
}

impl FactorAnalyzer {
    pub fn new(calendar: SeasonalCalendar, indicators: Arc<dyn IndicatorSource>) -> Self {
        Self {
            calendar,
            indicators,
        }
    }

    pub fn indicator_source(&self) -> &str {
        self.indicators.name()
    }

    /// Clamped to [0.5, 0.95]. A heuristic, not a calibrated interval.
    pub fn confidence(&self, commodity: &str, series_len: usize) -> f64 {
        (base_confidence(series_len) + self.indicators.confidence_jitter(commodity))
            .clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
    }

    pub fn analyze(&self, commodity: &str, target: NaiveDate, prices: &[f64]) -> PredictionFactors {
        PredictionFactors {
            seasonal_demand: self.calendar.demand_multiplier(commodity, target),
            price_trend: price_trend(prices),
            market_volatility: market_volatility(prices),
            supply_pressure: self.indicators.supply_pressure(commodity, target),
            demand_pressure: self.indicators.demand_pressure(commodity, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedJitter(f64);

    impl IndicatorSource for FixedJitter {
        fn supply_pressure(&self, _: &str, _: NaiveDate) -> f64 {
            1.1
        }

        fn demand_pressure(&self, _: &str, _: NaiveDate) -> f64 {
            0.9
        }

        fn confidence_jitter(&self, _: &str) -> f64 {
            self.0
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn analyzer(jitter: f64) -> FactorAnalyzer {
        FactorAnalyzer::new(SeasonalCalendar::default(), Arc::new(FixedJitter(jitter)))
    }

    #[test]
    fn test_base_confidence_tiers() {
        assert_eq!(base_confidence(1001), 0.85);
        assert_eq!(base_confidence(1000), 0.75);
        assert_eq!(base_confidence(501), 0.75);
        assert_eq!(base_confidence(500), 0.65);
        assert_eq!(base_confidence(0), 0.65);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(analyzer(0.5).confidence("Rice", 2000), 0.95);
        assert_eq!(analyzer(-0.5).confidence("Rice", 10), 0.5);
        assert!((analyzer(0.03).confidence("Rice", 600) - 0.78).abs() < 1e-12);
    }

    #[test]
    fn test_trend_uses_trailing_window() {
        // 40 prices; the window covers the last 30 (11..=40).
        let prices: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        assert!((price_trend(&prices) - (40.0 - 11.0) / 11.0).abs() < 1e-12);
        assert_eq!(price_trend(&[5.0]), 0.0);
        assert_eq!(price_trend(&[]), 0.0);
    }

    #[test]
    fn test_volatility() {
        assert_eq!(market_volatility(&[10.0, 10.0, 10.0]), 0.0);
        assert_eq!(market_volatility(&[10.0]), 0.0);

        // mean 20, sample std 10
        let v = market_volatility(&[10.0, 20.0, 30.0]);
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_combines_sources() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let factors = analyzer(0.0).analyze("Rice", date, &[10.0, 11.0]);
        assert_eq!(factors.seasonal_demand, 0.8);
        assert!((factors.price_trend - 0.1).abs() < 1e-12);
        assert_eq!(factors.supply_pressure, 1.1);
        assert_eq!(factors.demand_pressure, 0.9);
    }
}
