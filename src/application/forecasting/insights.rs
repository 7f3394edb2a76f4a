//! Cross-commodity market report built from the price history alone.

use super::predictor::round_price;
use crate::domain::forecast::insights::{
    MarketInsights, MarketOverview, PriceTrend, SeasonalPattern, TrendDirection,
};
use crate::domain::market::price_series::PriceSeries;
use chrono::Datelike;
use statrs::statistics::{Data, Distribution};

/// Window of the least-squares trend.
pub const TREND_WINDOW: usize = 30;
/// Share of rising commodities above which the market is called favourable.
pub const BULLISH_SHARE: f64 = 0.7;
pub const BEARISH_SHARE: f64 = 0.3;
/// Absolute price standard deviation flagged as volatile.
pub const VOLATILITY_ALERT: f64 = 50.0;

pub fn overview(series: &PriceSeries) -> Option<MarketOverview> {
    let prices = series.prices();
    let current = *prices.last()?;
    let average = prices.iter().sum::<f64>() / prices.len() as f64;
    Some(MarketOverview {
        current_price: round_price(current),
        average_price: round_price(average),
        price_change_percent: round_price((current - average) / average * 100.0),
        min_price: round_price(series.min_price()?),
        max_price: round_price(series.max_price()?),
    })
}

/// Ordinary least-squares slope of `ys` against 0, 1, 2, ...
pub fn linear_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return 0.0;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (mut cov, mut var) = (0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        cov += dx * (y - mean_y);
        var += dx * dx;
    }
    cov / var
}

pub fn trend(series: &PriceSeries) -> Option<PriceTrend> {
    if series.is_empty() {
        return None;
    }
    let slope = linear_slope(&series.tail(TREND_WINDOW));
    let volatility = Data::new(series.prices()).std_dev().unwrap_or(0.0);
    Some(PriceTrend {
        direction: if slope > 0.0 {
            TrendDirection::Upward
        } else {
            TrendDirection::Downward
        },
        strength: slope.abs(),
        volatility: if volatility.is_finite() {
            round_price(volatility)
        } else {
            0.0
        },
    })
}

/// Peak and low calendar months by average price, pooled over all years.
pub fn seasonal_pattern(series: &PriceSeries) -> Option<SeasonalPattern> {
    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];
    for day in series.daily_prices() {
        let m = day.date.month0() as usize;
        sums[m] += day.price;
        counts[m] += 1;
    }

    let monthly: Vec<(u32, f64)> = (0..12)
        .filter(|&m| counts[m] > 0)
        .map(|m| (m as u32 + 1, sums[m] / counts[m] as f64))
        .collect();
    if monthly.is_empty() {
        return None;
    }

    // First month wins on ties.
    let mut peak = monthly[0];
    let mut low = monthly[0];
    for &entry in &monthly[1..] {
        if entry.1 > peak.1 {
            peak = entry;
        }
        if entry.1 < low.1 {
            low = entry;
        }
    }
    let mean = monthly.iter().map(|(_, p)| p).sum::<f64>() / monthly.len() as f64;

    Some(SeasonalPattern {
        peak_month: peak.0,
        low_month: low.0,
        seasonal_variation: round_price((peak.1 - low.1) / mean * 100.0),
    })
}

/// Market-wide advice from the per-commodity sections of `insights`.
pub fn market_recommendations(insights: &MarketInsights, current_month: u32) -> Vec<String> {
    let mut recommendations = Vec::new();

    let total = insights.price_trends.len() as f64;
    let rising = insights
        .price_trends
        .values()
        .filter(|t| t.direction == TrendDirection::Upward)
        .count() as f64;
    if rising > total * BULLISH_SHARE {
        recommendations
            .push("Most crops showing upward price trends - favorable market conditions".to_string());
    } else if rising < total * BEARISH_SHARE {
        recommendations
            .push("Most crops showing downward price trends - consider holding produce".to_string());
    }

    let volatile: Vec<&str> = insights
        .price_trends
        .iter()
        .filter(|(_, t)| t.volatility > VOLATILITY_ALERT)
        .map(|(c, _)| c.as_str())
        .collect();
    if !volatile.is_empty() {
        recommendations.push(format!(
            "High volatility detected in: {} - monitor closely",
            volatile.join(", ")
        ));
    }

    let in_season: Vec<&str> = insights
        .seasonal_patterns
        .iter()
        .filter(|(_, p)| p.peak_month == current_month)
        .map(|(c, _)| c.as_str())
        .collect();
    if !in_season.is_empty() {
        recommendations.push(format!(
            "Peak season for: {} - optimal selling time",
            in_season.join(", ")
        ));
    }

    recommendations
}

/// Builds the full report over `series`.
pub fn build_insights<'a>(
    series: impl IntoIterator<Item = &'a PriceSeries>,
    current_month: u32,
) -> MarketInsights {
    let mut insights = MarketInsights::default();
    for s in series {
        let commodity = s.commodity().to_string();
        if let Some(o) = overview(s) {
            insights.market_overview.insert(commodity.clone(), o);
        }
        if let Some(t) = trend(s) {
            insights.price_trends.insert(commodity.clone(), t);
        }
        if let Some(p) = seasonal_pattern(s) {
            insights.seasonal_patterns.insert(commodity, p);
        }
    }
    insights.recommendations = market_recommendations(&insights, current_month);
    insights
}
