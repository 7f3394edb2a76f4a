use crate::domain::config::RecommendationThresholds;
use crate::domain::forecast::prediction::PredictionFactors;

pub const SEPARATOR: &str = " | ";

/// Composes the selling advice for a prediction from its factors.
///
/// One trend sentence, an optional seasonal sentence and one volatility
/// sentence, in that order.
pub fn recommend(factors: &PredictionFactors, thresholds: &RecommendationThresholds) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);

    parts.push(if factors.price_trend > thresholds.trend_up {
        "Prices are trending upward - consider holding your produce"
    } else if factors.price_trend < thresholds.trend_down {
        "Prices are declining - consider selling soon"
    } else {
        "Prices are stable - monitor market conditions"
    });

    if factors.seasonal_demand > thresholds.seasonal_high {
        parts.push("High seasonal demand expected - good time to sell");
    } else if factors.seasonal_demand < thresholds.seasonal_low {
        parts.push("Low seasonal demand - consider storing if possible");
    }

    parts.push(if factors.market_volatility > thresholds.high_volatility {
        "High market volatility - consider selling in smaller batches"
    } else {
        "Stable market conditions - normal selling strategy recommended"
    });

    parts.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(trend: f64, seasonal: f64, volatility: f64) -> PredictionFactors {
        PredictionFactors {
            seasonal_demand: seasonal,
            price_trend: trend,
            market_volatility: volatility,
            supply_pressure: 1.0,
            demand_pressure: 1.0,
        }
    }

    #[test]
    fn test_stable_neutral_market() {
        let text = recommend(&factors(0.0, 1.0, 0.05), &RecommendationThresholds::default());
        assert_eq!(
            text,
            "Prices are stable - monitor market conditions | \
             Stable market conditions - normal selling strategy recommended"
        );
    }

    #[test]
    fn test_rising_high_season_volatile() {
        let text = recommend(&factors(0.15, 1.2, 0.3), &RecommendationThresholds::default());
        let parts: Vec<&str> = text.split(SEPARATOR).collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].contains("trending upward"));
        assert!(parts[1].contains("High seasonal demand"));
        assert!(parts[2].contains("High market volatility"));
    }

    #[test]
    fn test_declining_low_season() {
        let text = recommend(&factors(-0.2, 0.8, 0.1), &RecommendationThresholds::default());
        assert!(text.starts_with("Prices are declining"));
        assert!(text.contains("Low seasonal demand"));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let t = RecommendationThresholds::default();
        let text = recommend(&factors(0.1, 1.1, 0.2), &t);
        assert!(text.starts_with("Prices are stable"));
        assert!(!text.contains("seasonal"));
        assert!(text.ends_with("normal selling strategy recommended"));
    }
}
