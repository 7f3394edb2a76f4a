use crate::domain::ports::IndicatorSource;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// No external signal: neutral pressures and no confidence jitter.
/// Keeps predictions deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralIndicators;

impl IndicatorSource for NeutralIndicators {
    fn supply_pressure(&self, _commodity: &str, _date: NaiveDate) -> f64 {
        1.0
    }

    fn demand_pressure(&self, _commodity: &str, _date: NaiveDate) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        "neutral"
    }
}

/// Uniform jitter standing in for real supply and demand data.
///
/// Supply pressure in [0.8, 1.2], demand pressure in [0.9, 1.1] and a
/// confidence offset in [-0.05, 0.05].
pub struct RandomIndicators {
    rng: Mutex<StdRng>,
}

impl RandomIndicators {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(&self, low: f64, high: f64) -> f64 {
        self.rng.lock().random_range(low..=high)
    }
}

impl Default for RandomIndicators {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorSource for RandomIndicators {
    fn supply_pressure(&self, _commodity: &str, _date: NaiveDate) -> f64 {
        self.sample(0.8, 1.2)
    }

    fn demand_pressure(&self, _commodity: &str, _date: NaiveDate) -> f64 {
        self.sample(0.9, 1.1)
    }

    fn confidence_jitter(&self, _commodity: &str) -> f64 {
        self.sample(-0.05, 0.05)
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_neutral_is_constant() {
        let source = NeutralIndicators;
        assert_eq!(source.supply_pressure("Rice", date()), 1.0);
        assert_eq!(source.demand_pressure("Rice", date()), 1.0);
        assert_eq!(source.confidence_jitter("Rice"), 0.0);
    }

    #[test]
    fn test_random_ranges() {
        let source = RandomIndicators::new();
        for _ in 0..200 {
            let s = source.supply_pressure("Rice", date());
            let d = source.demand_pressure("Rice", date());
            let j = source.confidence_jitter("Rice");
            assert!((0.8..=1.2).contains(&s), "supply {} out of bounds", s);
            assert!((0.9..=1.1).contains(&d), "demand {} out of bounds", d);
            assert!((-0.05..=0.05).contains(&j), "jitter {} out of bounds", j);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = RandomIndicators::seeded(7);
        let b = RandomIndicators::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.supply_pressure("Tea", date()), b.supply_pressure("Tea", date()));
        }
    }
}
