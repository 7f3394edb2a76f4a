use chrono::NaiveDate;

/// Source of market indicators the price history cannot supply.
///
/// Real implementations would read inventory levels or weather-linked supply
/// shocks. Values are multipliers around 1.0, except `confidence_jitter`
/// which is an additive offset.
pub trait IndicatorSource: Send + Sync {
    fn supply_pressure(&self, commodity: &str, date: NaiveDate) -> f64;

    fn demand_pressure(&self, commodity: &str, date: NaiveDate) -> f64;

    fn confidence_jitter(&self, _commodity: &str) -> f64 {
        0.0
    }

    fn name(&self) -> &str;
}

/// Provides "today" so defaults like "tomorrow" are testable.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn tomorrow(&self) -> NaiveDate {
        self.today().succ_opt().unwrap_or(NaiveDate::MAX)
    }
}
