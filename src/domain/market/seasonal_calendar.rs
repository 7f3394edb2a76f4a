use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Demand regime for a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandRegime {
    Low,
    Neutral,
    High,
}

/// Month buckets with their seasonal demand multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonBuckets {
    pub low_months: Vec<u32>,
    pub high_months: Vec<u32>,
    #[serde(default = "default_low_multiplier")]
    pub low_multiplier: f64,
    #[serde(default = "default_high_multiplier")]
    pub high_multiplier: f64,
    #[serde(default = "default_neutral_multiplier")]
    pub neutral_multiplier: f64,
}

fn default_low_multiplier() -> f64 {
    0.8
}

fn default_high_multiplier() -> f64 {
    1.2
}

fn default_neutral_multiplier() -> f64 {
    1.0
}

impl Default for SeasonBuckets {
    /// Kerala defaults: monsoon (Jun-Oct) dampens demand, winter (Nov-Feb) lifts it.
    fn default() -> Self {
        Self {
            low_months: vec![6, 7, 8, 9, 10],
            high_months: vec![11, 12, 1, 2],
            low_multiplier: default_low_multiplier(),
            high_multiplier: default_high_multiplier(),
            neutral_multiplier: default_neutral_multiplier(),
        }
    }
}

impl SeasonBuckets {
    pub fn regime(&self, month: u32) -> DemandRegime {
        if self.low_months.contains(&month) {
            DemandRegime::Low
        } else if self.high_months.contains(&month) {
            DemandRegime::High
        } else {
            DemandRegime::Neutral
        }
    }

    pub fn multiplier(&self, month: u32) -> f64 {
        match self.regime(month) {
            DemandRegime::Low => self.low_multiplier,
            DemandRegime::High => self.high_multiplier,
            DemandRegime::Neutral => self.neutral_multiplier,
        }
    }

    /// Months must be 1..=12 and a month may not sit in both buckets.
    pub fn validate(&self) -> Result<(), String> {
        for m in self.low_months.iter().chain(self.high_months.iter()) {
            if !(1..=12).contains(m) {
                return Err(format!("month {} is outside 1..=12", m));
            }
        }
        if let Some(m) = self.low_months.iter().find(|m| self.high_months.contains(m)) {
            return Err(format!("month {} is both a low and a high demand month", m));
        }
        Ok(())
    }
}

/// Seasonal demand lookup: default buckets plus optional per-commodity overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalCalendar {
    #[serde(default)]
    pub default: SeasonBuckets,
    #[serde(default)]
    pub overrides: HashMap<String, SeasonBuckets>,
}

impl SeasonalCalendar {
    pub fn new(default: SeasonBuckets) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, commodity: &str, buckets: SeasonBuckets) -> Self {
        self.overrides.insert(commodity.to_string(), buckets);
        self
    }

    pub fn buckets_for(&self, commodity: &str) -> &SeasonBuckets {
        self.overrides.get(commodity).unwrap_or(&self.default)
    }

    pub fn demand_multiplier(&self, commodity: &str, date: NaiveDate) -> f64 {
        self.buckets_for(commodity).multiplier(date.month())
    }

    /// Parses a TOML calendar, e.g.
    ///
    /// ```toml
    /// [default]
    /// low_months = [6, 7, 8, 9, 10]
    /// high_months = [11, 12, 1, 2]
    ///
    /// [overrides.Pepper]
    /// low_months = [3, 4]
    /// high_months = [12, 1]
    /// high_multiplier = 1.3
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        let calendar: SeasonalCalendar = toml::from_str(s).map_err(|e| e.to_string())?;
        calendar.validate()?;
        Ok(calendar)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.default.validate()?;
        for (commodity, buckets) in &self.overrides {
            buckets
                .validate()
                .map_err(|e| format!("override for {}: {}", commodity, e))?;
        }
        Ok(())
    }
}
