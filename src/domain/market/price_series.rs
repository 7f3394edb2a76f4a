use crate::domain::errors::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single market observation for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub commodity: String,
    pub market: String,
    pub price: f64,
    pub unit: String,
    pub date: NaiveDate,
    pub quality: String,
    pub source: String,
}

impl PricePoint {
    /// Creates a point with the default market metadata (kg, unknown market/grade/source).
    pub fn new(commodity: &str, date: NaiveDate, price: f64) -> Self {
        Self {
            commodity: commodity.to_string(),
            market: "Unknown Market".to_string(),
            price,
            unit: "kg".to_string(),
            date,
            quality: "Ungraded".to_string(),
            source: "Unknown".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.commodity.trim().is_empty() {
            return Err(ForecastError::invalid("price point has an empty commodity"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ForecastError::invalid(format!(
                "price for {} on {} must be positive, got {}",
                self.commodity, self.date, self.price
            )));
        }
        Ok(())
    }
}

/// Mean of all observations sharing one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub price: f64,
    pub observations: usize,
}

/// Ordered observations for one commodity plus the canonical daily-mean series.
///
/// Several markets may report the same day; the engine only ever looks at
/// [`PriceSeries::daily_prices`], which collapses them to their mean.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    commodity: String,
    points: Vec<PricePoint>,
    daily: Vec<DailyPrice>,
    daily_sums: Vec<f64>,
}

impl PriceSeries {
    pub fn new(commodity: &str) -> Self {
        Self {
            commodity: commodity.to_string(),
            ..Default::default()
        }
    }

    /// Builds a series from unordered points. Points are sorted by date (stable).
    pub fn from_points(commodity: &str, mut points: Vec<PricePoint>) -> Result<Self> {
        points.sort_by_key(|p| p.date);
        let mut series = Self::new(commodity);
        for point in points {
            series.push(point)?;
        }
        Ok(series)
    }

    /// Appends an observation. Dates may repeat but never go backwards.
    pub fn push(&mut self, point: PricePoint) -> Result<()> {
        point.validate()?;
        if point.commodity != self.commodity {
            return Err(ForecastError::invalid(format!(
                "point for {} appended to series {}",
                point.commodity, self.commodity
            )));
        }
        if let Some(last) = self.points.last() {
            if point.date < last.date {
                return Err(ForecastError::invalid(format!(
                    "{} observation dated {} precedes last observation {}",
                    self.commodity, point.date, last.date
                )));
            }
        }

        match self.daily.last_mut() {
            Some(day) if day.date == point.date => {
                let sum = self.daily_sums.last_mut().map(|s| {
                    *s += point.price;
                    *s
                });
                day.observations += 1;
                day.price = sum.unwrap_or(point.price) / day.observations as f64;
            }
            _ => {
                self.daily.push(DailyPrice {
                    date: point.date,
                    price: point.price,
                    observations: 1,
                });
                self.daily_sums.push(point.price);
            }
        }

        self.points.push(point);
        Ok(())
    }

    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn daily_prices(&self) -> &[DailyPrice] {
        &self.daily
    }

    /// Canonical price per day, oldest first.
    pub fn prices(&self) -> Vec<f64> {
        self.daily.iter().map(|d| d.price).collect()
    }

    /// The last `n` canonical prices (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> Vec<f64> {
        let start = self.daily.len().saturating_sub(n);
        self.daily[start..].iter().map(|d| d.price).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.daily.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.daily.last().map(|d| d.date)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.daily.iter().map(|d| d.price).reduce(f64::min)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.daily.iter().map(|d| d.price).reduce(f64::max)
    }
}
