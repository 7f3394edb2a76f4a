//! In-Memory Series Store
//!
//! Thread-safe implementation of [`SeriesRepository`] backed by a map of
//! `Arc<PriceSeries>` snapshots.
//!
//! # Snapshots
//!
//! Appends clone the series only when a reader still holds the current
//! snapshot (`Arc::make_mut`), so readers never observe a half-applied
//! append and uncontended appends stay cheap.
//!
//! # Limitations
//!
//! - Data is lost on restart
//! - Limited by available RAM

use crate::domain::errors::{ForecastError, Result};
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::repositories::SeriesRepository;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

#[derive(Default)]
pub struct InMemorySeriesRepository {
    series: RwLock<HashMap<String, Arc<PriceSeries>>>,
}

impl InMemorySeriesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from grouped points, e.g. a feed load.
    pub fn from_groups(groups: impl IntoIterator<Item = (String, Vec<PricePoint>)>) -> Result<Self> {
        let repo = Self::new();
        for (commodity, points) in groups {
            repo.replace_series(&commodity, points)?;
        }
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.series.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.read().is_empty()
    }
}

impl SeriesRepository for InMemorySeriesRepository {
    fn get_series(&self, commodity: &str) -> Result<Arc<PriceSeries>> {
        self.series
            .read()
            .get(commodity)
            .cloned()
            .ok_or_else(|| ForecastError::unknown_commodity(commodity))
    }

    fn append(&self, commodity: &str, point: PricePoint) -> Result<()> {
        let mut map = self.series.write();
        match map.entry(commodity.to_string()) {
            Entry::Occupied(mut entry) => Arc::make_mut(entry.get_mut()).push(point),
            Entry::Vacant(entry) => {
                // A rejected first point must not register the commodity.
                let mut series = PriceSeries::new(commodity);
                series.push(point)?;
                entry.insert(Arc::new(series));
                Ok(())
            }
        }
    }

    fn replace_series(&self, commodity: &str, points: Vec<PricePoint>) -> Result<()> {
        // Built outside the lock; a bad point leaves the old series in place.
        let series = PriceSeries::from_points(commodity, points)?;
        self.series
            .write()
            .insert(commodity.to_string(), Arc::new(series));
        Ok(())
    }

    fn commodities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(commodity: &str, day: u32, price: f64) -> PricePoint {
        PricePoint::new(
            commodity,
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
        )
    }

    #[test]
    fn test_unknown_commodity() {
        let repo = InMemorySeriesRepository::new();
        let err = repo.get_series("Saffron").unwrap_err();
        assert!(matches!(err, ForecastError::UnknownCommodity { .. }));
    }

    #[test]
    fn test_append_creates_series() {
        let repo = InMemorySeriesRepository::new();
        repo.append("Rice", point("Rice", 1, 30.0)).unwrap();
        repo.append("Rice", point("Rice", 2, 31.0)).unwrap();

        assert_eq!(repo.get_series("Rice").unwrap().len(), 2);
        assert_eq!(repo.tail("Rice", 1).unwrap(), vec![31.0]);
        assert_eq!(repo.commodities(), vec!["Rice".to_string()]);
    }

    #[test]
    fn test_append_rejects_bad_points() {
        let repo = InMemorySeriesRepository::new();
        repo.append("Rice", point("Rice", 5, 30.0)).unwrap();

        assert!(repo.append("Rice", point("Rice", 4, 30.0)).is_err());
        assert!(repo.append("Rice", point("Rice", 6, -1.0)).is_err());
        assert!(repo.append("Rice", point("Tea", 6, 200.0)).is_err());
        assert_eq!(repo.get_series("Rice").unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_first_append_leaves_commodity_unknown() {
        let repo = InMemorySeriesRepository::new();

        assert!(repo.append("Vanilla", point("Vanilla", 1, -5.0)).is_err());
        assert!(repo.append("Vanilla", point("Rice", 1, 30.0)).is_err());

        assert!(repo.commodities().is_empty());
        assert!(repo.is_empty());
        assert!(matches!(
            repo.get_series("Vanilla").unwrap_err(),
            ForecastError::UnknownCommodity { .. }
        ));
    }

    #[test]
    fn test_snapshot_is_not_mutated_by_append() {
        let repo = InMemorySeriesRepository::new();
        repo.append("Rice", point("Rice", 1, 30.0)).unwrap();

        let snapshot = repo.get_series("Rice").unwrap();
        repo.append("Rice", point("Rice", 2, 32.0)).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(repo.get_series("Rice").unwrap().len(), 2);
    }

    #[test]
    fn test_replace_series_sorts() {
        let repo = InMemorySeriesRepository::new();
        repo.replace_series(
            "Tea",
            vec![point("Tea", 3, 250.0), point("Tea", 1, 240.0)],
        )
        .unwrap();
        assert_eq!(repo.tail("Tea", 5).unwrap(), vec![240.0, 250.0]);
    }
}
