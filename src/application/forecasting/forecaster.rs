//! Multi-day forecasting.
//!
//! [`ForecastIter`] yields one prediction per day starting at the first
//! forecast date. It takes its model snapshot once at creation, so a model
//! republished mid-sequence does not change the remaining days.

use super::predictor::PredictionEngine;
use crate::application::ml::trainer::TrainedModel;
use crate::domain::config::ForecastMode;
use crate::domain::errors::{ForecastError, Result};
use crate::domain::forecast::prediction::PricePrediction;
use crate::domain::ml::feature_registry::MAX_LOOKBACK;
use chrono::{Days, NaiveDate};
use std::iter::FusedIterator;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation for long forecasts. Checked before each day.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lazy, finite forecast sequence. Stops after the first error.
pub struct ForecastIter<'a> {
    engine: &'a PredictionEngine,
    model: Arc<TrainedModel>,
    tail: Vec<f64>,
    series_len: usize,
    first_day: NaiveDate,
    days: usize,
    emitted: usize,
    mode: ForecastMode,
    cancel: Option<CancellationFlag>,
    done: bool,
}

impl<'a> ForecastIter<'a> {
    /// `tail` is the observed price tail, oldest first.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: &'a PredictionEngine,
        model: Arc<TrainedModel>,
        tail: Vec<f64>,
        series_len: usize,
        first_day: NaiveDate,
        days: usize,
        mode: ForecastMode,
        cancel: Option<CancellationFlag>,
    ) -> Result<Self> {
        if days < 1 {
            return Err(ForecastError::invalid("days must be at least 1"));
        }
        let start = tail.len().saturating_sub(MAX_LOOKBACK);
        Ok(Self {
            engine,
            model,
            tail: tail[start..].to_vec(),
            series_len,
            first_day,
            days,
            emitted: 0,
            mode,
            cancel,
            done: false,
        })
    }

    pub fn mode(&self) -> ForecastMode {
        self.mode
    }

    pub fn model_id(&self) -> uuid::Uuid {
        self.model.model_id
    }

    /// Working tail the next day's features will be built from.
    pub fn working_tail(&self) -> &[f64] {
        &self.tail
    }

    fn feed_back(&mut self, price: f64) {
        self.tail.push(price);
        if self.tail.len() > MAX_LOOKBACK {
            let excess = self.tail.len() - MAX_LOOKBACK;
            self.tail.drain(..excess);
        }
    }
}

impl Iterator for ForecastIter<'_> {
    type Item = Result<PricePrediction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.emitted >= self.days {
            return None;
        }
        if self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled) {
            self.done = true;
            return None;
        }

        let Some(date) = self.first_day.checked_add_days(Days::new(self.emitted as u64)) else {
            self.done = true;
            return Some(Err(ForecastError::invalid("forecast date out of range")));
        };
        self.emitted += 1;

        let result = self
            .engine
            .predict(&self.model, &self.tail, self.series_len, date);
        match &result {
            Ok(prediction) if self.mode == ForecastMode::Autoregressive => {
                self.feed_back(prediction.predicted_price);
            }
            Ok(_) => {}
            Err(_) => self.done = true,
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.days - self.emitted))
        }
    }
}

impl FusedIterator for ForecastIter<'_> {}
