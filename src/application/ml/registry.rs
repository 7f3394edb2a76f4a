use super::trainer::TrainedModel;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Commodity → trained model map shared by training and serving.
///
/// Readers clone the `Arc` under a short read lock and predict lock-free.
/// Publishing swaps a whole entry, so a reader sees either the old model or
/// the new one, never a mix.
#[derive(Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<String, Arc<TrainedModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, commodity: &str) -> Option<Arc<TrainedModel>> {
        self.models.read().get(commodity).cloned()
    }

    /// Publishes a model, returning the one it replaced.
    pub fn publish(&self, model: TrainedModel) -> Option<Arc<TrainedModel>> {
        let commodity = model.commodity.clone();
        self.models.write().insert(commodity, Arc::new(model))
    }

    /// Drops the commodity's model; returns it if there was one.
    pub fn remove(&self, commodity: &str) -> Option<Arc<TrainedModel>> {
        self.models.write().remove(commodity)
    }

    /// Replaces every entry in a single swap.
    pub fn replace_all(&self, models: HashMap<String, Arc<TrainedModel>>) {
        *self.models.write() = models;
    }

    pub fn snapshot(&self) -> HashMap<String, Arc<TrainedModel>> {
        self.models.read().clone()
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    pub fn commodities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::trainer::ModelTrainer;
    use crate::domain::config::TrainingConfig;
    use crate::domain::market::price_series::{PricePoint, PriceSeries};
    use chrono::{Duration, NaiveDate};

    fn model(commodity: &str) -> TrainedModel {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = (0..140)
            .map(|i| {
                PricePoint::new(
                    commodity,
                    start + Duration::days(i),
                    50.0 + (i % 9) as f64,
                )
            })
            .collect();
        let series = PriceSeries::from_points(commodity, points).unwrap();
        ModelTrainer::new(TrainingConfig::lightweight())
            .train(&series)
            .unwrap()
    }

    #[test]
    fn test_publish_replaces_entry() {
        let registry = ModelRegistry::new();
        assert!(registry.get("Rice").is_none());

        let first = model("Rice");
        let first_id = first.model_id;
        assert!(registry.publish(first).is_none());

        // A reader holding the old Arc keeps a usable model after the swap.
        let held = registry.get("Rice").unwrap();
        let replaced = registry.publish(model("Rice")).unwrap();
        assert_eq!(replaced.model_id, first_id);
        assert_eq!(held.model_id, first_id);
        assert_ne!(registry.get("Rice").unwrap().model_id, first_id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let registry = ModelRegistry::new();
        registry.publish(model("Rice"));

        let held = registry.get("Rice").unwrap();
        let removed = registry.remove("Rice").unwrap();
        assert_eq!(removed.model_id, held.model_id);
        assert!(registry.get("Rice").is_none());
        assert!(registry.remove("Rice").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_all() {
        let registry = ModelRegistry::new();
        registry.publish(model("Rice"));

        let mut fresh = HashMap::new();
        fresh.insert("Tea".to_string(), Arc::new(model("Tea")));
        registry.replace_all(fresh);

        assert_eq!(registry.commodities(), vec!["Tea".to_string()]);
        assert!(registry.get("Rice").is_none());
    }
}
