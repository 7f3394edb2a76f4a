use crate::domain::errors::{ForecastError, Result};
use crate::domain::market::price_series::PricePoint;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// One CSV row. Only `commodity`, `price` and `date` are required.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    commodity: String,
    #[serde(default)]
    market: Option<String>,
    price: f64,
    #[serde(default)]
    unit: Option<String>,
    date: NaiveDate,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

impl From<FeedRecord> for PricePoint {
    fn from(record: FeedRecord) -> Self {
        let mut point = PricePoint::new(record.commodity.trim(), record.date, record.price);
        if let Some(market) = record.market {
            point.market = market;
        }
        if let Some(unit) = record.unit {
            point.unit = unit;
        }
        if let Some(quality) = record.quality {
            point.quality = quality;
        }
        if let Some(source) = record.source {
            point.source = source;
        }
        point
    }
}

/// Reads `commodity,market,price,unit,date,quality,source` rows grouped by
/// commodity. Rows within a commodity keep file order.
pub fn read_price_csv<R: Read>(reader: R) -> Result<BTreeMap<String, Vec<PricePoint>>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut groups: BTreeMap<String, Vec<PricePoint>> = BTreeMap::new();

    for (i, result) in rdr.deserialize::<FeedRecord>().enumerate() {
        let record = result.map_err(|e| ForecastError::Feed {
            reason: format!("row {}: {}", i + 1, e),
        })?;
        let point = PricePoint::from(record);
        point.validate().map_err(|e| ForecastError::Feed {
            reason: format!("row {}: {}", i + 1, e),
        })?;
        groups.entry(point.commodity.clone()).or_default().push(point);
    }

    Ok(groups)
}

pub fn load_price_csv(path: &Path) -> Result<BTreeMap<String, Vec<PricePoint>>> {
    let file = File::open(path)?;
    let groups = read_price_csv(BufReader::new(file))?;
    info!(
        "Loaded {} commodities ({} points) from {:?}",
        groups.len(),
        groups.values().map(Vec::len).sum::<usize>(),
        path
    );
    Ok(groups)
}
