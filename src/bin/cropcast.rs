use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use cropcast::application::ForecastService;
use cropcast::application::ml::TrainOutcome;
use cropcast::config::{Config, LogFormat, ObservabilityEnvConfig};
use cropcast::domain::config::ForecastMode;
use cropcast::domain::forecast::PricePrediction;
use cropcast::infrastructure::feed::load_price_csv;
use cropcast::infrastructure::repositories::InMemorySeriesRepository;
use cropcast::infrastructure::simulation::{SyntheticFeed, kerala_profiles};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Commodity price forecasting", long_about = None)]
struct Args {
    /// Price history CSV (commodity,market,price,unit,date,quality,source).
    /// Without it a synthetic Kerala feed is generated.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// First day of the synthetic feed
    #[arg(long, default_value = "2020-01-01")]
    synthetic_start: NaiveDate,

    /// Last day of the synthetic feed
    #[arg(long, default_value = "2024-12-31")]
    synthetic_end: NaiveDate,

    /// Seed of the synthetic feed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Train models for every commodity
    #[arg(long)]
    train: bool,

    /// Write trained models to this artifact file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Load models from this artifact file instead of training
    #[arg(long)]
    load: Option<PathBuf>,

    /// Predict one day for this commodity
    #[arg(long)]
    predict: Option<String>,

    /// Target date for --predict (default: tomorrow)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Multi-day forecast for this commodity
    #[arg(long)]
    forecast: Option<String>,

    /// Forecast horizon (default: FORECAST_DEFAULT_DAYS)
    #[arg(long)]
    days: Option<usize>,

    /// naive | autoregressive (default: FORECAST_MODE)
    #[arg(long)]
    mode: Option<ForecastMode>,

    /// Print the market insights report
    #[arg(long)]
    insights: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(config: &ObservabilityEnvConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn print_prediction(p: &PricePrediction) {
    println!(
        "{}  {:<10} ₹{:>9.2}  confidence {:.2}  trend {:+.3}  volatility {:.3}  season {:.1}",
        p.prediction_date,
        p.commodity,
        p.predicted_price,
        p.confidence,
        p.factors.price_trend,
        p.factors.market_volatility,
        p.factors.seasonal_demand
    );
    println!("            {}", p.recommendation);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.observability);

    info!("cropcast {} starting", env!("CARGO_PKG_VERSION"));

    let groups = match &args.csv {
        Some(path) => load_price_csv(path)
            .with_context(|| format!("Failed to load price feed {:?}", path))?,
        None => {
            info!(
                "No --csv given; generating synthetic feed {} to {} (seed {})",
                args.synthetic_start, args.synthetic_end, args.seed
            );
            SyntheticFeed::new(args.synthetic_start, args.synthetic_end, args.seed)
                .generate_all(&kerala_profiles())
        }
    };
    let store = InMemorySeriesRepository::from_groups(groups).context("Invalid price feed")?;
    let service = ForecastService::from_config(&config, Arc::new(store));
    info!(
        "Loaded {} commodities, indicator source: {}",
        service.commodities().len(),
        service.indicator_source()
    );

    if let Some(path) = &args.load {
        let count = service
            .load(path)
            .with_context(|| format!("Failed to load models from {:?}", path))?;
        info!("Serving {} models from {:?}", count, path);
    }

    let needs_models = args.save.is_some() || args.predict.is_some() || args.forecast.is_some();
    if args.train || (needs_models && args.load.is_none()) {
        let outcomes = service.train_all();
        if args.json {
            let reports: Vec<_> = outcomes
                .values()
                .filter_map(|o| o.as_ref().ok())
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for (commodity, outcome) in &outcomes {
                match outcome {
                    Ok(TrainOutcome::Trained(r)) => println!(
                        "{:<10} {:<18} R² {:>7.4}  ({} train / {} test rows)",
                        commodity,
                        r.algorithm.name(),
                        r.test_r2,
                        r.train_rows,
                        r.test_rows
                    ),
                    Ok(TrainOutcome::Skipped { rows, required, .. }) => println!(
                        "{:<10} skipped: {} feature rows < {} required",
                        commodity, rows, required
                    ),
                    Err(e) => println!("{:<10} failed: {}", commodity, e),
                }
            }
        }
    }

    if let Some(path) = &args.save {
        let count = service
            .save(path)
            .with_context(|| format!("Failed to save models to {:?}", path))?;
        info!("Saved {} models to {:?}", count, path);
    }

    if let Some(commodity) = &args.predict {
        let prediction = service
            .predict(commodity, args.date)
            .with_context(|| format!("Prediction failed for {}", commodity))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        } else {
            print_prediction(&prediction);
        }
    }

    if let Some(commodity) = &args.forecast {
        let days = args.days.unwrap_or(service.forecast_config().default_days);
        let mode = args.mode.unwrap_or(service.forecast_config().mode);
        let forecast: Vec<PricePrediction> = service
            .forecast_iter(commodity, days, mode, None)?
            .collect::<Result<_, _>>()
            .with_context(|| format!("Forecast failed for {}", commodity))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        } else {
            println!("{}-day {} forecast for {}:", days, mode, commodity);
            forecast.iter().for_each(print_prediction);
        }
    }

    if args.insights {
        let insights = service.insights(None)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&insights)?);
        } else {
            for (commodity, o) in &insights.market_overview {
                let trend = insights.price_trends.get(commodity);
                let season = insights.seasonal_patterns.get(commodity);
                println!(
                    "{:<10} now ₹{:.2}  avg ₹{:.2} ({:+.2}%)  range ₹{:.2}-₹{:.2}  trend {:?}  peak month {}",
                    commodity,
                    o.current_price,
                    o.average_price,
                    o.price_change_percent,
                    o.min_price,
                    o.max_price,
                    trend.map(|t| t.direction),
                    season.map(|s| s.peak_month).unwrap_or_default()
                );
            }
            for r in &insights.recommendations {
                println!("* {}", r);
            }
        }
    }

    Ok(())
}
