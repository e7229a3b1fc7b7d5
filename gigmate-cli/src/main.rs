use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use gigmate_core::{
    generate_synthetic_training_data, BufferedCollector, DemandLevel, EventCollector, ImportMethod,
    LocalEvent, LogSink, Platform, WeatherCondition, WeatherSnapshot,
};
use gigmate_ingest::{
    import_batch, mock_inbox, read_sms_csv, summarize, total_amount, EarningRecord, SmsExtractor,
    SmsMessage,
};
use std::path::PathBuf;

mod config;
mod predict;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "gigmate",
    version,
    about = "Demand hotspots and earnings tracking for gig workers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank demand zones for the next hour
    Predict {
        /// City (defaults to config engine.city)
        #[arg(long)]
        city: Option<String>,

        /// Sunny, Rainy, Cloudy (random mock weather if omitted)
        #[arg(long)]
        weather: Option<String>,

        /// Temperature in °C
        #[arg(long, default_value_t = 27.0)]
        temp: f64,

        /// Local event name
        #[arg(long, requires = "event_demand")]
        event: Option<String>,

        /// Where the event happens
        #[arg(long, default_value = "")]
        event_location: String,

        /// Event start, local time (e.g. 19:30)
        #[arg(long, default_value = "")]
        event_start: String,

        /// Low, Medium, High, Extreme
        #[arg(long, requires = "event")]
        event_demand: Option<String>,

        /// Use the demo IPL match event
        #[arg(long, conflicts_with = "event")]
        mock_event: bool,

        /// Limit number of zones printed (default: all)
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Payout SMS commands
    Sms {
        #[command(subcommand)]
        command: SmsCommand,
    },

    /// Earnings store commands
    Earnings {
        #[command(subcommand)]
        command: EarningsCommand,
    },

    /// Write synthetic demand history as CSV
    Synth {
        #[arg(long, default_value_t = 1000)]
        count: usize,

        #[arg(long, default_value = "training_data.csv")]
        out: PathBuf,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SmsCommand {
    /// Parse a single message body
    Parse {
        #[arg(long)]
        body: String,

        /// ISO-8601 timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Import an SMS export (CSV: sender,body,timestamp) into the earnings store
    Import {
        #[arg(long, required_unless_present = "mock")]
        csv: Option<PathBuf>,

        /// Import the built-in demo inbox instead
        #[arg(long, conflicts_with = "csv")]
        mock: bool,

        /// Parse and report without saving
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
enum EarningsCommand {
    /// Per-platform totals
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Record a shift by hand
    Add {
        #[arg(long)]
        platform: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        orders: u32,

        #[arg(long, default_value_t = 0.0)]
        hours: f64,

        /// YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.gigmate/config.toml with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let analytics = BufferedCollector::with_threshold(LogSink, cfg.analytics.flush_threshold);

    let result = run(cli.command, &cfg, &analytics).await;
    analytics.flush();
    result
}

async fn run(
    command: Command,
    cfg: &config::Config,
    analytics: &impl EventCollector,
) -> Result<()> {
    match command {
        Command::Predict {
            city,
            weather,
            temp,
            event,
            event_location,
            event_start,
            event_demand,
            mock_event,
            limit,
            json,
        } => {
            let city = city.unwrap_or_else(|| cfg.engine.city.clone());
            let weather = match weather {
                Some(w) => WeatherSnapshot::new(temp, w.parse::<WeatherCondition>()?),
                None => predict::mock_weather(),
            };
            let event = match (event, event_demand) {
                (Some(name), Some(level)) => Some(LocalEvent::new(
                    name,
                    event_location,
                    event_start,
                    level.parse::<DemandLevel>()?,
                )),
                _ if mock_event => Some(predict::mock_event()),
                _ => None,
            };

            analytics.log_event("predict_requested", &[("city", city.as_str())]);
            log::info!("running demand model for {city}");

            let mut hotspots =
                predict::run_prediction(cfg, &city, &weather, event.as_ref()).await?;
            if let Some(n) = limit {
                hotspots.truncate(n);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&hotspots)?);
            } else {
                predict::print_hotspots(&city, &weather, event.as_ref(), &hotspots);
            }
        }

        Command::Sms { command } => match command {
            SmsCommand::Parse { body, timestamp } => {
                let extractor = SmsExtractor::new()?;
                let sms = SmsMessage::new(
                    "cli",
                    body,
                    timestamp.unwrap_or_else(|| Utc::now().to_rfc3339()),
                );
                match extractor.extract(&sms) {
                    Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                    None => println!("No payout template matched."),
                }
            }

            SmsCommand::Import { csv, mock, dry_run } => {
                let messages = if mock {
                    mock_inbox(Utc::now())
                } else {
                    let path = csv.context("pass --csv <file> or --mock")?;
                    if !path.exists() {
                        bail!("CSV not found: {}", path.display());
                    }
                    read_sms_csv(&path)?
                };

                let extractor = SmsExtractor::new()?;
                let report = import_batch(&extractor, &messages);

                for r in &report.records {
                    println!(
                        "[{}] {} | ₹{:.2} | {} {}",
                        r.date,
                        r.platform,
                        r.amount,
                        r.order_count,
                        r.platform.unit_label()
                    );
                }

                let imported = report.imported().to_string();
                analytics.log_event("sms_imported", &[("count", imported.as_str())]);

                if dry_run {
                    println!(
                        "\nDry run: {} entries parsed, {} messages skipped.",
                        report.imported(),
                        report.skipped
                    );
                    return Ok(());
                }

                let path = state::earnings_path()?;
                let mut store = state::read_earnings(&path)?;
                store.append("sms", report.records);
                state::write_earnings(&path, &store)?;

                println!(
                    "\nSync complete! {} entries imported from SMS ({} skipped).",
                    imported, report.skipped
                );
            }
        },

        Command::Earnings { command } => match command {
            EarningsCommand::Summary { json } => {
                let store = state::read_earnings(&state::earnings_path()?)?;
                let records = store.records();
                let totals = summarize(&records);

                if json {
                    println!("{}", serde_json::to_string_pretty(&totals)?);
                    return Ok(());
                }

                println!("# Earnings ({} entries)\n", records.len());
                for t in &totals {
                    let rate = t
                        .earnings_per_hour()
                        .map(|r| format!("₹{r:.0}/h"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<8} ₹{:>10.2} | {:>4} {} | entries={} | {}",
                        t.platform.as_str(),
                        t.amount,
                        t.orders,
                        t.platform.unit_label(),
                        t.entries,
                        rate
                    );
                }
                println!("\nTotal: ₹{:.2}", total_amount(&records));
            }

            EarningsCommand::Add {
                platform,
                amount,
                orders,
                hours,
                date,
            } => {
                if amount < 0.0 || hours < 0.0 {
                    bail!("amount and hours must be non-negative");
                }
                let date = match date {
                    Some(d) => chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .with_context(|| format!("invalid date '{d}'"))?,
                    None => Local::now().date_naive(),
                };
                let record = EarningRecord {
                    platform: platform.parse::<Platform>()?,
                    amount,
                    order_count: orders,
                    date,
                    source_method: ImportMethod::Manual,
                    duration_hours: hours,
                };

                let path = state::earnings_path()?;
                let mut store = state::read_earnings(&path)?;
                let ids = store.append("manual", vec![record]);
                state::write_earnings(&path, &store)?;

                analytics.log_event("earning_added", &[("platform", platform.as_str())]);
                println!("Added {}", ids.join(", "));
            }
        },

        Command::Synth { count, out } => {
            let data = generate_synthetic_training_data(count, Utc::now(), &mut rand::thread_rng());

            let mut wtr = csv::Writer::from_path(&out)
                .with_context(|| format!("create {}", out.display()))?;
            for point in &data {
                wtr.serialize(point)?;
            }
            wtr.flush()?;

            println!("Wrote {} synthetic points to {}", data.len(), out.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}
