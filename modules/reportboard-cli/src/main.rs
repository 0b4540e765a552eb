use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reportboard_common::{parse_timestamp, Config, FileConfig, Report};
use reportboard_pipeline::{
    Clock, CriteriaUpdate, Dashboard, FilterCriteria, FixedClock, RecordStore, SystemClock,
};

mod render;
use render::{OutputFormat, StdoutSink};

#[derive(Parser)]
#[command(name = "reportboard", about = "Incident report dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Records snapshot (JSON array). Defaults to the reference dataset.
    #[arg(long)]
    records: Option<PathBuf>,

    /// Case-insensitive search over category, location and id
    #[arg(long)]
    search: Option<String>,

    /// "All" or a category label, e.g. "Verbal Abuse"
    #[arg(long)]
    category: Option<String>,

    /// "All", "Today", "This Week" or "This Month"
    #[arg(long)]
    window: Option<String>,

    /// Evaluate time windows at this local time instead of the real clock
    #[arg(long)]
    now: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the JSON schema of a records snapshot
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    if let Some(Command::Schema) = cli.command {
        let schema = schemars::schema_for!(Vec<Report>);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let env = Config::from_env()?;
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let sources = resolve_sources(&cli, env, &file)?;
    let store = match &sources.records_path {
        Some(path) => RecordStore::load(path)?,
        None => {
            info!("No records snapshot configured, using the reference dataset");
            RecordStore::reference()
        }
    };

    let defaults = &file.defaults;
    let criteria = FilterCriteria::parse(&defaults.search, &defaults.category, &defaults.window)
        .context("Invalid [defaults] in config file")?;
    let update = CriteriaUpdate::parse(
        cli.search.as_deref(),
        cli.category.as_deref(),
        cli.window.as_deref(),
    )?;

    let frozen_now = sources.frozen_now;
    let clock: Arc<dyn Clock> = match frozen_now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };

    info!(
        records = store.len(),
        frozen_now = ?frozen_now,
        "Dashboard starting"
    );

    let mut dashboard = Dashboard::new(store, criteria).with_clock(clock);
    dashboard.add_sink(Arc::new(StdoutSink {
        format: cli.format.into(),
    }));
    dashboard.update(update);

    Ok(())
}

/// Records snapshot and frozen instant after precedence is applied.
#[derive(Debug, PartialEq)]
struct Sources {
    /// `None` means the reference dataset.
    records_path: Option<PathBuf>,
    /// `None` means the system clock.
    frozen_now: Option<NaiveDateTime>,
}

/// Flag > env > config file > built-in. The config file has no clock setting.
fn resolve_sources(cli: &Cli, env: Config, file: &FileConfig) -> Result<Sources> {
    let records_path = cli
        .records
        .clone()
        .or(env.records_path)
        .or_else(|| file.data.records_path.clone());

    let frozen_now = match cli.now.as_deref() {
        Some(raw) => Some(
            parse_timestamp(raw).with_context(|| format!("--now is not a timestamp: {raw:?}"))?,
        ),
        None => env.frozen_now,
    };

    Ok(Sources {
        records_path,
        frozen_now,
    })
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("reportboard=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
