use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

use crate::calendar::ClockSnapshot;
use crate::config::{ConfigLoader, CONFIG_ENV};

pub mod commands;

use self::commands::{DaysArgs, StatusArgs, ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "studycal",
    version,
    about = "Inspect study records and todos the way the calendar sees them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over STUDYCAL_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Pin "now" to an RFC 3339 instant instead of reading the system clock
    #[arg(long, global = true)]
    pub now: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print items grouped by day, most recent first
    Days(DaysArgs),
    /// Print the calendar markers of a month
    Status(StatusArgs),
    /// Check a todo's start/due dates and times
    Validate(ValidateArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let config = loader.load_or_init()?;
    let zone = config.resolve_zone();
    let clock = match &cli.now {
        Some(raw) => {
            let now = OffsetDateTime::parse(raw, &Rfc3339)
                .with_context(|| format!("parsing --now {raw}"))?;
            ClockSnapshot::at(now, zone)
        }
        None => ClockSnapshot::capture(zone),
    };
    tracing::debug!(today = %clock.today(), offset = %zone.offset(), "calendar clock");

    match cli.command {
        Commands::Days(args) => commands::print_days(&config, &clock, args),
        Commands::Status(args) => commands::print_status(&config, &clock, args),
        Commands::Validate(args) => commands::validate_schedule(&config, args),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
