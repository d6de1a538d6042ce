mod render;

use anyhow::{Result, anyhow, bail};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, ValueEnum};
use habitgrid_core::{Config, HttpBackend, SortMode, TrackerService, YearMonth, calendar};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "habitgrid")]
#[command(about = "A monthly habit tracker talking to a ProgressTrack-style backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Month to view, as YYYY-MM (defaults to the current month)
    #[arg(long, global = true)]
    month: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the activity × day completion grid (default)
    Grid,
    /// Per-activity completion statistics
    Stats {
        #[arg(long, value_enum, default_value_t)]
        sort: SortArg,
    },
    /// Whole-month summary (cells, completed, missed, rate)
    Summary,
    /// Completed count per day of the month
    Daily,
    /// Add a new activity
    Add { name: String },
    /// Rename an activity (by id or current name)
    Rename { activity: String, name: String },
    /// Delete an activity
    Remove { activity: String },
    /// Toggle completion of an activity for a date (defaults to today)
    Toggle {
        activity: String,
        date: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum SortArg {
    /// As fetched from the backend
    #[default]
    Fetched,
    /// Highest percentage first
    Percent,
    /// Alphabetical
    Name,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Fetched => SortMode::Fetched,
            SortArg::Percent => SortMode::PercentDesc,
            SortArg::Name => SortMode::NameAsc,
        }
    }
}

/// Accept an activity by exact id, or by case-insensitive unique name.
fn resolve_activity(service: &TrackerService<HttpBackend>, reference: &str) -> Result<String> {
    if let Some(activity) = service.activities().iter().find(|a| a.id == reference) {
        return Ok(activity.id.clone());
    }
    let lowered = reference.to_lowercase();
    let mut matches = service
        .activities()
        .iter()
        .filter(|a| a.name.to_lowercase() == lowered);
    match (matches.next(), matches.next()) {
        (Some(activity), None) => Ok(activity.id.clone()),
        (Some(_), Some(_)) => bail!("'{reference}' names more than one activity; use its id"),
        (None, _) => bail!("no activity matches '{reference}'"),
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();
    let month = match &cli.month {
        Some(raw) => raw.parse::<YearMonth>()?,
        None => YearMonth::current(),
    };

    let config = Config::load(None)?;
    let backend = HttpBackend::new(&config);
    let mut service = TrackerService::connect(backend, month)?;
    if service.skipped_records() > 0 {
        eprintln!(
            "Warning: the backend sent {} malformed record(s); they were skipped.",
            service.skipped_records()
        );
    }

    match cli.command.unwrap_or(Commands::Grid) {
        Commands::Grid => {
            println!("{month}");
            render::render_grid(&service.month_grid());
        }
        Commands::Stats { sort } => {
            render::render_stats(&service.activity_stats(sort.into()));
        }
        Commands::Summary => {
            render::render_summary(month, &service.month_summary());
        }
        Commands::Daily => {
            render::render_daily(&service.daily_counts());
        }
        Commands::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("activity name must not be empty");
            }
            let created = service.add_activity(name)?;
            println!("Activity added: {} (ID: {})", created.name, created.id);
        }
        Commands::Rename { activity, name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("activity name must not be empty");
            }
            let id = resolve_activity(&service, &activity)?;
            let renamed = service.rename_activity(&id, name)?;
            println!("Activity renamed to: {}", renamed.name);
        }
        Commands::Remove { activity } => {
            let id = resolve_activity(&service, &activity)?;
            service.delete_activity(&id)?;
            println!("Activity removed.");
        }
        Commands::Toggle { activity, date } => {
            let date: NaiveDate = match date {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow!("'{raw}' is not a YYYY-MM-DD date"))?,
                None => calendar::today(),
            };
            // Same refusal the coordinator enforces, surfaced before any
            // request is made.
            if calendar::is_future(date) {
                bail!("{date} is in the future; only today or past days can be toggled");
            }
            let id = resolve_activity(&service, &activity)?;
            service.request_toggle(&id, date)?;
            if month.contains(date) {
                let completed = service.month_grid().is_completed(&id, date.day());
                println!(
                    "{} on {date}: {}",
                    activity,
                    if completed { "completed" } else { "not completed" }
                );
            } else {
                println!("{activity} on {date}: toggled");
            }
        }
    }
    Ok(())
}
