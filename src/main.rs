use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::debug;

use family_schedule::{
    export, parse_date, upcoming, CalendarFilter, DateRange, EngineConfig, EventType,
    FamilySnapshot, SchemaValidator, ScheduleEngine,
};

/// Custody resolution and unified family schedule over a snapshot file
#[derive(Parser, Debug)]
#[command(name = "family-schedule")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Family snapshot (JSON)
    #[arg(short, long, global = true, default_value = "snapshot.json")]
    snapshot: PathBuf,

    /// Engine configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Family id (defaults to the snapshot's own)
    #[arg(long, global = true)]
    family: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Responsible party for every day in a range
    Custody {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// The Sunday..Saturday week containing a date
    Week {
        #[arg(long)]
        date: String,
    },
    /// Events, activities and custody merged for a range
    Calendar {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Keep items for these children (repeatable)
        #[arg(long = "child")]
        children: Vec<String>,
        /// Keep only events of these types (repeatable)
        #[arg(long = "type")]
        event_types: Vec<String>,
        /// Keep only holiday and vacation events
        #[arg(long)]
        days_off: bool,
        /// Only the next N items on/after --from
        #[arg(long)]
        upcoming: Option<usize>,
    },
    /// Tasks a child owes on a date
    Tasks {
        #[arg(long)]
        child: String,
        #[arg(long)]
        date: String,
        /// Show completion progress instead of the task list
        #[arg(long)]
        progress: bool,
    },
    /// Weekly points leaderboard for the week containing a date
    Scores {
        #[arg(long)]
        date: String,
        /// Rank only these children (repeatable; default: every assigned child)
        #[arg(long = "child")]
        children: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let snapshot = FamilySnapshot::from_file(&cli.snapshot)?;
    let family_id = snapshot
        .resolve_family_id(cli.family.as_deref())
        .ok_or_else(|| anyhow!("No family id: pass --family or set family_id in the snapshot"))?;
    let family = snapshot.for_family(&family_id);
    family.validate(&SchemaValidator::new());

    debug!(family_id = %family_id, "snapshot scoped to family");

    let engine = ScheduleEngine::new(config);

    match cli.command {
        Command::Custody { from, to } => {
            let range = parse_range(&from, &to)?;
            cmd_custody(&engine, &family, range, cli.format)
        }
        Command::Week { date } => cmd_week(&engine, &family, parse_day(&date)?, cli.format),
        Command::Calendar { from, to, children, event_types, days_off, upcoming } => {
            let range = parse_range(&from, &to)?;
            let filter = CalendarFilter {
                child_ids: children,
                event_types: event_types.into_iter().map(EventType::from).collect(),
                days_off_only: days_off,
            };
            cmd_calendar(&engine, &family, range, &filter, upcoming, cli.format)
        }
        Command::Tasks { child, date, progress } => {
            cmd_tasks(&engine, &family, &child, parse_day(&date)?, progress, cli.format)
        }
        Command::Scores { date, children } => {
            cmd_scores(&engine, &family, parse_day(&date)?, &children, cli.format)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn parse_day(value: &str) -> Result<NaiveDate> {
    parse_date(value).with_context(|| format!("Bad --date value: {}", value))
}

fn parse_range(from: &str, to: &str) -> Result<DateRange> {
    DateRange::parse(from, to).with_context(|| format!("Bad range: {}..{}", from, to))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// COMMANDS
// ============================================================================

fn cmd_custody(
    engine: &ScheduleEngine,
    family: &FamilySnapshot,
    range: DateRange,
    format: OutputFormat,
) -> Result<()> {
    let map = engine.custody_map(family, range)?;

    match format {
        OutputFormat::Json => print_json(&map)?,
        OutputFormat::Csv => export::write_custody_csv(&map, io::stdout())?,
        OutputFormat::Table => {
            println!("👪 Custody {} → {}", range.from, range.to);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for (date, party) in &map {
                println!("{}  {:<9}  {}", date, family_schedule::weekday_key(*date), party);
            }
            let unresolved = range.len_days() - map.len();
            if unresolved > 0 {
                println!("\n⚠️  {} day(s) without a responsible party", unresolved);
            }
        }
    }

    Ok(())
}

fn cmd_week(
    engine: &ScheduleEngine,
    family: &FamilySnapshot,
    date: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let days = engine.week_view(family, date)?;

    match format {
        OutputFormat::Json => print_json(&days)?,
        OutputFormat::Csv => export::write_week_csv(&days, io::stdout())?,
        OutputFormat::Table => {
            println!("📅 Week of {}", family_schedule::dates::week_start(date));
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for day in &days {
                println!(
                    "{}  {:<9}  {}  {}{}",
                    day.date,
                    day.weekday,
                    day.bucket.map(|b| b.as_str()).unwrap_or("-"),
                    day.party.as_deref().unwrap_or("-"),
                    if day.overridden { "  (override)" } else { "" }
                );
                if let Some(reason) = &day.reason {
                    println!("             ↳ {}", reason);
                }
            }
        }
    }

    Ok(())
}

fn cmd_calendar(
    engine: &ScheduleEngine,
    family: &FamilySnapshot,
    range: DateRange,
    filter: &CalendarFilter,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut items = engine.calendar(family, range, filter)?;
    if let Some(limit) = limit {
        items = upcoming(&items, range.from, limit).into_iter().cloned().collect();
    }

    match format {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Csv => export::write_calendar_csv(&items, io::stdout())?,
        OutputFormat::Table => {
            println!("🗓️  Calendar {} → {} ({} items)", range.from, range.to, items.len());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for item in &items {
                println!(
                    "{}  {:<5}  {:<8}  {}{}",
                    item.date,
                    item.start_time.as_deref().unwrap_or(""),
                    item.kind.as_str(),
                    item.title,
                    if item.is_day_off() { "  🏖️" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn cmd_tasks(
    engine: &ScheduleEngine,
    family: &FamilySnapshot,
    child_id: &str,
    date: NaiveDate,
    progress: bool,
    format: OutputFormat,
) -> Result<()> {
    if progress {
        let report = engine.task_progress(family, child_id, date)?;
        match format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Csv => export::write_progress_csv(&report, io::stdout())?,
            OutputFormat::Table => {
                println!("{}", report.summary());
                for id in &report.pending {
                    println!("  ⏳ {}", id);
                }
            }
        }
        return Ok(());
    }

    let due = engine.due_tasks(family, child_id, date)?;

    match format {
        OutputFormat::Json => print_json(&due)?,
        OutputFormat::Csv => export::write_tasks_csv(&due, io::stdout())?,
        OutputFormat::Table => {
            println!("✅ Tasks for {} on {} ({})", child_id, date, due.len());
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for task in &due {
                println!(
                    "{:<16}  {:<16}  {}",
                    task.id,
                    task.category.as_str(),
                    task.title.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

fn cmd_scores(
    engine: &ScheduleEngine,
    family: &FamilySnapshot,
    date: NaiveDate,
    children: &[String],
    format: OutputFormat,
) -> Result<()> {
    let scores = engine.weekly_scores(family, date, children);

    match format {
        OutputFormat::Json => print_json(&scores)?,
        OutputFormat::Csv => export::write_scores_csv(&scores, io::stdout())?,
        OutputFormat::Table => {
            println!("🏆 Weekly scores, week of {}", family_schedule::dates::week_start(date));
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for (i, score) in scores.iter().enumerate() {
                println!(
                    "{}. {:<16}  ⭐ {:<5}  {} completed",
                    i + 1,
                    score.child_id,
                    score.points,
                    score.completed_count
                );
            }
        }
    }

    Ok(())
}
