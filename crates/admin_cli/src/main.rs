use std::{
    collections::BTreeSet,
    error::Error,
    io::Write,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
};
use engine::{BillingEvent, Money, format_timestamp, insert_billing_events, read_billing_csv};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "commitments_admin")]
#[command(about = "Admin utilities for the commitments billing store")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./billing.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the billing schema.
    InitDb(InitDbArgs),
    /// Load billing events from a CSV export.
    LoadBilling(LoadBillingArgs),
}

#[derive(Args, Debug)]
struct InitDbArgs {
    /// Print the schema SQL without connecting.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct LoadBillingArgs {
    #[arg(long, default_value = "aws_billing_data.csv")]
    csv_path: PathBuf,
    /// Delete every existing billing event first.
    #[arg(long)]
    truncate: bool,
    /// Skip the confirmation asked before truncating.
    #[arg(long, short = 'y')]
    yes: bool,
    /// Parse and report without writing.
    #[arg(long)]
    dry_run: bool,
    /// Load at most this many rows.
    #[arg(long)]
    limit: Option<usize>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Asks a yes/no question on stderr. Anything but `y` is a no.
fn confirm(prompt: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(out, Print(prompt), Print(" [y/N] "))?;
    out.flush()?;

    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        let answer = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            _ => false,
        };
        execute!(out, Print(if answer { "y" } else { "n" }), Print("\r\n"))?;
        out.flush()?;
        return Ok(answer);
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn load_csv(
    path: &Path,
    limit: Option<usize>,
) -> Result<Vec<BillingEvent>, Box<dyn Error + Send + Sync>> {
    let file = std::fs::File::open(path)
        .map_err(|err| format!("cannot open {}: {err}", path.display()))?;
    Ok(read_billing_csv(std::io::BufReader::new(file), limit)?)
}

fn print_report(events: &[BillingEvent]) {
    let companies: BTreeSet<&str> = events.iter().map(|e| e.company.as_str()).collect();
    let total: Money = events.iter().map(|e| e.gross_cost).sum();

    println!("rows: {}", events.len());
    println!("companies: {}", companies.len());
    println!("total gross cost: {total}");
    if let (Some(first), Some(last)) = (
        events.iter().map(|e| e.event_time).min(),
        events.iter().map(|e| e.event_time).max(),
    ) {
        println!(
            "period: {} .. {}",
            format_timestamp(first),
            format_timestamp(last)
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::InitDb(args) => {
            if args.dry_run {
                for statement in migration::schema_sql() {
                    println!("{statement};");
                }
                return Ok(());
            }

            connect_db(&cli.database_url).await?;
            println!("billing schema is up to date");
        }
        Command::LoadBilling(args) => {
            let events = load_csv(&args.csv_path, args.limit)?;
            print_report(&events);

            if args.dry_run {
                println!("dry run, nothing written");
                return Ok(());
            }

            if args.truncate
                && !args.yes
                && !confirm("Delete every existing billing event before loading?")?
            {
                return Err("aborted, existing billing events were kept".into());
            }

            let db = connect_db(&cli.database_url).await?;
            let inserted = insert_billing_events(&db, &events, args.truncate).await?;
            println!("loaded {inserted} billing event(s)");
        }
    }

    Ok(())
}
