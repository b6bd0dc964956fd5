//! acal CLI
//!
//! Command-line interface for the academic calendar store

use acal_core::logging_facility::init;
use acal_engine::EngineContext;
use acal_store::StoreHandle;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

mod commands;
mod render;
mod settings;

use commands::menu::Menu;
use commands::Session;
use settings::{Overrides, Settings};

#[derive(Debug, Parser)]
#[command(name = "acal")]
#[command(about = "Academic calendar - queries and schedule/group changes", long_about = None)]
struct Cli {
    /// TOML config file (default: ./acal.toml when present)
    #[arg(long, global = true, env = "ACAL_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "ACAL_DB")]
    db: Option<PathBuf>,

    /// Reporting term for the popular-course and ranking queries, e.g. 202502
    #[arg(long, global = true, env = "ACAL_TERM")]
    term: Option<String>,

    /// Logging profile: standard, development, production or test
    #[arg(long, global = true, env = "ACAL_LOG_PROFILE")]
    log_profile: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Menu,
    /// Run one catalog query
    Query(commands::query::QueryArgs),
    /// Personal schedule changes and listing
    Schedule(commands::schedule::ScheduleArgs),
    /// Study group changes
    Group(commands::group::GroupArgs),
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            db: self.db.clone(),
            term: self.term.clone(),
            log_profile: self.log_profile.clone(),
        }
    }
}

fn run(cli: Cli) -> acal_core::Result<()> {
    let settings = Settings::load(&cli.overrides())?;
    init(settings.log_profile);
    tracing::debug!(
        db = %settings.store.path.display(),
        reporting_term = settings.catalog.reporting_term.code(),
        "Starting acal"
    );

    let handle = StoreHandle::open(&settings.store)?;
    let mut session = Session::new(handle, EngineContext::new(settings.catalog));
    let stdout = io::stdout();

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => Menu::new(&mut session, io::stdin().lock(), stdout.lock()).run(),
        Commands::Query(args) => commands::query::execute(args, &session, &mut stdout.lock()),
        Commands::Schedule(args) => {
            commands::schedule::execute(args, &mut session, &mut stdout.lock())
        }
        Commands::Group(args) => commands::group::execute(args, &mut session, &mut stdout.lock()),
    };

    let closed = session.handle.close();
    result.and(closed)
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
