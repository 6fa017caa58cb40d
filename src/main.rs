//! CLI entry point for termbook
//!
//! Serves the web site, and offers glossary maintenance commands that work
//! on the same file without starting the server.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use termbook::core::{add_term, delete_term};
use termbook::settings::{ServeSettings, StoreSettings, API_KEY_ENV, DEFAULT_GLOSSARY_PATH};
use termbook::store::{TermStore, DEFAULT_MAX_BACKUPS};
use termbook::web::{router, AppState};

#[derive(Parser)]
#[command(name = "termbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info", env = "TERMBOOK_LOG")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Path to the glossary file
    #[arg(short, long, global = true, default_value = DEFAULT_GLOSSARY_PATH, env = "TERMBOOK_GLOSSARY")]
    glossary: PathBuf,

    /// Backups kept after each write (0 disables backups)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BACKUPS, env = "TERMBOOK_BACKUPS")]
    backups: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web site
    Serve(ServeArgs),

    /// List glossary entries
    List {
        /// Only show entries whose term or definition contains this text
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Check the glossary file for malformed lines
    Check,

    /// Add a term
    Add { term: String, definition: String },

    /// Delete a term
    Delete { term: String },

    /// List glossary backups, newest first
    Backups,

    /// Restore the glossary from a backup ("latest" or a path)
    Restore { backup: String },
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "TERMBOOK_HOST")]
    host: String,

    /// HTTP port
    #[arg(long, default_value = "5000", env = "TERMBOOK_PORT")]
    port: u16,

    /// Directory served under /assets
    #[arg(long, default_value = "static/assets", env = "TERMBOOK_ASSETS")]
    assets_dir: PathBuf,

    /// Team roster (JSON array); the built-in roster is used otherwise
    #[arg(long, env = "TERMBOOK_TEAM_FILE")]
    team_file: Option<PathBuf>,

    /// Gemini model name
    #[arg(long, default_value = termbook::ai::gemini::DEFAULT_MODEL, env = "TERMBOOK_MODEL")]
    model: String,

    /// Gemini API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let store_settings = StoreSettings {
        glossary_path: cli.store.glossary,
        max_backups: cli.store.backups,
    };

    match cli.command {
        Commands::Serve(args) => {
            let settings = ServeSettings {
                store: store_settings,
                host: args.host,
                port: args.port,
                assets_dir: Some(args.assets_dir),
                team_file: args.team_file,
                model: args.model,
                api_key: args.api_key,
            };
            serve(settings)?
        }
        Commands::List { query } => list_terms(&store_settings.open_store()?, query.as_deref())?,
        Commands::Check => check_glossary(&store_settings.open_store()?)?,
        Commands::Add { term, definition } => {
            let store = store_settings.open_store()?;
            match store.modify(|terms| add_term(terms, &term, &definition))? {
                Ok(outcome) => println!("{} {}", "✓".green(), outcome),
                Err(rejected) => {
                    println!("{} {}", "✗".red().bold(), rejected);
                    std::process::exit(1);
                }
            }
        }
        Commands::Delete { term } => {
            let store = store_settings.open_store()?;
            match store.modify(|terms| delete_term(terms, &term))? {
                Ok(outcome) => println!("{} {}", "✓".green(), outcome),
                Err(rejected) => {
                    println!("{} {}", "✗".red().bold(), rejected);
                    std::process::exit(1);
                }
            }
        }
        Commands::Backups => list_backups(&store_settings.open_store()?)?,
        Commands::Restore { backup } => restore(&store_settings.open_store()?, &backup)?,
    }

    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Start the HTTP server and block until Ctrl-C
fn serve(settings: ServeSettings) -> anyhow::Result<()> {
    let store = settings.store.open_store()?;
    let report = store
        .try_load()
        .with_context(|| format!("Failed to read glossary {}", store.path().display()))?;
    info!(
        path = %store.path().display(),
        entries = report.terms.len(),
        skipped = report.malformed.len(),
        "glossary ready"
    );

    let state = Arc::new(AppState {
        store: Arc::new(store),
        ai: settings.ai_service(),
        team: settings.team()?,
    });
    let assets_dir = settings.assets_dir()?;
    let app = router(state, assets_dir.as_deref());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let addr = settings.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("termbook listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// List all glossary entries
fn list_terms(store: &TermStore, query: Option<&str>) -> anyhow::Result<()> {
    let report = store.try_load()?;
    let shown = report.terms.search(query.unwrap_or(""));

    println!("{}", format!("Glossary: {}\n", store.path().display()).bold());

    for term in &shown {
        println!("{} → {}", term.term.cyan().bold(), term.definition);
    }

    println!("\n{} Total: {} of {} terms", "✓".green(), shown.len(), report.terms.len());

    Ok(())
}

/// Report malformed lines; exits non-zero if any are found
fn check_glossary(store: &TermStore) -> anyhow::Result<()> {
    println!("{} Parsing glossary: {}", "→".cyan(), store.path().display());

    let report = store.try_load()?;
    println!("{} Found {} terms\n", "✓".green(), report.terms.len());

    if report.malformed.is_empty() {
        println!("{} {}", "✓".green().bold(), "No malformed lines!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} malformed line{}:\n",
        "✗".red().bold(),
        report.malformed.len(),
        if report.malformed.len() == 1 { "" } else { "s" }
    );
    for line in &report.malformed {
        println!(
            "  {} {} {}",
            format!("line {}", line.line).yellow(),
            line.content,
            format!("({})", line.reason).dimmed()
        );
    }
    println!("\n{}", "⚠ These lines are skipped and will be dropped on the next save!".yellow());
    std::process::exit(1);
}

fn list_backups(store: &TermStore) -> anyhow::Result<()> {
    if !store.backups_enabled() {
        println!("{}", "Backups are disabled (--backups 0)".yellow());
    }

    let backups = store.list_backups()?;
    if backups.is_empty() {
        println!("No backups in {}", store.backup_dir().display());
        return Ok(());
    }

    for (i, backup) in backups.iter().enumerate() {
        println!("{} {}", format!("{}.", i + 1).dimmed(), backup.display());
    }
    println!("\n{} {} backup(s)", "✓".green(), backups.len());

    Ok(())
}

fn restore(store: &TermStore, backup: &str) -> anyhow::Result<()> {
    let path = if backup == "latest" {
        store
            .list_backups()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No backups in {}", store.backup_dir().display()))?
    } else {
        termbook::settings::expand_path(std::path::Path::new(backup))?
    };

    store
        .restore_backup(&path)
        .with_context(|| format!("Failed to restore {}", path.display()))?;
    println!("{} Restored {} from {}", "✓".green(), store.path().display(), path.display());

    Ok(())
}
