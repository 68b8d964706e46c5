//! # CLI Layer
//!
//! The CLI is one client of the shelves library. It is the only place that
//! knows about the terminal: it parses arguments, wires up logging, builds
//! the [`ShelvesApi`] over a [`CsvStore`], and turns each `CmdResult` into
//! terminal output.
//!
//! ## Locations
//!
//! - Config directory: `$SHELVES_CONFIG_DIR`, else the platform config dir.
//! - Data directory, first match wins: `--data-dir`, `init --path`,
//!   `$SHELVES_DATA_DIR`, the `data-dir` config key, the platform data dir.

use super::prompt::TerminalPrompter;
use super::render::{books_table, config_lines, print_messages, readings_table};
use super::setup::{Cli, Commands, FilterArgs};
use clap::Parser;
use directories::ProjectDirs;
use shelves::api::{ConfigAction, ShelvesApi, ShelvesPaths, ViewFilter};
use shelves::config::ShelvesConfig;
use shelves::error::{Result, ShelvesError};
use shelves::model::Table;
use shelves::store::fs::CsvStore;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const CONFIG_DIR_ENV: &str = "SHELVES_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "SHELVES_DATA_DIR";

struct AppContext {
    api: ShelvesApi<CsvStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.verbose);

    let init_path = match &cli.command {
        Commands::Init { path, .. } => path.clone(),
        _ => None,
    };
    let mut ctx = init_context(&cli, init_path.as_deref())?;

    match cli.command {
        Commands::Init { path, force } => handle_init(&mut ctx, path, force),
        Commands::Manage { table } => handle_manage(&mut ctx, table),
        Commands::View { table, filter } => handle_view(&ctx, table, filter),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Doctor => handle_doctor(&mut ctx),
    }
}

/// Logs go to stderr so they never mix with tables on stdout. `RUST_LOG`
/// wins over `--verbose`.
fn initialize_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "shelves").ok_or_else(|| {
        ShelvesError::Config("Could not determine a home directory".to_string())
    })
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn resolve_config_dir() -> Result<PathBuf> {
    match env_path(CONFIG_DIR_ENV) {
        Some(dir) => Ok(dir),
        None => Ok(project_dirs()?.config_dir().to_path_buf()),
    }
}

/// Picks the first data directory that is set, falling back to `default`.
fn resolve_data_dir(
    flag: Option<&Path>,
    init_path: Option<&Path>,
    env: Option<PathBuf>,
    config: &ShelvesConfig,
    default: impl FnOnce() -> Result<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag.or(init_path) {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env.or_else(|| config.data_dir.clone()) {
        return Ok(dir);
    }
    default()
}

fn init_context(cli: &Cli, init_path: Option<&Path>) -> Result<AppContext> {
    let config_dir = resolve_config_dir()?;
    let config = ShelvesConfig::load(&config_dir)?;
    let data_dir = resolve_data_dir(
        cli.data_dir.as_deref(),
        init_path,
        env_path(DATA_DIR_ENV),
        &config,
        || Ok(project_dirs()?.data_dir().to_path_buf()),
    )?;
    debug!(config_dir = %config_dir.display(), data_dir = %data_dir.display(), "resolved directories");

    let store = CsvStore::new(&data_dir);
    let paths = ShelvesPaths::new(config_dir, data_dir);
    Ok(AppContext {
        api: ShelvesApi::new(store, paths),
    })
}

fn handle_init(ctx: &mut AppContext, path: Option<PathBuf>, force: bool) -> Result<()> {
    let result = match path {
        Some(dir) => ctx.api.init_at(&dir, force)?,
        None => ctx.api.init(force)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_manage(ctx: &mut AppContext, table: Table) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
    let result = ctx.api.manage(table, &mut prompter)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, table: Table, args: FilterArgs) -> Result<()> {
    let filter = ViewFilter::from(args);
    let result = ctx.api.view(table, &filter)?;
    if !result.books.is_empty() {
        println!("{}", books_table(&result.books));
    }
    if !result.readings.is_empty() {
        println!("{}", readings_table(&result.readings, filter.title.as_deref()));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for line in config_lines(config) {
                println!("{}", line);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}
