//! CLI entry point for the `compendium` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use compendium_index::cli::commands;
use compendium_index::{resolve_config, CompendiumError, EntryType, Query};

#[derive(Parser)]
#[command(
    name = "compendium",
    about = "Compendium search: index and query spells, feats, items and rules"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to a TOML config file (overrides COMPENDIUM_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-kind counts and index size for a dataset
    Info {
        /// Path to the dataset JSON file
        file: PathBuf,
    },
    /// Search a dataset
    Search {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Query text (empty lists everything)
        #[arg(default_value = "")]
        query: String,
        /// Comma-separated entry types: spell, feat, item, rule
        #[arg(long = "type")]
        types: Option<String>,
        /// Maximum results to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show one entry by id, e.g. spell:fireball
    Get {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Entry id
        id: String,
    },
    /// Print the rows a list viewport would render for a query
    Window {
        /// Path to the dataset JSON file
        file: PathBuf,
        /// Query text
        #[arg(default_value = "")]
        query: String,
        /// Comma-separated entry types
        #[arg(long = "type")]
        types: Option<String>,
        /// Scroll offset in pixels
        #[arg(long, default_value = "0")]
        scroll_top: f64,
        /// Viewport height in pixels
        #[arg(long, default_value = "800")]
        height: f64,
    },
    /// Speak the worker protocol as JSON lines on stdin/stdout
    Serve {
        /// Dataset to hydrate before reading requests
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn parse_query(text: String, types: Option<String>) -> Result<Query, CompendiumError> {
    let mut parsed = Vec::new();
    for name in types
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let t = EntryType::from_name(name)
            .ok_or_else(|| CompendiumError::InvalidEntryType(name.to_string()))?;
        parsed.push(t);
    }
    Ok(Query::new(text).with_types(parsed))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    log::debug!("Using config {:?}", config);

    let result = match cli.command {
        Commands::Info { file } => commands::cmd_info(&file, json),
        Commands::Search {
            file,
            query,
            types,
            limit,
        } => match parse_query(query, types) {
            Ok(query) => commands::cmd_search(&file, query, limit, &config, json).await,
            Err(e) => Err(e),
        },
        Commands::Get { file, id } => commands::cmd_get(&file, &id, json),
        Commands::Window {
            file,
            query,
            types,
            scroll_top,
            height,
        } => match parse_query(query, types) {
            Ok(query) => {
                commands::cmd_window(&file, query, scroll_top, height, &config, json).await
            }
            Err(e) => Err(e),
        },
        Commands::Serve { dataset } => commands::cmd_serve(dataset.as_deref(), &config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            CompendiumError::Io(_) => 1,
            CompendiumError::Json(_) | CompendiumError::Config(_) => 2,
            CompendiumError::InvalidEntryType(_) => 3,
            CompendiumError::EntryNotFound(_) => 4,
            CompendiumError::WorkerUnavailable => 5,
        };
        process::exit(code);
    }
}
