use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use melodeon::{
    config, spawn_rebuild, MatchMode, MediaField, MediaRecord, MediaStore, SqliteMediaStore,
    StoreError,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "melodeon", about = "Media catalog for the Melodeon player")]
struct CliArgs {
    /// Path to the catalog database file. Defaults to the per-user location.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan media directories and rebuild the catalog from what they hold.
    Scan {
        #[clap(required = true, value_parser = parse_path)]
        dirs: Vec<PathBuf>,
    },
    /// List every catalogued item in track order.
    List {
        #[clap(long)]
        json: bool,
    },
    /// List the distinct values of one field (albums, artists, ...).
    Fields { field: MediaField },
    /// Search one field for a term.
    Search {
        field: MediaField,
        mode: MatchMode,
        term: String,
        /// Maximum number of results; everything matching when omitted.
        #[clap(long)]
        limit: Option<usize>,
        #[clap(long)]
        json: bool,
    },
    /// Show the catalog entry for one file path.
    Show { path: String },
}

fn print_records(records: &[MediaRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    for record in records {
        let performer = if !record.band.is_empty() {
            &record.band
        } else {
            &record.artist
        };
        println!(
            "{:>3}. {} - {} [{}] ({})",
            record.track_number, record.title, performer, record.album, record.path
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    // One-time cleanup of incompatible old store files, before the current
    // store is ever opened.
    config::remove_legacy_stores();

    let db_path = match cli_args.db {
        Some(path) => path,
        None => config::store_path()?,
    };

    info!("Opening media catalog at {:?}...", db_path);
    let store = SqliteMediaStore::open(&db_path).context("Failed to open the media catalog")?;

    match cli_args.command {
        Command::Scan { dirs } => {
            let store: Arc<dyn MediaStore> = Arc::new(store);
            let outcome = spawn_rebuild(store, dirs)
                .await
                .context("Catalog rebuild worker vanished")?;
            println!(
                "{} files discovered, {} records written",
                outcome.discovered, outcome.written
            );
        }
        Command::List { json } => {
            let records = store.all_media()?;
            print_records(&records, json)?;
        }
        Command::Fields { field } => {
            let values = match store.distinct_values(field) {
                Ok(values) => values,
                Err(StoreError::EmptyResult) => Vec::new(),
                Err(e) => return Err(e).context("Field enumeration failed"),
            };
            for value in values {
                println!("{}", value);
            }
        }
        Command::Search {
            field,
            mode,
            term,
            limit,
            json,
        } => {
            let records = match store.search(field, mode, &term, limit) {
                Ok(records) => records,
                Err(StoreError::EmptyResult) => Vec::new(),
                Err(e) => return Err(e).context("Search failed"),
            };
            print_records(&records, json)?;
        }
        Command::Show { path } => match store.get_by_path(&path)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("not catalogued: {}", path),
        },
    }

    Ok(())
}
