//! stk-import - Bulk Import CLI
//!
//! Operator-driven entry point for the import reconciliation engine. Reads
//! a CSV file whose headers are the usual display names ("Site ID", "CPU
//! Vendor", ...), runs the importer for the chosen entity, and prints the
//! batch summary as JSON. Duplicates are never applied on the first pass;
//! confirm them and feed them back through `apply-duplicates`.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stk_import::importers::asset::AssetImporter;
use stk_import::importers::employee::EmployeeImporter;
use stk_import::importers::site::SiteImporter;
use stk_import::{apply_duplicates, run_import, DuplicateRow, ImportRow};

#[derive(Parser)]
#[command(name = "stk-import", about = "Bulk import for the Stocktake inventory suite")]
struct Cli {
    /// Data directory (falls back to STOCKTAKE_DATA, the config file, then
    /// the OS default)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import rows from a CSV file; duplicates are withheld for confirmation
    Import {
        entity: Entity,
        /// CSV file with display-name headers
        #[arg(long)]
        file: PathBuf,
    },
    /// Overwrite previously confirmed duplicates
    ApplyDuplicates {
        entity: Entity,
        /// JSON file holding the confirmed `duplicados` entries
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Asset,
    Site,
    Employee,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = stk_common::config::resolve_data_dir(cli.data_dir.as_deref(), "STOCKTAKE_DATA")?;
    let db_path = stk_common::config::ensure_data_dir(&data_dir)?;
    info!("Database: {}", db_path.display());

    let pool = stk_common::db::init::init_database(&db_path).await?;

    match cli.command {
        Command::Import { entity, file } => {
            let rows = read_rows(&file)?;
            info!(rows = rows.len(), file = %file.display(), "Read input file");

            let summary = match entity {
                Entity::Asset => {
                    let importer = AssetImporter::load(pool.clone()).await?;
                    run_import(&importer, &rows).await?
                }
                Entity::Site => run_import(&SiteImporter::new(pool.clone()), &rows).await?,
                Entity::Employee => run_import(&EmployeeImporter::new(pool.clone()), &rows).await?,
            };

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::ApplyDuplicates { entity, file } => {
            let items: Vec<DuplicateRow> = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            info!(items = items.len(), file = %file.display(), "Read confirmed duplicates");

            let summary = match entity {
                Entity::Asset => {
                    let importer = AssetImporter::load(pool.clone()).await?;
                    apply_duplicates(&importer, &items).await?
                }
                Entity::Site => apply_duplicates(&SiteImporter::new(pool.clone()), &items).await?,
                Entity::Employee => {
                    apply_duplicates(&EmployeeImporter::new(pool.clone()), &items).await?
                }
            };

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Read the CSV into import rows. Numeric-looking cells become JSON numbers
/// so spreadsheet date serials survive the trip; empty cells are absent.
fn read_rows(path: &Path) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| anyhow::anyhow!("failed to parse CSV row {}: {}", index + 1, e))?;

        let mut row = ImportRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            row.insert(header.to_string(), cell_value(cell));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn cell_value(cell: &str) -> Value {
    if let Ok(whole) = cell.parse::<i64>() {
        return Value::from(whole);
    }
    if let Ok(fraction) = cell.parse::<f64>() {
        return Value::from(fraction);
    }
    Value::String(cell.to_string())
}
