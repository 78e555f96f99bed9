//! tmg-export CLI - export a TMG project to databases and flat files.

use std::path::PathBuf;
use std::process::ExitCode;

use async_trait::async_trait;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tmg_export::{
    run_export, CsvExport, DatabaseTarget, ExportError, JsonExport, PostgresConnection, Project,
    Rowset, RowSource, SqlDialect, SqliteConnection, TableDescription, TableExport, XmlExport,
};

#[derive(Parser)]
#[command(name = "tmg-export")]
#[command(about = "Export a TMG project to relational databases and flat files")]
#[command(version)]
struct Cli {
    /// TMG project file to read data from (*.pjc)
    #[arg(short = 't', long = "tmg")]
    tmg: PathBuf,

    /// SQLite database file to be created (*.sqlite3)
    #[arg(short = 'l', long)]
    sqlite: Option<PathBuf>,

    /// PostgreSQL connection string (host=... user=... dbname=...)
    #[arg(short = 'p', long)]
    postgres: Option<String>,

    /// Dump tables to csv
    #[arg(short = 'c', long)]
    csv: bool,

    /// Dump tables to json
    #[arg(short = 'j', long)]
    json: bool,

    /// Dump tables to xml
    #[arg(short = 'x', long)]
    xml: bool,

    /// Directory for flat-file dumps
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

/// Placeholder for the relational row source, which requires a legacy
/// provider this platform does not ship. Never reached while only the
/// settings table is exported.
struct UnavailableRowSource;

#[async_trait]
impl RowSource for UnavailableRowSource {
    async fn fetch_rows(&self, table: &TableDescription) -> tmg_export::Result<Rowset> {
        Err(ExportError::config(format!(
            "No legacy source driver is available to read table {}",
            table.output_table_name
        )))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> tmg_export::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_new(&cli.verbosity).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(ref sqlite_db) = cli.sqlite {
        if sqlite_db.exists() {
            return Err(ExportError::config(format!(
                "Database already exists: {}",
                sqlite_db.display()
            )));
        }
    }

    let mut targets = Vec::new();
    if let Some(ref sqlite_db) = cli.sqlite {
        targets.push(DatabaseTarget::new(
            SqliteConnection::new(sqlite_db),
            SqlDialect::sqlite(),
        ));
    }
    if let Some(ref connection_string) = cli.postgres {
        targets.push(DatabaseTarget::new(
            PostgresConnection::new(connection_string),
            SqlDialect::postgres(),
        ));
    }

    let mut exports: Vec<Box<dyn TableExport>> = Vec::new();
    if cli.csv {
        exports.push(Box::new(CsvExport::new(&cli.output_dir)));
    }
    if cli.json {
        exports.push(Box::new(JsonExport::new(&cli.output_dir)));
    }
    if cli.xml {
        exports.push(Box::new(XmlExport::new(&cli.output_dir)));
    }

    if targets.is_empty() && exports.is_empty() {
        return Err(ExportError::config(
            "Please specify a valid output format using -c, -j, -l, -p, or -x",
        ));
    }

    let project = Project::new(&cli.tmg)?;
    info!("Started export of {}", project.project_file().display());

    // Reading the relational tables needs the platform's legacy provider,
    // which has no counterpart here; embedders plug their own SourceSchema
    // and RowSource through the library. The project-settings table is
    // fully self-contained, so the binary exports that end to end.
    warn!(
        "No legacy source driver is available; exporting the ProjectSettings table only. \
         Use the library interfaces to attach a relational source."
    );
    let tables = vec![project.registry().project_settings()];

    let settings_rows = project.settings_row_source();
    run_export(
        project.registry(),
        &tables,
        &UnavailableRowSource,
        &settings_rows,
        &mut targets,
        &exports,
    )
    .await?;

    info!("Finished export");
    Ok(())
}
