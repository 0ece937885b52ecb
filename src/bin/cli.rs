//! csvdb CLI
//!
//! Command-line interface for querying and editing a CSV file through a
//! connection.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use csvdb::codec::encode_rows;
use csvdb::{Config, Connection, Row, WriteStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// csvdb CLI
#[derive(Parser, Debug)]
#[command(name = "csvdb")]
#[command(about = "Query and edit a CSV file as a tiny row store")]
#[command(version)]
struct Args {
    /// Backing CSV file
    #[arg(short, long, default_value = "./db.csv")]
    file: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Write through a temp file and rename it into place
    #[arg(long)]
    atomic: bool,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    /// Print rows as JSON lines instead of CSV
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every row
    Rows,

    /// Print rows whose fields equal all the given values
    Find {
        /// field=value conditions
        #[arg(long = "where", value_parser = parse_pair)]
        conditions: Vec<(String, String)>,
    },

    /// Print whether an identical row exists
    Exists {
        /// field=value pairs of the row
        #[arg(required = true, value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Create a row
    Create {
        /// field=value pairs of the row
        #[arg(required = true, value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },

    /// Replace an existing row
    Update {
        /// field=value pairs of the current row
        #[arg(long = "old", required = true, value_parser = parse_pair)]
        old: Vec<(String, String)>,

        /// field=value pairs of the replacement row
        #[arg(long = "new", required = true, value_parser = parse_pair)]
        new: Vec<(String, String)>,
    },

    /// Update the first row matching the conditions, or create the row
    Upsert {
        /// field=value conditions
        #[arg(long = "where", required = true, value_parser = parse_pair)]
        conditions: Vec<(String, String)>,

        /// field=value pairs of the new row
        #[arg(required = true, value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },
}

fn main() {
    // Initialize tracing/logging (stderr keeps stdout clean for rows)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,csvdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> csvdb::Result<()> {
    let delimiter = u8::try_from(args.delimiter).map_err(|_| {
        csvdb::CsvDbError::Config(format!("delimiter {:?} is not ASCII", args.delimiter))
    })?;

    let write_strategy = if args.atomic {
        WriteStrategy::AtomicRename
    } else {
        WriteStrategy::Overwrite
    };

    let config = Config::builder()
        .path(&args.file)
        .delimiter(delimiter)
        .write_strategy(write_strategy)
        .sync_on_write(args.sync)
        .build()?;

    let db = Connection::open(config)?;
    tracing::debug!("csvdb v{} on {}", csvdb::VERSION, db.path().display());

    match args.command {
        Commands::Rows => print_rows(&db.rows(), delimiter, args.json)?,
        Commands::Find { conditions } => {
            let rows = db.find(|row| matches_all(row, &conditions));
            print_rows(&rows, delimiter, args.json)?;
        }
        Commands::Exists { fields } => {
            let row: Row = fields.into_iter().collect();
            println!("{}", db.exists(&row));
        }
        Commands::Create { fields } => {
            db.create(fields.into_iter().collect())?;
            tracing::info!("Created row in {}", db.path().display());
        }
        Commands::Update { old, new } => {
            let old: Row = old.into_iter().collect();
            db.update(&old, new.into_iter().collect())?;
            tracing::info!("Updated row in {}", db.path().display());
        }
        Commands::Upsert { conditions, fields } => {
            db.create_or_update(|row| matches_all(row, &conditions), fields.into_iter().collect())?;
            tracing::info!("Upserted row in {}", db.path().display());
        }
    }

    Ok(())
}

/// Parse a `field=value` argument
fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got {:?}", s)),
    }
}

/// True if every condition holds for the row
fn matches_all(row: &Row, conditions: &[(String, String)]) -> bool {
    conditions
        .iter()
        .all(|(field, value)| row.get(field) == Some(value.as_str()))
}

fn print_rows(rows: &[Row], delimiter: u8, json: bool) -> csvdb::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        for row in rows {
            let line = serde_json::to_string(row)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(out, "{}", line)?;
        }
    } else {
        out.write_all(&encode_rows(rows, delimiter)?)?;
    }

    out.flush()?;
    Ok(())
}
