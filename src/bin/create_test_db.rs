use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use cashbook::{DEFAULT_SEED, DEFAULT_SEED_COUNT, initialize_db, seed_transactions};

/// A utility for creating a test database filled with random transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of transactions to create.
    #[arg(long, short, default_value_t = DEFAULT_SEED_COUNT)]
    count: usize,

    /// The random seed, the same seed always creates the same transactions.
    #[arg(long, short, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(filter::LevelFilter::INFO),
        )
        .init();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    tracing::info!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    tracing::info!("Creating {} transactions...", args.count);
    seed_transactions(args.count, args.seed, OffsetDateTime::now_utc(), &conn)?;

    tracing::info!("Success!");

    Ok(())
}
