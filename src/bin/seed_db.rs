use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{DEFAULT_SEED_URL, fetch_seed_data, initialize_db, insert_transactions};

/// A utility for creating a database populated with the product transaction dataset.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The URL of the JSON dataset to load.
    #[arg(long, env = "SEED_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,
}

/// Download the dataset and insert it into the database.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let db_path = Path::new(&args.db_path);

    match db_path.extension() {
        None => {
            eprintln!("Database path must include a file extension (e.g., 'sales.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Database path must include a file extension (e.g., 'sales.db').");
            exit(1);
        }
        _ => {}
    }

    println!("Opening database at {db_path:#?}");
    let conn = Connection::open(db_path)?;

    initialize_db(&conn)?;

    println!("Fetching transactions from {}...", args.seed_url);
    let transactions = fetch_seed_data(&reqwest::Client::new(), &args.seed_url).await?;

    let count = insert_transactions(&transactions, &conn)?;

    println!("Inserted {count} transactions. Success!");

    Ok(())
}
