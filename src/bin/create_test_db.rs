use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use peniato::{
    DEFAULT_ADMIN_EMAIL, PasswordHash, get_local_today, initialize_db, seed_default_data,
    seed_sample_data,
};

/// A utility for creating a test database for the Peniato API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The canonical name of the timezone used to date the sample transactions.
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
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

    let Some(today) = get_local_today(&args.timezone) else {
        eprintln!("Unknown timezone {:?}.", args.timezone);
        exit(1);
    };

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating default roles and users...");
    seed_default_data(&conn, PasswordHash::DEFAULT_COST)?;

    println!("Creating sample accounts, categories, incomes and expenses...");
    seed_sample_data(&conn, today)?;

    println!("Success! Log in as {DEFAULT_ADMIN_EMAIL} with the password \"admin\".");

    Ok(())
}
