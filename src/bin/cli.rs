//! FlatStore CLI
//!
//! Command-line interface for a local FlatStore file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flatstore::{Config, InsertOutcome, Record, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// FlatStore CLI
#[derive(Parser, Debug)]
#[command(name = "flatstore-cli")]
#[command(about = "CLI for the FlatStore record store")]
#[command(version)]
struct Args {
    /// Backing store file
    #[arg(short, long, global = true, default_value = Config::STORE_FILENAME)]
    store: PathBuf,

    /// Backup file
    #[arg(short, long, global = true, default_value = Config::BACKUP_FILENAME)]
    backup: PathBuf,

    /// CSV export file
    #[arg(short, long, global = true, default_value = Config::EXPORT_FILENAME)]
    export: PathBuf,

    /// Capacity of a newly created store
    #[arg(short, long, global = true, default_value_t = Config::DEFAULT_CAPACITY)]
    capacity: u32,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a new record
    Insert {
        id: i32,
        title: String,
        price: f64,
        quantity: i32,
    },

    /// Look up a record by id
    Get { id: i32 },

    /// Find records by exact title
    FindTitle { title: String },

    /// Find records by price
    FindPrice { price: f64 },

    /// Find records by quantity
    FindQuantity { quantity: i32 },

    /// Delete a record by id
    Delete { id: i32 },

    /// Delete every record with this title
    DeleteTitle { title: String },

    /// Delete every record with this price
    DeletePrice { price: f64 },

    /// Delete every record with this quantity
    DeleteQuantity { quantity: i32 },

    /// Replace title, price and quantity of a record
    Update {
        id: i32,
        title: String,
        price: f64,
        quantity: i32,
    },

    /// List every live record
    List,

    /// Discard all records
    Clear,

    /// Copy the store file to the backup file
    Backup,

    /// Copy the backup file over the store file
    Restore,

    /// Write all live records to the CSV export file
    Export,

    /// Remove the store file
    #[command(name = "drop")]
    DropStore,

    /// Show capacity and live count
    Stats,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .store_path(&args.store)
        .backup_path(&args.backup)
        .export_path(&args.export)
        .initial_capacity(args.capacity)
        .build();

    let mut store = match Store::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(&mut store, args.command, args.json) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Execute one command; `Ok(false)` means the operation was refused
fn run(store: &mut Store, command: Commands, json: bool) -> flatstore::Result<bool> {
    match command {
        Commands::Insert {
            id,
            title,
            price,
            quantity,
        } => {
            let outcome = store.insert(id, &title, price, quantity)?;
            match outcome {
                InsertOutcome::Inserted => println!("OK"),
                InsertOutcome::InvalidKey => println!("Id must be > 0"),
                InsertOutcome::DuplicateKey => println!("Duplicate ID"),
            }
            Ok(outcome.is_inserted())
        }
        Commands::Get { id } => {
            let lookup = store.find_by_id(id)?;
            match &lookup.record {
                Some(record) => print_records(std::slice::from_ref(record), json),
                None => println!("ID not found"),
            }
            println!("probes: {}", lookup.probes);
            Ok(lookup.is_found())
        }
        Commands::FindTitle { title } => {
            print_records(&store.find_by_title(&title)?, json);
            Ok(true)
        }
        Commands::FindPrice { price } => {
            print_records(&store.find_by_price(price)?, json);
            Ok(true)
        }
        Commands::FindQuantity { quantity } => {
            print_records(&store.find_by_quantity(quantity)?, json);
            Ok(true)
        }
        Commands::Delete { id } => {
            let deleted = store.delete_by_id(id)?;
            println!("{}", if deleted { "Deleted" } else { "ID not found" });
            Ok(deleted)
        }
        Commands::DeleteTitle { title } => {
            println!("{}", store.delete_by_title(&title)?);
            Ok(true)
        }
        Commands::DeletePrice { price } => {
            println!("{}", store.delete_by_price(price)?);
            Ok(true)
        }
        Commands::DeleteQuantity { quantity } => {
            println!("{}", store.delete_by_quantity(quantity)?);
            Ok(true)
        }
        Commands::Update {
            id,
            title,
            price,
            quantity,
        } => {
            let updated = store.update(id, &title, price, quantity)?;
            println!("{}", if updated { "Updated" } else { "ID not found" });
            Ok(updated)
        }
        Commands::List => {
            print_records(&store.get_all()?, json);
            Ok(true)
        }
        Commands::Clear => {
            store.clear()?;
            println!("Database cleared");
            Ok(true)
        }
        Commands::Backup => Ok(store.backup()),
        Commands::Restore => {
            store.restore()?;
            println!("Restored from backup");
            Ok(true)
        }
        Commands::Export => {
            let rows = store.export_csv()?;
            println!("Exported {} rows to {}", rows, store.config().export_path.display());
            Ok(true)
        }
        Commands::DropStore => {
            store.drop_store()?;
            println!("Dropped");
            Ok(true)
        }
        Commands::Stats => {
            let header = store.header();
            println!("capacity: {}", header.capacity);
            println!("count: {}", header.count);
            Ok(true)
        }
    }
}

fn print_records(records: &[Record], json: bool) {
    if json {
        match serde_json::to_string_pretty(records) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!("Failed to encode records: {}", e),
        }
        return;
    }

    for record in records {
        println!("{}", record);
    }
}
