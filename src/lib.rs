//! Vinyl Collection Cataloging Library
//!
//! This library provides functionality for cataloging a personal vinyl record
//! collection. Barcodes or free-text titles are looked up in the Discogs
//! database, accepted releases are stored in a local JSON collection file, and
//! the stored collection can be searched, sorted, priced and enriched later.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the inbound barcode listener
//! - `cli` - Table rendering shared by the session and one-shot commands
//! - `config` - Configuration management and environment variables
//! - `discogs` - Discogs API client behind the `MusicSource` trait
//! - `enrichment` - Bulk tracklist and cover image enrichment jobs
//! - `gate` - Rate limiter guarding every outbound request
//! - `lookup` - Release lookup composing search, detail and price calls
//! - `management` - The collection store and its persistence backend
//! - `server` - Local HTTP server accepting scanned barcodes
//! - `session` - Interactive prompt and command dispatch
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use vinylcli::{config, management::Collection};
//!
//! #[tokio::main]
//! async fn main() -> vinylcli::Res<()> {
//!     config::load_env().await?;
//!     let collection = Collection::open(config::collection_path());
//!     let listing = collection.list_all().await?;
//!     println!("{} records", listing.records.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod discogs;
pub mod enrichment;
pub mod gate;
pub mod lookup;
pub mod management;
pub mod server;
pub mod session;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary edge where errors of different modules meet. Library
/// modules return their own typed errors which convert into this boxed form
/// through `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Looking up {}...", query);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Record {} saved", key);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for unrecoverable conditions such as a failed write of the
/// collection file, where the persisted state is no longer known.
///
/// # Example
///
/// ```
/// error!("Cannot write collection. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a failed lookup, a skipped record during
/// enrichment, an unreadable collection file.
///
/// # Example
///
/// ```
/// warning!("Collection file is unreadable, treating it as empty");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
