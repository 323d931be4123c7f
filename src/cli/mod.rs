//! # CLI Module
//!
//! User-facing commands over the collection. Each command prints its result
//! and returns an [`Outcome`] describing what happened, so the interactive
//! session, the one-shot subcommands and the tests all drive the same code.
//!
//! ## Command Categories
//!
//! ### Collection
//!
//! - [`list`] - whole collection plus price totals per condition
//! - [`find`] - case-insensitive search over key, title, country, year,
//!   labels, genres and styles
//! - [`sort`] - rewrite the collection ordered by first genre
//! - [`delete`] - remove one record (confirmation happens in the caller)
//!
//! ### Enrichment
//!
//! - [`update`] - fetch tracklists for every stored release
//! - [`cache`] - download cover images for every stored release
//!
//! ## Error Handling
//!
//! Read failures are reported as warnings and end the command. A failed write
//! of the collection ends the program, since the state of the file is unknown
//! afterwards.

mod collection;
mod enrich;
pub mod render;

pub use collection::delete;
pub use collection::find;
pub use collection::list;
pub use collection::sort;
pub use enrich::cache;
pub use enrich::update;

pub(crate) use collection::fatal_write;
pub(crate) use collection::store_failed;

/// What a command or dialog ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do, e.g. an empty input line.
    Idle,
    Listed(usize),
    Matched(usize),
    Sorted {
        records: usize,
        distinct_genres: usize,
    },
    Deleted(String),
    /// No record with this key is stored.
    Missing(String),
    Enriched {
        updated: usize,
        skipped: usize,
        failed: usize,
    },
    Saved(String),
    AlreadyStored(String),
    /// The user answered no, or input ended mid-dialog.
    Declined,
    Failed(String),
}
