mod collection;
mod store;

pub use collection::Collection;
pub use collection::Listing;
pub use collection::SortReport;
pub use collection::aggregate_prices;
pub use collection::matches;
pub use collection::sort_records_by_genre;
pub use store::JsonFileStore;
pub use store::RecordStore;
pub use store::StoreError;
