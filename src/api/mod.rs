//! # API Module
//!
//! HTTP endpoints of the barcode listener. A scanner app or any other device
//! on the network can post a barcode and have the matching release added to
//! the collection.
//!
//! ## Endpoints
//!
//! - [`barcode`] - `POST /` with the raw barcode as body. Looks the barcode up
//!   and saves a new match. Other methods on `/` get [`invalid_method`].
//! - [`health`] - `GET /health`, application status, version and the number
//!   of stored records.
//!
//! ## Usage Example
//!
//! ```bash
//! curl -X POST --data '5099902894225' http://127.0.0.1:8080/
//! ```

mod barcode;
mod health;

pub use barcode::barcode;
pub use barcode::invalid_method;
pub use health::health;
