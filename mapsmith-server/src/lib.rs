//! HTTP surface for the mapsmith pipeline.
//!
//! The server owns everything the core library treats as an external
//! collaborator: PDF text extraction, request routing, per-upload content
//! retention, and the mapping from pipeline failures to structured HTTP
//! error responses.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod uploads;

pub use error::ApiError;
pub use state::AppState;
pub use uploads::UploadStore;
