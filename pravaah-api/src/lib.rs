pub mod client;
pub mod error;
pub mod model;

pub use client::{DEFAULT_BASE_URL, StationClient};
pub use error::ApiError;
pub use model::{StationRecord, Vertex};
