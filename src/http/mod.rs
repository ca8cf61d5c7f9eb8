pub mod error;
mod handlers;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::app;
pub use types::AppState;
