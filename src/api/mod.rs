pub mod error;
pub mod reports;
pub mod resources;
pub mod routes;

pub use error::ApiError;
pub use routes::{create_router, AppState};
