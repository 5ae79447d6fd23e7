pub mod aggregate;
pub mod auth;
pub mod db;
pub mod errors;
pub mod live;
pub mod models;
pub mod search;
pub mod state;
pub mod store;

pub use errors::{AppError, Status, StatusKind};
pub use state::AppState;
