// HTTP Server modules
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod sse;

// User record storage
pub mod store;

pub use generator::MessageGenerator;
pub use routes::{configure_routes, AppState};
