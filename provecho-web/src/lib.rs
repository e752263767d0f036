pub mod routes;

pub use routes::{AppState, app};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
