pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use error::AppError;
pub use server::{app_config, run_server, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CHAT_BODY_BYTES};
pub use state::AppState;
