use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;
use std::time::Duration;

use crate::handlers;
use crate::state::AppState;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Upper bound for a `/api/chat` body. A whole conversation context travels
/// in one request, so actix's 256 KiB default is far too small.
pub const MAX_CHAT_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_CHAT_BODY_BYTES))
        .route("/api/chat", web::post().to(handlers::chat::handler))
        .route("/health", web::get().to(handlers::health::handler));
}

pub async fn run_server(port: u16, request_timeout: Duration) -> io::Result<()> {
    let state = AppState::new(request_timeout)
        .map(web::Data::new)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!(
        "Chat proxy listening on 0.0.0.0:{} (upstream timeout {}s)",
        port,
        request_timeout.as_secs()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
