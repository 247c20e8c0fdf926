use clap::Parser;
use std::io;
use std::time::Duration;

use proxy_server::logging::init_logging;
use proxy_server::{run_server, DEFAULT_REQUEST_TIMEOUT_SECS};

#[derive(Parser, Debug, Clone)]
#[command(name = "proxy-server")]
#[command(about = "ErdTree chat proxy")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Upper bound for one upstream exchange, streamed body included
    #[arg(long, env = "PROXY_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.log_level.is_some() {
        // If RUST_LOG is set, use it
        env_logger::init();
    } else {
        init_logging(cli.debug);
    }

    log::info!("Starting ErdTree proxy on port {}", cli.port);

    if cli.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  Port: {}", cli.port);
        log::debug!("  Request timeout: {}s", cli.request_timeout_secs);
    }

    run_server(cli.port, Duration::from_secs(cli.request_timeout_secs)).await
}
