//! Course Craft server
//!
//! Entry point for the course outline editor.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use course_craft::config::AppConfig;
use course_craft::{server, telemetry};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before reading configuration
    let _ = dotenv();

    let config = AppConfig::load_from_args(std::env::args())?;

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(config.logging.json);

    server::start_server(config).await
}
