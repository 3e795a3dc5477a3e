use std::sync::Arc;

use ayah_of_the_day::config::{load_config, print_schema};
use ayah_of_the_day::startup;
use ayah_of_the_day::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--print-schema") {
        if let Err(e) = print_schema() {
            eprintln!("Failed to render configuration schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
