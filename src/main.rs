use std::{env, process, sync::Arc};

use reach_rs::{services::build::restore_or_build, structures::Config, web::app::server};
use tracing::error;

fn main() {
    tracing_subscriber::fmt().init();

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.yml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    // A partially built graph must never serve requests.
    let graph = match restore_or_build(&config) {
        Some(graph) => Arc::new(graph),
        None => {
            error!("Graph build failed, refusing to start");
            process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(server(graph, &config)) {
        error!("Server error: {e}");
        process::exit(1);
    }
}
