use std::fs;
use std::time::SystemTime;

use tracing::{error, info, warn};

use crate::{
    ingestion::{cache::resolve_path, gtfs::load_gtfs, poi::load_pois},
    services::persistence::{load_graph, save_graph},
    structures::{BuildConfig, Config, Graph, Ingestor},
};

pub fn build_graph(config: &BuildConfig) -> Option<Graph> {
    let mut g = Graph::new();

    let mut ordered: Vec<&Ingestor> = config.inputs.iter().collect();
    ordered.sort_by_key(|i| i.phase());

    for input in ordered {
        info!("Loading '{}'...", input.label());
        let before = SystemTime::now();

        let path = match resolve_path(input) {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to resolve '{}': {e}", input.label());
                return None;
            }
        };

        let result = match input {
            Ingestor::GtfsGeneric(_) => load_gtfs(&path, &mut g).map_err(|e| e.to_string()),
            Ingestor::PoiCatalogue(_) => load_pois(&path, &mut g),
        };

        match result {
            Ok(_) => {
                if let Ok(elapsed) = before.elapsed() {
                    info!("Loaded '{}' in {}ms", input.label(), elapsed.as_millis());
                }
            }
            Err(e) => {
                error!("Failed to ingest '{}': {e}", input.label());
                return None;
            }
        }
    }

    let stats = g.stats();
    info!(
        "Graph ready: {} stops, {} scheduled visits, {} routes, {} POIs",
        stats.stops, stats.stop_times, stats.routes, stats.pois
    );

    Some(g)
}

// Restore the cached graph when one exists; fall back to a fresh build and
// cache the result for the next startup.
pub fn restore_or_build(config: &Config) -> Option<Graph> {
    if fs::metadata(&config.build.output).is_ok() {
        match load_graph(&config.build.output) {
            Ok(graph) => return Some(graph),
            Err(e) => warn!("Ignoring graph cache: {e}"),
        }
    }

    let graph = build_graph(&config.build)?;

    if let Err(e) = save_graph(&graph, &config.build.output) {
        warn!("{e}");
    }

    Some(graph)
}
