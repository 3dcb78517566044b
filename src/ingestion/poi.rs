use std::fs;

use serde::Deserialize;
use tracing::{info, warn};

use crate::structures::{Graph, LatLng, Poi};

#[derive(Debug, Deserialize)]
pub struct PoiCatalogue {
    pub categories: Vec<String>,
    pub pois: Vec<PoiRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PoiRecord {
    pub poi_id: u32,
    pub name: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn parse_catalogue(content: &str) -> Result<PoiCatalogue, String> {
    serde_yml::from_str(content).map_err(|e| format!("Failed to parse POI catalogue: {e}"))
}

pub fn load_pois(path: &str, g: &mut Graph) -> Result<(), String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read POI catalogue: {e}"))?;
    let catalogue = parse_catalogue(&content)?;

    let count_unknown_category = catalogue
        .pois
        .iter()
        .filter(|record| !catalogue.categories.contains(&record.category))
        .count();
    if count_unknown_category > 0 {
        warn!(
            "{} POIs with a category outside the enumeration",
            count_unknown_category
        );
    }

    let n_pois = catalogue.pois.len();

    g.add_poi_categories(catalogue.categories);
    g.add_pois(
        catalogue
            .pois
            .into_iter()
            .map(|record| Poi {
                poi_id: record.poi_id,
                name: record.name,
                category: record.category,
                loc: LatLng {
                    latitude: record.latitude,
                    longitude: record.longitude,
                },
            })
            .collect(),
    );

    info!("{} POIs parsed", n_pois);

    Ok(())
}
