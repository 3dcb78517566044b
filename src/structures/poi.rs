use serde::{Deserialize, Serialize};

use crate::structures::LatLng;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    pub poi_id: u32,
    pub name: String,
    pub category: String,
    pub loc: LatLng,
}
