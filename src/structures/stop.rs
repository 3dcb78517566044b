use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::structures::LatLng;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopData {
    pub stop_id: String,
    pub name: String,
    pub loc: LatLng,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopId(pub usize);

impl Display for StopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
