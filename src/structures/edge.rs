use serde::{Deserialize, Serialize};

use crate::structures::StopId;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TripId(pub u32);

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteId(pub u32);

// One scheduled hop between consecutive visits of the same trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitEdge {
    pub destination: StopId,
    pub minutes: f64,
    pub trip_id: TripId,
    pub route_id: Option<RouteId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInfo {
    pub route_short_name: String,
    pub route_long_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripInfo {
    pub route_id: RouteId,
}
