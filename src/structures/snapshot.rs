use async_graphql::SimpleObject;

#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct OriginPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct NearbyStop {
    pub stop_id: String,
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ReachedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub minutes: f64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct AccessiblePoi {
    pub poi_id: u32,
    pub name: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub minutes: f64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CategoryWeight {
    pub category: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct SnapshotMetadata {
    pub reached_stop_count: usize,
    pub poi_count: usize,
}

#[derive(Debug, Clone, Copy, SimpleObject)]
pub struct DatasetStats {
    pub stops: usize,
    pub stop_times: usize,
    pub routes: usize,
    pub pois: usize,
}

// One isochrone computation, fully owned by the caller once returned.
#[derive(Debug, Clone, SimpleObject)]
pub struct IsochroneSnapshot {
    pub origin: OriginPoint,
    pub max_minutes: f64,
    pub nearest_stops: Vec<NearbyStop>,
    pub reachable_stops: Vec<ReachedStop>,
    pub accessible_pois: Vec<AccessiblePoi>,
    pub counts_by_category: Vec<CategoryCount>,
    pub score: f64,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ComparisonEntry {
    pub label: String,
    pub snapshot: IsochroneSnapshot,
}
