use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use priority_queue::PriorityQueue;

use crate::engine::{attach::attach_pois, scoring::compute_score};
use crate::structures::{
    CategoryCount, ComparisonEntry, Graph, IsochroneSnapshot, LatLng, NearbyStop, OriginPoint,
    ReachedStop, SnapshotMetadata, StopId, walking_minutes,
};

static BOARDING_CANDIDATES: usize = 8;
static NEARBY_LISTING_COUNT: usize = 5;
static MAX_WALK_MINUTES: f64 = 18.0;
static DEFAULT_MAX_MINUTES: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Minutes(f64);

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone)]
pub struct IsochroneQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub max_minutes: Option<f64>,
    pub categories: Option<Vec<String>>,
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct CompareOrigin {
    pub label: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// Minimum reachable minutes per stop, every entry within the budget.
// Non-finite origin coordinates fail every admission test, so the result
// is an empty map rather than an error.
pub fn bounded_reachability(g: &Graph, origin: LatLng, max_minutes: f64) -> HashMap<StopId, f64> {
    let mut seen = HashMap::<StopId, f64>::new();
    let mut frontier = PriorityQueue::<StopId, Reverse<Minutes>>::new();

    for (distance_km, stop_id) in
        g.nearest_stops(origin.latitude, origin.longitude, BOARDING_CANDIDATES)
    {
        let walk = walking_minutes(distance_km);
        if walk <= MAX_WALK_MINUTES && walk <= max_minutes {
            seen.insert(stop_id, walk);
            frontier.push(stop_id, Reverse(Minutes(walk)));
        }
    }

    let mut visited = HashSet::<StopId>::new();

    while let Some((id, Reverse(Minutes(minutes)))) = frontier.pop() {
        if minutes > max_minutes {
            break;
        }
        visited.insert(id);

        for edge in g.outgoing(id) {
            if visited.contains(&edge.destination) {
                continue;
            }

            let candidate = minutes + edge.minutes;
            if candidate > max_minutes {
                continue;
            }

            let improves = match seen.get(&edge.destination) {
                Some(best) => candidate < *best,
                None => true,
            };
            if !improves {
                continue;
            }

            seen.insert(edge.destination, candidate);
            match frontier.get_priority(&edge.destination) {
                Some(_) => {
                    frontier.change_priority(&edge.destination, Reverse(Minutes(candidate)));
                }
                None => {
                    frontier.push(edge.destination, Reverse(Minutes(candidate)));
                }
            }
        }
    }

    seen
}

pub fn compute_isochrone(g: &Graph, query: &IsochroneQuery) -> IsochroneSnapshot {
    let origin = LatLng {
        latitude: query.latitude,
        longitude: query.longitude,
    };
    let limit = effective_budget(query.max_minutes);

    let filter = match &query.categories {
        Some(categories) if !categories.is_empty() => {
            Some(categories.iter().cloned().collect::<HashSet<String>>())
        }
        _ => None,
    };

    let mut reached: Vec<(StopId, f64)> = bounded_reachability(g, origin, limit)
        .into_iter()
        .collect();
    // minutes ascending, stop index as tie-break so repeated runs are identical
    reached.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let nearest_stops = g
        .nearest_stops(origin.latitude, origin.longitude, NEARBY_LISTING_COUNT)
        .into_iter()
        .filter_map(|(distance_km, id)| {
            let stop = g.get_stop(id)?;
            Some(NearbyStop {
                stop_id: stop.stop_id.clone(),
                stop_name: stop.name.clone(),
                latitude: stop.loc.latitude,
                longitude: stop.loc.longitude,
                distance_km,
            })
        })
        .collect();

    let reachable_stops: Vec<ReachedStop> = reached
        .iter()
        .filter_map(|&(id, minutes)| {
            let stop = g.get_stop(id)?;
            Some(ReachedStop {
                stop_id: stop.stop_id.clone(),
                stop_name: stop.name.clone(),
                latitude: stop.loc.latitude,
                longitude: stop.loc.longitude,
                minutes,
            })
        })
        .collect();

    let (accessible_pois, counts) = attach_pois(g, origin, &reached, filter.as_ref(), limit);
    let score = compute_score(&counts, &query.weights);

    let counts_by_category = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();

    IsochroneSnapshot {
        origin: OriginPoint {
            latitude: origin.latitude,
            longitude: origin.longitude,
        },
        max_minutes: limit,
        nearest_stops,
        metadata: SnapshotMetadata {
            reached_stop_count: reachable_stops.len(),
            poi_count: accessible_pois.len(),
        },
        reachable_stops,
        accessible_pois,
        counts_by_category,
        score,
    }
}

pub fn compare(
    g: &Graph,
    origins: &[CompareOrigin],
    max_minutes: Option<f64>,
    categories: Option<&Vec<String>>,
    weights: &BTreeMap<String, f64>,
) -> Vec<ComparisonEntry> {
    origins
        .iter()
        .map(|origin| {
            let query = IsochroneQuery {
                latitude: origin.latitude,
                longitude: origin.longitude,
                max_minutes,
                categories: categories.cloned(),
                weights: weights.clone(),
            };
            ComparisonEntry {
                label: origin
                    .label
                    .clone()
                    .unwrap_or_else(|| "Untitled pin".to_string()),
                snapshot: compute_isochrone(g, &query),
            }
        })
        .collect()
}

// A missing, zero or non-finite budget falls back to the default.
fn effective_budget(max_minutes: Option<f64>) -> f64 {
    match max_minutes {
        Some(minutes) if minutes.is_finite() && minutes != 0.0 => minutes,
        _ => DEFAULT_MAX_MINUTES,
    }
}
