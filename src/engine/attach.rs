use std::collections::{BTreeMap, HashSet};

use crate::structures::{AccessiblePoi, Graph, LatLng, StopId, walking_minutes};

// Last-mile attachment: best time to each POI is the direct walk from the
// origin or a walk from any reached stop on top of that stop's minutes.
// The direct walk is the initial best with no zero-as-unset sentinel, so a
// POI at the exact origin keeps its 0.0 minutes.
pub fn attach_pois(
    g: &Graph,
    origin: LatLng,
    reached: &[(StopId, f64)],
    filter: Option<&HashSet<String>>,
    max_minutes: f64,
) -> (Vec<AccessiblePoi>, BTreeMap<String, u32>) {
    let mut accessible = Vec::<AccessiblePoi>::new();
    let mut counts = BTreeMap::<String, u32>::new();

    for poi in g.pois() {
        if let Some(filter) = filter {
            if !filter.contains(&poi.category) {
                continue;
            }
        }

        let mut best = walking_minutes(origin.distance_km(poi.loc));

        for &(stop_id, minutes) in reached {
            let stop = match g.get_stop(stop_id) {
                Some(stop) => stop,
                None => continue,
            };
            let total = minutes + walking_minutes(stop.loc.distance_km(poi.loc));
            if total < best {
                best = total;
            }
        }

        if best <= max_minutes {
            accessible.push(AccessiblePoi {
                poi_id: poi.poi_id,
                name: poi.name.clone(),
                category: poi.category.clone(),
                latitude: poi.loc.latitude,
                longitude: poi.loc.longitude,
                minutes: round_tenth(best),
            });
            *counts.entry(poi.category.clone()).or_insert(0) += 1;
        }
    }

    accessible.sort_by(|a, b| a.minutes.total_cmp(&b.minutes));

    (accessible, counts)
}

fn round_tenth(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}
