use std::collections::HashMap;

use tracing::{info, warn};

use crate::{
    ingestion::gtfs::IdMapper,
    structures::{
        Graph, LatLng, RouteId, RouteInfo, ScheduledVisit, StopData, StopId, TripId, TripInfo,
    },
};

pub fn load_gtfs(gtfs_path: &str, g: &mut Graph) -> Result<(), gtfs_structures::Error> {
    let gtfs = gtfs_structures::Gtfs::new(gtfs_path)?;

    let mut stop_mapper = HashMap::<String, StopId>::new();

    let mut count_stop_no_latlng = 0;
    let mut count_stop_no_name = 0;

    let n_stops = gtfs.stops.len();

    for (stop_id, raw) in gtfs.stops {
        let loc = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lng)) => LatLng {
                latitude: lat,
                longitude: lng,
            },
            _ => {
                count_stop_no_latlng += 1;
                continue;
            }
        };

        let name = match &raw.name {
            Some(name) => name.clone(),
            _ => {
                count_stop_no_name += 1;
                continue;
            }
        };

        let id = g.add_stop(StopData {
            stop_id: stop_id.clone(),
            name,
            loc,
        });
        stop_mapper.insert(stop_id, id);
    }

    info!("{} stops parsed", n_stops);
    if count_stop_no_latlng > 0 {
        warn!("{} stops without geo data", count_stop_no_latlng);
    }
    if count_stop_no_name > 0 {
        warn!("{} stops without name", count_stop_no_name);
    }

    let mut route_mapper = IdMapper::new();
    let mut route_infos: Vec<RouteInfo> = Vec::new();
    let routes_offset = g.route_count();

    for (_, route) in gtfs.routes {
        let route_idx = route_mapper.get_or_insert(&route.id);

        while route_infos.len() <= route_idx {
            route_infos.push(RouteInfo {
                route_short_name: String::new(),
                route_long_name: String::new(),
            });
        }

        route_infos[route_idx] = RouteInfo {
            route_short_name: route.short_name.unwrap_or("??".to_string()),
            route_long_name: route.long_name.unwrap_or("Unknown".to_string()),
        };
    }

    let mut trip_mapper = IdMapper::new();
    let mut trip_infos: Vec<TripInfo> = Vec::new();
    let trips_offset = g.trip_count();

    let mut visits: Vec<ScheduledVisit> = Vec::new();
    let mut count_visit_no_times = 0;

    for (_, trip) in gtfs.trips {
        let trip_idx = trip_mapper.get_or_insert(&trip.id);

        let route_id = match route_mapper.get(&trip.route_id) {
            Some(idx) => RouteId((idx + routes_offset) as u32),
            None => continue,
        };

        while trip_infos.len() <= trip_idx {
            trip_infos.push(TripInfo {
                route_id: RouteId(0),
            });
        }
        trip_infos[trip_idx] = TripInfo { route_id };

        for st in &trip.stop_times {
            let stop = match stop_mapper.get(&st.stop.id) {
                Some(stop) => *stop,
                None => continue,
            };

            let (arrival, departure) = match (st.arrival_time, st.departure_time) {
                (Some(arrival), Some(departure)) => (arrival, departure),
                _ => {
                    count_visit_no_times += 1;
                    continue;
                }
            };

            visits.push(ScheduledVisit {
                trip: TripId((trip_idx + trips_offset) as u32),
                stop_sequence: st.stop_sequence as u16,
                arrival_minutes: seconds_to_minutes(arrival),
                departure_minutes: seconds_to_minutes(departure),
                stop,
            });
        }
    }

    if count_visit_no_times > 0 {
        warn!("{} scheduled visits without both times", count_visit_no_times);
    }

    g.add_trips(trip_infos);
    g.add_routes(route_infos);
    g.build_adjacency(&visits);

    info!(
        "{} scheduled visits over {} trips and {} routes",
        visits.len(),
        g.trip_count() - trips_offset,
        g.route_count() - routes_offset
    );

    Ok(())
}

pub fn seconds_to_minutes(seconds: u32) -> f64 {
    seconds as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_convert_to_fractional_minutes() {
        assert_eq!(seconds_to_minutes(0), 0.0);
        assert_eq!(seconds_to_minutes(6090), 101.5);
        assert_eq!(seconds_to_minutes(86400), 1440.0);
    }
}
