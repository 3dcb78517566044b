use std::collections::{BTreeMap, HashMap};

use kdtree::KdTree;
use serde::{Deserialize, Serialize};

use crate::structures::{
    DatasetStats, LatLng, Poi, RouteInfo, StopData, StopId, TransitEdge, TripId, TripInfo,
};

// Floor on derived edge durations: equal or inverted timestamps in the
// timetable must not produce free or time-reversing hops.
static MIN_EDGE_MINUTES: f64 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduledVisit {
    pub trip: TripId,
    pub stop_sequence: u16,
    pub arrival_minutes: f64,
    pub departure_minutes: f64,
    pub stop: StopId,
}

#[derive(Serialize, Deserialize)]
pub struct Graph {
    stops: Vec<StopData>,
    adjacency: Vec<Vec<TransitEdge>>,
    stops_tree: KdTree<f64, StopId, [f64; 2]>,
    id_mapper: HashMap<String, StopId>,
    trips: Vec<TripInfo>,
    routes: Vec<RouteInfo>,
    pois: Vec<Poi>,
    poi_categories: Vec<String>,
    visit_count: usize,
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            stops: Vec::new(),
            adjacency: Vec::new(),
            stops_tree: KdTree::new(2),
            id_mapper: HashMap::new(),
            trips: Vec::<TripInfo>::new(),
            routes: Vec::<RouteInfo>::new(),
            pois: Vec::<Poi>::new(),
            poi_categories: Vec::<String>::new(),
            visit_count: 0,
        }
    }

    pub fn add_stop(&mut self, stop: StopData) -> StopId {
        let id = StopId(self.stops.len());

        let lat = stop.loc.latitude;
        let lon = stop.loc.longitude;

        self.id_mapper.insert(stop.stop_id.clone(), id);
        self.stops.push(stop);
        self.adjacency.push(Vec::new());
        let _ = self.stops_tree.add([lat, lon], id);

        id
    }

    pub fn add_edge(&mut self, from: StopId, edge: TransitEdge) {
        self.adjacency[from.0].push(edge);
    }

    pub fn get_id(&self, stop_id: &str) -> Option<&StopId> {
        self.id_mapper.get(stop_id)
    }

    pub fn get_stop(&self, id: StopId) -> Option<&StopData> {
        self.stops.get(id.0)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn outgoing(&self, id: StopId) -> &[TransitEdge] {
        match self.adjacency.get(id.0) {
            Some(edges) => edges,
            None => &[],
        }
    }

    // Derives one edge per consecutive pair of visits on the same trip.
    // Visits are grouped by trip and sorted by sequence position first, so
    // the resulting adjacency does not depend on input ordering.
    pub fn build_adjacency(&mut self, visits: &[ScheduledVisit]) {
        let mut by_trip = BTreeMap::<TripId, Vec<&ScheduledVisit>>::new();
        for visit in visits {
            by_trip.entry(visit.trip).or_default().push(visit);
        }

        for (trip_id, mut records) in by_trip {
            records.sort_unstable_by_key(|v| v.stop_sequence);

            let route_id = self.trips.get(trip_id.0 as usize).map(|t| t.route_id);

            for pair in records.windows(2) {
                let current = pair[0];
                let next = pair[1];

                let minutes =
                    (next.arrival_minutes - current.departure_minutes).max(MIN_EDGE_MINUTES);

                self.add_edge(
                    current.stop,
                    TransitEdge {
                        destination: next.stop,
                        minutes,
                        trip_id,
                        route_id,
                    },
                );
            }
        }

        self.visit_count += visits.len();
    }

    pub fn nearest_stops(&self, lat: f64, lon: f64, count: usize) -> Vec<(f64, StopId)> {
        match self.stops_tree.iter_nearest(&[lat, lon], &LatLng::tree_distance) {
            Ok(it) => it.take(count).map(|(dist, id)| (dist, *id)).collect(),
            Err(_) => {
                tracing::warn!("Failed to query nearest stops for {lat}, {lon}");
                Vec::new()
            }
        }
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn add_trips(&mut self, trips: Vec<TripInfo>) {
        self.trips.extend(trips);
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn add_routes(&mut self, routes: Vec<RouteInfo>) {
        self.routes.extend(routes);
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn add_pois(&mut self, pois: Vec<Poi>) {
        self.pois.extend(pois);
    }

    pub fn poi_categories(&self) -> &[String] {
        &self.poi_categories
    }

    pub fn add_poi_categories(&mut self, categories: Vec<String>) {
        self.poi_categories.extend(categories);
        self.poi_categories.sort();
        self.poi_categories.dedup();
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            stops: self.stops.len(),
            stop_times: self.visit_count,
            routes: self.routes.len(),
            pois: self.pois.len(),
        }
    }

    pub fn default_location(&self) -> LatLng {
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0;

        for stop in &self.stops {
            if stop.loc.latitude.is_finite() && stop.loc.longitude.is_finite() {
                lat_sum += stop.loc.latitude;
                lon_sum += stop.loc.longitude;
                count += 1;
            }
        }

        if count == 0 {
            return LatLng {
                latitude: 0.0,
                longitude: 0.0,
            };
        }

        LatLng {
            latitude: lat_sum / count as f64,
            longitude: lon_sum / count as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::RouteId;

    fn stop(g: &mut Graph, stop_id: &str, lat: f64, lon: f64) -> StopId {
        g.add_stop(StopData {
            stop_id: stop_id.to_string(),
            name: stop_id.to_string(),
            loc: LatLng {
                latitude: lat,
                longitude: lon,
            },
        })
    }

    fn visit(trip: u32, seq: u16, arrival: f64, departure: f64, stop: StopId) -> ScheduledVisit {
        ScheduledVisit {
            trip: TripId(trip),
            stop_sequence: seq,
            arrival_minutes: arrival,
            departure_minutes: departure,
            stop,
        }
    }

    fn two_stop_graph() -> (Graph, StopId, StopId) {
        let mut g = Graph::new();
        let a = stop(&mut g, "A", 50.0, 4.0);
        let b = stop(&mut g, "B", 50.01, 4.0);
        g.add_routes(vec![RouteInfo {
            route_short_name: "1".to_string(),
            route_long_name: "One".to_string(),
        }]);
        g.add_trips(vec![TripInfo {
            route_id: RouteId(0),
        }]);
        (g, a, b)
    }

    #[test]
    fn consecutive_visits_make_one_edge() {
        let (mut g, a, b) = two_stop_graph();
        g.build_adjacency(&[
            visit(0, 0, 99.0, 100.0, a),
            visit(0, 1, 101.5, 102.0, b),
        ]);

        let edges = g.outgoing(a);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].destination, b);
        assert_eq!(edges[0].minutes, 1.5);
        assert_eq!(edges[0].trip_id, TripId(0));
        assert_eq!(edges[0].route_id, Some(RouteId(0)));
        assert!(g.outgoing(b).is_empty());
    }

    #[test]
    fn equal_timestamps_get_the_floor() {
        let (mut g, a, b) = two_stop_graph();
        g.build_adjacency(&[
            visit(0, 0, 100.0, 100.0, a),
            visit(0, 1, 100.0, 100.5, b),
        ]);

        assert_eq!(g.outgoing(a)[0].minutes, 0.5);
    }

    #[test]
    fn inverted_timestamps_get_the_floor() {
        let (mut g, a, b) = two_stop_graph();
        g.build_adjacency(&[
            visit(0, 0, 100.0, 100.0, a),
            visit(0, 1, 97.0, 98.0, b),
        ]);

        assert_eq!(g.outgoing(a)[0].minutes, 0.5);
    }

    #[test]
    fn builder_sorts_within_each_trip() {
        let (mut g, a, b) = two_stop_graph();
        let c = stop(&mut g, "C", 50.02, 4.0);

        // out-of-order input must yield the same chain a -> b -> c
        g.build_adjacency(&[
            visit(0, 2, 110.0, 111.0, c),
            visit(0, 0, 99.0, 100.0, a),
            visit(0, 1, 104.0, 105.0, b),
        ]);

        assert_eq!(g.outgoing(a)[0].destination, b);
        assert_eq!(g.outgoing(a)[0].minutes, 4.0);
        assert_eq!(g.outgoing(b)[0].destination, c);
        assert_eq!(g.outgoing(b)[0].minutes, 5.0);
        assert!(g.outgoing(c).is_empty());
    }

    #[test]
    fn builder_is_input_order_independent() {
        let visits = |a: StopId, b: StopId, c: StopId| {
            vec![
                visit(0, 0, 99.0, 100.0, a),
                visit(0, 1, 104.0, 105.0, b),
                visit(1, 0, 200.0, 201.0, b),
                visit(1, 1, 207.0, 208.0, c),
            ]
        };

        let (mut g1, a1, b1) = two_stop_graph();
        let c1 = stop(&mut g1, "C", 50.02, 4.0);
        g1.add_trips(vec![TripInfo {
            route_id: RouteId(0),
        }]);
        let mut forward = visits(a1, b1, c1);
        g1.build_adjacency(&forward);

        let (mut g2, a2, b2) = two_stop_graph();
        let c2 = stop(&mut g2, "C", 50.02, 4.0);
        g2.add_trips(vec![TripInfo {
            route_id: RouteId(0),
        }]);
        forward = visits(a2, b2, c2);
        forward.reverse();
        g2.build_adjacency(&forward);

        for id in [a1, b1, c1] {
            let e1 = g1.outgoing(id);
            let e2 = g2.outgoing(id);
            assert_eq!(e1.len(), e2.len());
            for (x, y) in e1.iter().zip(e2) {
                assert_eq!(x.destination, y.destination);
                assert_eq!(x.minutes, y.minutes);
                assert_eq!(x.trip_id, y.trip_id);
            }
        }
    }

    #[test]
    fn nearest_stops_are_ordered_and_capped() {
        let mut g = Graph::new();
        let far = stop(&mut g, "far", 51.0, 4.0);
        let near = stop(&mut g, "near", 50.001, 4.0);
        let mid = stop(&mut g, "mid", 50.1, 4.0);

        let nearest = g.nearest_stops(50.0, 4.0, 2);
        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0].1, near);
        assert_eq!(nearest[1].1, mid);
        assert!(nearest[0].0 < nearest[1].0);

        let all = g.nearest_stops(50.0, 4.0, 10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].1, far);
    }

    #[test]
    fn stop_lookup_by_source_id() {
        let (g, a, _b) = two_stop_graph();
        assert_eq!(g.get_id("A"), Some(&a));
        assert!(g.get_id("Z").is_none());
        assert_eq!(g.get_stop(a).unwrap().name, "A");
    }

    #[test]
    fn default_location_is_the_stop_centroid() {
        let mut g = Graph::new();
        stop(&mut g, "A", 50.0, 4.0);
        stop(&mut g, "B", 52.0, 6.0);

        let loc = g.default_location();
        assert_eq!(loc.latitude, 51.0);
        assert_eq!(loc.longitude, 5.0);
    }
}
