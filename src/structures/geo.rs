use std::fmt::Display;

use serde::{Deserialize, Serialize};

static EARTH_RADIUS_KM: f64 = 6371.0;
static WALK_SPEED_KMH: f64 = 4.8; // brisk walk

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl LatLng {
    pub fn distance_km(&self, other: Self) -> f64 {
        haversine_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    // Distance callback for the kd-tree, same metric as `distance_km`.
    pub fn tree_distance(loc1: &[f64], loc2: &[f64]) -> f64 {
        assert!(loc1.len() == 2);
        assert!(loc2.len() == 2);
        haversine_km(loc1[0], loc1[1], loc2[0], loc2[1])
    }
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_latitude = (lat2 - lat1).to_radians();
    let delta_longitude = (lon2 - lon1).to_radians();

    let central_angle_inner = (delta_latitude / 2.0).sin().powi(2)
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (delta_longitude / 2.0).sin().powi(2);
    let central_angle = 2.0 * central_angle_inner.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

pub fn walking_minutes(distance_km: f64) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    (distance_km / WALK_SPEED_KMH) * 60.0
}
