use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use crate::station::{Station, StationStore};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// How many stations a nearest-station lookup returns.
pub const NEAREST_LIMIT: usize = 3;

/// A point in degrees.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

fn haversine(theta: f64) -> f64 {
    0.5 * (1.0 - theta.cos())
}

/// Great-circle distance in kilometres.
pub fn distance(a: Location, b: Location) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = haversine(d_lat)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * haversine(d_lon);
    // rounding can push near-antipodal pairs just past 1
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Returns up to `k` stations closest to `location`, nearest first. Stations
/// at the same distance keep their store order.
pub fn find_nearest(stations: &StationStore, location: Location, k: usize) -> Vec<Station> {
    let mut ranked: Vec<(f64, Station)> = stations
        .list_stations()
        .into_iter()
        .map(|station| (distance(location, station.location), station))
        .collect();

    ranked.sort_by_key(|(d, _)| OrderedFloat(*d));

    ranked.into_iter().take(k).map(|(_, station)| station).collect()
}
