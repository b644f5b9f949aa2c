use std::sync::{Arc, PoisonError, RwLock};
use log::info;
use serde::{Deserialize, Serialize};
use crate::geo::Location;
use crate::history::PriceHistory;
use crate::{Fuel, FuelType, FuelWatchError};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub fuels: Vec<Fuel>,
}

impl Station {
    #[cfg(test)]
    pub(crate) fn price_of(&self, fuel_type: FuelType) -> Option<f64> {
        self.fuels
            .iter()
            .find(|fuel| fuel.fuel_type == fuel_type)
            .map(|fuel| fuel.price)
    }
}

#[derive(Debug)]
struct StationTable {
    next_id: u64,
    stations: Vec<Station>,
}

/// Authoritative in-memory collection of stations.
///
/// Every price written through the store is appended to the shared
/// [`PriceHistory`] inside the same station write lock, so the current price
/// of a station and the last history record for that write never disagree.
/// Locks are always taken stations first, history second.
#[derive(Debug)]
pub struct StationStore {
    table: RwLock<StationTable>,
    history: Arc<PriceHistory>,
}

impl StationStore {
    pub fn new(history: Arc<PriceHistory>) -> Self {
        Self {
            table: RwLock::new(StationTable {
                next_id: 1,
                stations: vec![],
            }),
            history,
        }
    }

    pub fn history(&self) -> &Arc<PriceHistory> {
        &self.history
    }

    /// Stores a new station under the next sequential id and seeds the price
    /// history with every initial fuel price. Fuel types are expected to be
    /// validated by the caller.
    pub fn create_station(
        &self,
        name: String,
        address: String,
        location: Location,
        fuels: Vec<Fuel>,
    ) -> Station {
        let mut lock = self.table.write().unwrap_or_else(PoisonError::into_inner);

        let station = Station {
            id: lock.next_id,
            name,
            address,
            location,
            fuels,
        };
        lock.next_id += 1;

        for fuel in station.fuels.iter() {
            self.history.record_price(fuel.fuel_type, fuel.price);
        }
        lock.stations.push(station.clone());

        info!("created station {} ({}) with {} fuels", station.id, station.name, station.fuels.len());

        station
    }

    pub fn list_stations(&self) -> Vec<Station> {
        let lock = self.table.read().unwrap_or_else(PoisonError::into_inner);
        lock.stations.clone()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, station_id: u64) -> Option<Station> {
        let lock = self.table.read().unwrap_or_else(PoisonError::into_inner);
        lock.stations.iter().find(|s| s.id == station_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the price of every `fuel_type` entry on the station and
    /// appends one history record. Returns the previous price.
    pub fn update_fuel_price(
        &self,
        station_id: u64,
        fuel_type: FuelType,
        new_price: f64,
    ) -> Result<f64, FuelWatchError> {
        let mut lock = self.table.write().unwrap_or_else(PoisonError::into_inner);

        let station = lock
            .stations
            .iter_mut()
            .find(|s| s.id == station_id)
            .ok_or(FuelWatchError::StationNotFound(station_id))?;

        let mut previous = None;
        for fuel in station.fuels.iter_mut().filter(|f| f.fuel_type == fuel_type) {
            previous.get_or_insert(fuel.price);
            fuel.price = new_price;
        }

        let previous = previous.ok_or(FuelWatchError::FuelNotOffered {
            station_id,
            fuel_type,
        })?;

        self.history.record_price(fuel_type, new_price);

        Ok(previous)
    }
}
