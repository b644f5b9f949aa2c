use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::FuelType;

/// One observed price. Never mutated after it is appended.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl PriceRecord {
    pub fn now(price: f64) -> Self {
        Self {
            price,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only price log keyed by fuel type.
///
/// Insertion order is chronological order, so the last record of a fuel type
/// is always its most recent price. Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct PriceHistory {
    records: RwLock<HashMap<FuelType, Vec<PriceRecord>>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_price(&self, fuel_type: FuelType, price: f64) {
        let record = PriceRecord::now(price);
        let mut lock = self.records.write().unwrap_or_else(PoisonError::into_inner);
        lock.entry(fuel_type).or_default().push(record);
    }

    /// Snapshot of every record for `fuel_type`, oldest first. Empty when
    /// nothing has been recorded yet.
    pub fn get_history(&self, fuel_type: FuelType) -> Vec<PriceRecord> {
        let lock = self.records.read().unwrap_or_else(PoisonError::into_inner);
        lock.get(&fuel_type).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn latest(&self, fuel_type: FuelType) -> Option<PriceRecord> {
        let lock = self.records.read().unwrap_or_else(PoisonError::into_inner);
        lock.get(&fuel_type).and_then(|records| records.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use crate::{FuelType, PriceHistory};

    #[test]
    fn empty_history_for_unrecorded_fuel() {
        let history = PriceHistory::new();
        assert!(history.get_history(FuelType::Gas).is_empty());
        assert_eq!(history.latest(FuelType::Gas), None);
    }

    #[test]
    fn records_are_kept_in_write_order() {
        let history = PriceHistory::new();
        for price in [1.10, 1.25, 0.98] {
            history.record_price(FuelType::Diesel, price);
        }

        let records = history.get_history(FuelType::Diesel);
        let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![1.10, 1.25, 0.98]);
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(history.latest(FuelType::Diesel).map(|r| r.price), Some(0.98));
    }

    #[test]
    fn fuel_types_are_tracked_separately() {
        let history = PriceHistory::new();
        history.record_price(FuelType::Diesel, 1.0);
        history.record_price(FuelType::Gasoline, 2.0);
        history.record_price(FuelType::Gasoline, 3.0);

        assert_eq!(history.get_history(FuelType::Diesel).len(), 1);
        assert_eq!(history.get_history(FuelType::Gasoline).len(), 2);
        assert!(history.get_history(FuelType::Gas).is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let history = PriceHistory::new();
        history.record_price(FuelType::Gas, 0.5);
        let mut snapshot = history.get_history(FuelType::Gas);
        snapshot.clear();
        assert_eq!(history.get_history(FuelType::Gas).len(), 1);
    }

    #[test]
    fn concurrent_writers_lose_nothing() {
        let history = PriceHistory::new();
        thread::scope(|s| {
            for t in 0..8 {
                let history = &history;
                s.spawn(move || {
                    for i in 0..250 {
                        history.record_price(FuelType::Diesel, (t * 1000 + i) as f64);
                    }
                });
            }
        });
        assert_eq!(history.get_history(FuelType::Diesel).len(), 2000);
    }
}
