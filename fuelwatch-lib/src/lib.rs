pub mod fluctuation;
pub mod geo;
pub mod history;
pub mod station;
pub mod user;

use std::fmt::Display;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::fluctuation::{PriceFluctuator, TickSummary};
pub use crate::geo::{distance, find_nearest, Location, EARTH_RADIUS_KM, NEAREST_LIMIT};
pub use crate::history::{PriceHistory, PriceRecord};
pub use crate::station::{Station, StationStore};
pub use crate::user::{User, UserStore};

#[derive(Eq, PartialEq, Hash, Debug, Copy, Clone, Serialize, Deserialize)]
pub enum FuelType {
    Diesel,
    Gasoline,
    Gas,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::Diesel, FuelType::Gasoline, FuelType::Gas];
}

impl Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelType::Diesel => write!(f, "Diesel"),
            FuelType::Gasoline => write!(f, "Gasoline"),
            FuelType::Gas => write!(f, "Gas"),
        }
    }
}

impl FromStr for FuelType {
    type Err = FuelWatchError;

    /// Wire names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .into_iter()
            .find(|fuel_type| fuel_type.to_string() == s)
            .ok_or_else(|| FuelWatchError::InvalidFuelType(s.to_string()))
    }
}

/// A fuel sold at a station together with its current price.
#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Fuel {
    #[serde(rename = "type")]
    pub fuel_type: FuelType,
    pub price: f64,
}

impl Fuel {
    pub fn new(fuel_type: FuelType, price: f64) -> Self {
        Self { fuel_type, price }
    }
}

#[derive(Error, Clone, PartialEq, Debug)]
pub enum FuelWatchError {
    #[error("invalid fuel type provided: {0:?}")]
    InvalidFuelType(String),

    #[error("station {0} not found")]
    StationNotFound(u64),

    #[error("station {station_id} does not offer {fuel_type}")]
    FuelNotOffered { station_id: u64, fuel_type: FuelType },
}

#[cfg(test)]
mod tests {
    use crate::{Fuel, FuelType, FuelWatchError};

    #[test]
    fn fuel_type_parses_exact_wire_names() {
        for fuel_type in FuelType::ALL {
            assert_eq!(fuel_type.to_string().parse::<FuelType>(), Ok(fuel_type));
        }
    }

    #[test]
    fn fuel_type_rejects_unknown_and_miscased_names() {
        assert_eq!(
            "diesel".parse::<FuelType>(),
            Err(FuelWatchError::InvalidFuelType("diesel".to_string()))
        );
        assert!("Kerosene".parse::<FuelType>().is_err());
        assert!("".parse::<FuelType>().is_err());
    }

    #[test]
    fn fuel_serializes_with_type_key() {
        let json = serde_json::to_value(Fuel::new(FuelType::Gasoline, 1.5)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Gasoline", "price": 1.5}));
    }

    #[test]
    fn fuel_rejects_unknown_type_on_decode() {
        let decoded = serde_json::from_str::<Fuel>(r#"{"type": "Petrol", "price": 1.0}"#);
        assert!(decoded.is_err());
    }
}
