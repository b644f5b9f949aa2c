use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn};
use rand::Rng;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use crate::station::StationStore;

/// Every tick multiplies each price by a factor drawn uniformly from this
/// range. There is no floor or ceiling on the resulting price.
pub const MULTIPLIER_RANGE: Range<f64> = 0.3..2.0;

#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
pub struct TickSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Background task that randomly perturbs every station's fuel prices on a
/// fixed interval until its cancellation token fires.
pub struct PriceFluctuator {
    stations: Arc<StationStore>,
    interval: Duration,
    token: CancellationToken,
}

impl PriceFluctuator {
    pub fn new(stations: Arc<StationStore>, interval: Duration, token: CancellationToken) -> Self {
        Self {
            stations,
            interval,
            token,
        }
    }

    /// One pass over a snapshot of all stations. A failed update is logged
    /// and skipped, the rest of the pass carries on.
    pub fn tick(&self) -> TickSummary {
        let mut summary = TickSummary::default();
        let mut rng = rand::rng();

        for station in self.stations.list_stations() {
            // one draw per fuel type: duplicate entries share a price
            let mut seen = HashSet::new();
            for fuel in station.fuels.iter().filter(|f| seen.insert(f.fuel_type)) {
                let new_price = fuel.price * rng.random_range(MULTIPLIER_RANGE);

                match self.stations.update_fuel_price(station.id, fuel.fuel_type, new_price) {
                    Ok(old_price) => {
                        debug!(
                            "updated price for {} at station {} from {:.2} to {:.2}",
                            fuel.fuel_type, station.name, old_price, new_price
                        );
                        summary.updated += 1;
                    }
                    Err(e) => {
                        warn!("skipping {} at station {}: {}", fuel.fuel_type, station.id, e);
                        summary.failed += 1;
                    }
                }
            }
        }

        summary
    }

    /// Ticks every interval, first tick one full interval after start.
    /// Returns the number of completed ticks once cancelled.
    pub async fn run(self) -> u64 {
        info!("fluctuating prices every {:?}", self.interval);

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks = 0;
        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {
                    let summary = self.tick();
                    ticks += 1;
                    debug!("tick {} updated {} prices, {} failed", ticks, summary.updated, summary.failed);
                }
            }
        }

        info!("price fluctuation stopped after {} ticks", ticks);
        ticks
    }
}
