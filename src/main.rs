mod config;
mod routes;

use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use fuelwatch_lib::{PriceFluctuator, PriceHistory, StationStore, UserStore};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;
use crate::config::Config;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    info!("starting fuelwatch {}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            return Err(std::io::Error::other(e));
        }
    };
    let address = config.address();

    let history = Arc::new(PriceHistory::new());
    let stations = Arc::new(StationStore::new(history));
    let users = Arc::new(UserStore::new());

    let token = CancellationToken::new();
    let fluctuator = PriceFluctuator::new(stations.clone(), config.fluctuation_interval(), token.clone());
    let fluctuation = tokio::spawn(fluctuator.run());

    let data = web::Data::new(AppState { stations, users });

    info!("starting http server @ {}", address);

    let result = match HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(routes::cors_headers())
            .configure(routes::configure)
            .default_service(web::to(routes::fallback))
    })
    .bind(&address)
    {
        Ok(server) => server.run().await,
        Err(e) => {
            error!("failed to bind {}: {}", address, e);
            Err(e)
        }
    };

    info!("shutting down price fluctuation");
    token.cancel();
    if let Err(e) = fluctuation.await {
        warn!("price fluctuation task failed: {}", e);
    }

    result
}
