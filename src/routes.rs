use std::sync::Arc;
use actix_web::http::{Method, StatusCode};
use actix_web::middleware::DefaultHeaders;
use actix_web::{get, post, web, HttpRequest, HttpResponse, ResponseError};
use fuelwatch_lib::{find_nearest, Fuel, FuelType, FuelWatchError, Location, StationStore, UserStore, NEAREST_LIMIT};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

pub struct AppState {
    pub stations: Arc<StationStore>,
    pub users: Arc<UserStore>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<FuelWatchError> for ApiError {
    fn from(err: FuelWatchError) -> Self {
        match err {
            FuelWatchError::StationNotFound(_) => ApiError::NotFound(err.to_string()),
            FuelWatchError::InvalidFuelType(_) | FuelWatchError::FuelNotOffered { .. } => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

fn json_response<T: Serialize>(value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string(value)
        .map_err(|e| ApiError::Internal(format!("failed to encode response: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("application/json").body(body))
}

#[derive(Deserialize, Debug)]
struct StationInput {
    name: String,
    address: String,
    location: Location,
    fuels: Vec<Fuel>,
}

#[derive(Deserialize, Debug)]
struct UserInput {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize, Debug)]
struct HistoryQuery {
    #[serde(rename = "type")]
    fuel_type: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NearestQuery {
    lat: Option<String>,
    lon: Option<String>,
}

fn parse_coordinate(raw: Option<&str>, what: &str) -> Result<f64, ApiError> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::BadRequest(format!("invalid {}", what)))
}

#[post("/api/station")]
async fn create_station(
    data: web::Data<AppState>,
    input: web::Json<StationInput>,
) -> Result<HttpResponse, ApiError> {
    info!("received request at /api/station");

    let input = input.into_inner();
    let station = data
        .stations
        .create_station(input.name, input.address, input.location, input.fuels);

    json_response(&station)
}

#[get("/api/station")]
async fn list_stations(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    json_response(&data.stations.list_stations())
}

#[get("/api/station/nearest")]
async fn nearest_stations(
    data: web::Data<AppState>,
    query: web::Query<NearestQuery>,
) -> Result<HttpResponse, ApiError> {
    let latitude = parse_coordinate(query.lat.as_deref(), "latitude")?;
    let longitude = parse_coordinate(query.lon.as_deref(), "longitude")?;

    let nearest = find_nearest(&data.stations, Location::new(latitude, longitude), NEAREST_LIMIT);
    debug!("{} stations near ({}, {})", nearest.len(), latitude, longitude);

    json_response(&nearest)
}

#[get("/api/fuel/history")]
async fn fuel_history(
    data: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ApiError> {
    let fuel_type = query
        .fuel_type
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing fuel type".to_string()))?
        .parse::<FuelType>()?;

    let history = data.stations.history().get_history(fuel_type);
    if history.is_empty() {
        return Err(ApiError::NotFound(format!("no history found for {}", fuel_type)));
    }

    json_response(&history)
}

#[post("/api/user")]
async fn create_user(
    data: web::Data<AppState>,
    input: web::Json<UserInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let user = data.users.create_user(input.name, input.email, input.password);
    json_response(&user)
}

#[get("/version")]
async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Answers CORS preflights for every path; anything else unmatched is a 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok().finish();
    }
    ApiError::NotFound(format!("no route for {} {}", req.method(), req.path())).error_response()
}

pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, GET, OPTIONS, PUT, DELETE"))
        .add((
            "Access-Control-Allow-Headers",
            "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization",
        ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(create_station)
    .service(list_stations)
    .service(nearest_stations)
    .service(fuel_history)
    .service(create_user)
    .service(get_version);
}
