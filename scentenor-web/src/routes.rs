//! API routes for the form interactions
//!
//! One handler per form interaction: advisory weather lookup, inventory
//! upload, inventory view and the recommendation button. Every failure is
//! terminal for its interaction only; the handlers map errors to a status
//! code and a plain message and the server keeps running.

use axum::{
    Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use scentenor_core::models::{FragranceType, Preferences, RecommendationForm, WeatherReading};
use scentenor_core::{InventoryError, RecommendError, session, weather};

use crate::AppState;

/// A user-visible interaction failure with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, "{}", self.message);
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        let status = match err {
            RecommendError::EmptyInventory => StatusCode::BAD_REQUEST,
            RecommendError::Service(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    #[serde(default)]
    city: String,
}

#[derive(Debug, Serialize)]
struct WeatherResponse {
    temperature_c: f64,
    humidity: u8,
    description: String,
    /// false when the fixed fallback reading was substituted
    observed: bool,
}

/// Advisory lookup used to pre-fill the form's weather fields
async fn fetch_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherResponse> {
    let lookup = weather::lookup(&query.city, &state.config.weather_api_key).await;
    let observed = lookup.is_observed();
    let reading = lookup.into_reading();

    Json(WeatherResponse {
        temperature_c: reading.temperature_c,
        humidity: reading.humidity,
        description: reading.description,
        observed,
    })
}

#[derive(Debug, Serialize)]
struct InventoryResponse {
    count: usize,
    perfumes: Vec<String>,
}

/// The list held by the session, surviving until the next successful upload
async fn view_inventory(State(state): State<AppState>) -> Json<InventoryResponse> {
    let session = state.session.lock().await;
    let perfumes = session.inventory().to_vec();
    Json(InventoryResponse {
        count: perfumes.len(),
        perfumes,
    })
}

/// Upload a perfume list; only a successful parse replaces the held one
async fn upload_inventory(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<InventoryResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid upload: {e}")))?
    {
        let Some(filename) = field.file_name().map(String::from) else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("could not read the upload: {e}")))?;

        let mut session = state.session.lock().await;
        let perfumes = session.load_inventory(&filename, &bytes)?.to_vec();

        return Ok(Json(InventoryResponse {
            count: perfumes.len(),
            perfumes,
        }));
    }

    Err(ApiError::bad_request("no file in the upload"))
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(default)]
    city: String,
    /// Edited weather values; missing ones are filled by a fresh lookup
    temperature_c: Option<f64>,
    humidity: Option<u8>,
    description: Option<String>,
    fragrance_type: Option<FragranceType>,
    age_group: Option<String>,
    event: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    recommendation: String,
}

/// The recommendation button: guard, compose, one completion call
async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let weather = resolve_weather(&state, &request).await;

    let form = RecommendationForm {
        city: request.city,
        weather,
        preferences: Preferences {
            fragrance_type: request.fragrance_type,
            age_group: non_blank(request.age_group),
            event: non_blank(request.event),
        },
    };

    // Holding the lock for the whole call keeps interactions strictly
    // sequential: one outstanding request at a time.
    let session = state.session.lock().await;
    let reply = session::recommend(&session, &form, &state.config).await?;

    Ok(Json(RecommendResponse {
        recommendation: reply,
    }))
}

/// Build the reading the request will use, looking up only the gaps
///
/// The form lets the user edit the fetched values, so anything supplied in
/// the request wins; a lookup happens only when some field was left blank.
async fn resolve_weather(state: &AppState, request: &RecommendRequest) -> WeatherReading {
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let mut reading = match (request.temperature_c, request.humidity, description) {
        (Some(temperature_c), Some(humidity), Some(description)) => {
            return WeatherReading {
                temperature_c,
                humidity,
                description: description.to_string(),
            };
        }
        _ => {
            weather::lookup(&request.city, &state.config.weather_api_key)
                .await
                .into_reading()
        }
    };

    if let Some(temperature_c) = request.temperature_c {
        reading.temperature_c = temperature_c;
    }
    if let Some(humidity) = request.humidity {
        reading.humidity = humidity;
    }
    if let Some(description) = description {
        reading.description = description.to_string();
    }

    reading
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/weather", get(fetch_weather))
        .route("/api/inventory", get(view_inventory).post(upload_inventory))
        .route("/api/recommend", post(recommend))
}
