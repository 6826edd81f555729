pub mod catalog;

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub use catalog::{Catalog, Medicine, SearchRequest, SearchResponse, SortOrder};
use catalog::{SearchError, VALID_FIELDS};

const DEFAULT_BY_TYPE_LIMIT: i64 = 50;
const MAX_BY_TYPE_LIMIT: i64 = 100;

type Shared = Arc<Catalog>;

/// Delays the first `n` requests by a fixed duration, then gets out of the way.
#[derive(Clone, Debug, Default)]
pub struct Latency {
    remaining: Arc<AtomicUsize>,
    delay: Duration,
}

impl Latency {
    pub fn first(requests: usize, delay: Duration) -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(requests)),
            delay,
        }
    }

    fn take(&self) -> Option<Duration> {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok()
            .map(|_| self.delay)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    pub field_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Suggestions {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Deserialize)]
struct SuggestionParams {
    query: Option<String>,
}

#[derive(Deserialize)]
struct SortParams {
    #[serde(default)]
    sort_order: SortOrder,
}

#[derive(Deserialize)]
struct ByTypeParams {
    #[serde(rename = "type")]
    medicine_type: String,
    limit: Option<i64>,
    #[serde(default)]
    sort_order: SortOrder,
}

/// `{detail}` error body with a status code.
struct Detail(StatusCode, String);

impl IntoResponse for Detail {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "detail": self.1 }))).into_response()
    }
}

/// Serves the bundled sample catalog with no injected latency.
pub fn app() -> Router {
    let catalog = Catalog::sample().unwrap_or_else(|err| {
        warn!(%err, "bundled catalog failed to parse, serving an empty table");
        Catalog::default()
    });
    app_with(catalog, Latency::default())
}

pub fn app_with(catalog: Catalog, latency: Latency) -> Router {
    let finder = Router::new()
        .route("/suggestions/{field}", get(suggestions))
        .route("/search", post(search))
        .route("/medicine/{name}", get(medicine_details))
        .route("/medicines/by_type", get(medicines_by_type))
        .with_state(Arc::new(catalog));

    Router::new()
        .route("/", get(root))
        .nest("/finder", finder)
        .layer(middleware::from_fn_with_state(latency, inject_latency))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn inject_latency(State(latency): State<Latency>, request: Request, next: Next) -> Response {
    if let Some(delay) = latency.take() {
        debug!(?delay, uri = %request.uri(), "delaying request");
        tokio::time::sleep(delay).await;
    }
    next.run(request).await
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to GenericBro API" }))
}

async fn suggestions(
    State(catalog): State<Shared>,
    Path(field): Path<String>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<Suggestions>, Detail> {
    let values = catalog
        .suggestions(&field, params.query.as_deref())
        .ok_or_else(|| {
            Detail(
                StatusCode::BAD_REQUEST,
                format!("Invalid field. Must be one of: {}", VALID_FIELDS.join(", ")),
            )
        })?;
    debug!(%field, count = values.len(), "suggestions");
    Ok(Json(Suggestions {
        suggestions: values
            .into_iter()
            .map(|value| Suggestion {
                value,
                field_type: field.clone(),
            })
            .collect(),
    }))
}

async fn search(
    State(catalog): State<Shared>,
    Query(params): Query<SortParams>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, Detail> {
    info!(?request, sort_order = ?params.sort_order, "search");
    match catalog.search(request, params.sort_order) {
        Ok(response) => Ok(Json(response)),
        Err(SearchError::NoCriteria) => Err(Detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "At least one search field must be provided".to_string(),
        )),
        Err(SearchError::InvalidRow { name, reason }) => {
            warn!(%name, reason, "search hit an invalid row");
            Err(Detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing search results: {reason}"),
            ))
        }
    }
}

async fn medicine_details(
    State(catalog): State<Shared>,
    Path(name): Path<String>,
) -> Result<Json<Medicine>, Detail> {
    let medicine = catalog
        .by_name(&name)
        .ok_or_else(|| Detail(StatusCode::NOT_FOUND, "Medicine not found".to_string()))?;
    medicine
        .validate()
        .map_err(|reason| Detail(StatusCode::INTERNAL_SERVER_ERROR, reason.to_string()))?;
    Ok(Json(medicine))
}

async fn medicines_by_type(
    State(catalog): State<Shared>,
    Query(params): Query<ByTypeParams>,
) -> Result<Json<Vec<Medicine>>, Detail> {
    let limit = params.limit.unwrap_or(DEFAULT_BY_TYPE_LIMIT);
    if !(1..=MAX_BY_TYPE_LIMIT).contains(&limit) {
        return Err(Detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("limit must be between 1 and {MAX_BY_TYPE_LIMIT}"),
        ));
    }
    let rows = catalog.by_type(&params.medicine_type, limit as usize, params.sort_order);
    info!(medicine_type = %params.medicine_type, count = rows.len(), "medicines by type");
    Ok(Json(rows))
}
