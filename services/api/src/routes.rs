use crate::infra::{parse_filter, AppState};
use axum::extract::{Path, Query};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use mediscope::analytics::{flow_window, DashboardSnapshot, FilterQuery, DEFAULT_FLOW_DAYS};
use mediscope::error::AppError;
use mediscope::patients::export::export_file_name;
use mediscope::patients::{Department, PatientRow};
use serde::{Deserialize, Serialize};
use serde_json::json;

const INDEX_HTML: &str = include_str!("../assets/index.html");
const STATIC_ASSETS: &[(&str, &str)] = &[
    ("dashboard.js", include_str!("../assets/dashboard.js")),
    ("dashboard.css", include_str!("../assets/dashboard.css")),
];

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) department: Option<String>,
    #[serde(default)]
    pub(crate) risk_level: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) days: Option<u32>,
}

impl DashboardQuery {
    fn into_parts(self) -> Result<(FilterQuery, u32), AppError> {
        let days = flow_window(self.days.unwrap_or(DEFAULT_FLOW_DAYS))?;
        let filter = FilterQuery {
            department: self.department,
            risk_level: self.risk_level,
            status: self.status,
            search: self.search,
        };
        Ok((filter, days))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PopulationChange {
    pub(crate) changed: usize,
    pub(crate) total: usize,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/:file", get(static_asset))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard", get(dashboard_endpoint))
        .route("/api/v1/patients", get(patients_endpoint))
        .route("/api/v1/patients/export.csv", get(export_endpoint))
        .route("/api/v1/departments", get(departments_endpoint))
        .route("/api/v1/patients/refresh", post(refresh_endpoint))
        .route("/api/v1/patients/regenerate", post(regenerate_endpoint))
        .route("/api/v1/patients/rescore", post(rescore_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        INDEX_HTML,
    )
}

async fn static_asset(Path(file): Path<String>) -> Response {
    match STATIC_ASSETS.iter().find(|(name, _)| *name == file) {
        Some((name, body)) => {
            let mime = mime_guess::from_path(name).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], *body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no asset named '{file}'") })),
        )
            .into_response(),
    }
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let (filter, days) = query.into_parts()?;
    let filter = parse_filter(filter)?;
    Ok(Json(state.census().dashboard(&filter, days)))
}

pub(crate) async fn patients_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<PatientRow>>, AppError> {
    let filter = parse_filter(query)?;
    Ok(Json(state.census().rows(&filter)))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let filter = parse_filter(query)?;
    let (body, file_name) = {
        let census = state.census();
        (
            census.export_csv(&filter)?,
            export_file_name(census.now().date()),
        )
    };

    let disposition = HeaderValue::from_str(&format!("attachment; filename={file_name}"))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn departments_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<Department>> {
    Json(state.census().departments())
}

pub(crate) async fn refresh_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<PopulationChange>, AppError> {
    let mut census = state.census();
    let changed = census.refresh()?;
    Ok(Json(PopulationChange {
        changed,
        total: census.patients().len(),
    }))
}

pub(crate) async fn regenerate_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<PopulationChange>, AppError> {
    let mut census = state.census();
    let changed = census.regenerate()?;
    Ok(Json(PopulationChange {
        changed,
        total: census.patients().len(),
    }))
}

pub(crate) async fn rescore_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<PopulationChange>, AppError> {
    let mut census = state.census();
    let changed = census.rescore()?;
    Ok(Json(PopulationChange {
        changed,
        total: census.patients().len(),
    }))
}
