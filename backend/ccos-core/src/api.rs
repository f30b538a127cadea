// src/api.rs
use axum::{
    extract::{FromRequest, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::devices::{self, AccessPoint, Camera, DeviceStats, StatusChange, Status, SystemState};
use crate::documents::{expiring_documents, DocumentAlert, PublicDocument};
use crate::error::AppError;
use crate::national_id;
use crate::presence::{available_dates, AttendanceEvent, PresenceAggregator, PresenceSummary};
use crate::report::{render_report, ReportData};
use crate::text_organizer::{organize, PersonRecord};
use crate::warehouse_access::{UserProfile, Visibility};

// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<PresenceAggregator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let aggregator = PresenceAggregator::new(config.partner_companies());
        Self {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let camera_routes = Router::new()
        .route("/toggle", post(handle_toggle_camera))
        .route("/warehouse-status", post(handle_set_warehouse_status))
        .route("/ticket", post(handle_update_ticket))
        .route("/resolve", post(handle_resolve_camera));

    let api_routes = Router::new()
        .route("/organize", post(handle_organize))
        .route("/national-id/validate", post(handle_validate_national_id))
        .route("/presence", post(handle_presence))
        .route("/report", post(handle_report))
        .nest("/cameras", camera_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// JSON body extractor whose rejections come back as `{"error": ..}`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

//=============================================================================
// Models
//=============================================================================

#[derive(Debug, Deserialize)]
pub struct OrganizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrganizeResponse {
    pub count: usize,
    pub records: Vec<PersonRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateIdRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateIdResponse {
    pub valid: bool,
    pub formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PresenceRequest {
    pub events: Vec<AttendanceEvent>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PresenceResponse {
    #[serde(flatten)]
    pub summary: PresenceSummary,
    pub available_dates: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub access_points: Vec<AccessPoint>,
    #[serde(default)]
    pub events: Vec<AttendanceEvent>,
    #[serde(default)]
    pub documents: Vec<PublicDocument>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub tickets: HashMap<String, String>,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
    pub system_state: SystemState,
    pub stats: DeviceStats,
    pub expiring_documents: Vec<DocumentAlert>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleCameraRequest {
    pub cameras: Vec<Camera>,
    pub uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleCameraResponse {
    pub cameras: Vec<Camera>,
    pub change: StatusChange,
}

#[derive(Debug, Deserialize)]
pub struct WarehouseStatusRequest {
    pub cameras: Vec<Camera>,
    pub warehouse: String,
    pub status: Status,
}

#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    pub cameras: Vec<Camera>,
    pub uuid: String,
    #[serde(default)]
    pub ticket: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CamerasResponse {
    pub cameras: Vec<Camera>,
}

//=============================================================================
// Handlers
//=============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_organize(
    AppJson(request): AppJson<OrganizeRequest>,
) -> Json<OrganizeResponse> {
    let records = organize(&request.text);
    info!("Organized list into {} records", records.len());
    Json(OrganizeResponse {
        count: records.len(),
        records,
    })
}

async fn handle_validate_national_id(
    AppJson(request): AppJson<ValidateIdRequest>,
) -> Json<ValidateIdResponse> {
    Json(ValidateIdResponse {
        valid: national_id::is_valid(&request.id),
        formatted: national_id::format(&request.id),
    })
}

async fn handle_presence(
    State(state): State<AppState>,
    AppJson(request): AppJson<PresenceRequest>,
) -> Result<Json<PresenceResponse>, AppError> {
    let as_of = request.as_of.as_deref().map(parse_pinned_date).transpose()?;
    let visibility = Visibility::for_user(request.user.as_ref());

    let summary = state.aggregator.aggregate(&request.events, &visibility, as_of);
    Ok(Json(PresenceResponse {
        summary,
        available_dates: available_dates(&request.events, &visibility),
    }))
}

async fn handle_report(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReportRequest>,
) -> Json<ReportResponse> {
    let visibility = Visibility::for_user(request.user.as_ref());
    let data = ReportData::build(
        &request.cameras,
        &request.access_points,
        &request.events,
        &visibility,
        &state.aggregator,
        request.tickets,
        request.generated_at,
    );

    let alerts = expiring_documents(
        &request.documents,
        request.generated_at.date(),
        state.config.document_warning_days,
    );

    info!(
        "Report generated: {} offline devices, {} document alerts",
        data.offline.len(),
        alerts.len()
    );

    Json(ReportResponse {
        report: render_report(&data),
        system_state: data.stats.system_state(),
        stats: data.stats,
        expiring_documents: alerts,
    })
}

async fn handle_toggle_camera(
    AppJson(request): AppJson<ToggleCameraRequest>,
) -> Result<Json<ToggleCameraResponse>, AppError> {
    let (cameras, change) = devices::toggle_status(&request.cameras, &request.uuid)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown camera {}", request.uuid)))?;
    Ok(Json(ToggleCameraResponse { cameras, change }))
}

async fn handle_set_warehouse_status(
    AppJson(request): AppJson<WarehouseStatusRequest>,
) -> Json<CamerasResponse> {
    Json(CamerasResponse {
        cameras: devices::set_warehouse_status(
            &request.cameras,
            &request.warehouse,
            request.status,
        ),
    })
}

async fn handle_update_ticket(
    AppJson(request): AppJson<TicketRequest>,
) -> Json<CamerasResponse> {
    Json(CamerasResponse {
        cameras: devices::update_ticket(&request.cameras, &request.uuid, &request.ticket),
    })
}

async fn handle_resolve_camera(
    AppJson(request): AppJson<TicketRequest>,
) -> Json<CamerasResponse> {
    Json(CamerasResponse {
        cameras: devices::resolve_issue(&request.cameras, &request.uuid),
    })
}

pub fn parse_pinned_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}
