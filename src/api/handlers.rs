use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::traits::CampaignRegistry;
use crate::api::models::{HealthResponse, SpendReportQuery, UpdateResponse};
use crate::error::AppResult;
use crate::report::engine::ReportEngine;
use crate::report::models::{Account, ReportEntry};

#[derive(Clone)]
pub struct AppState {
    pub report_engine: Arc<ReportEngine>,
    pub registry: Arc<dyn CampaignRegistry>,
}

/// Liveness probe
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Run a full pacing and reconciliation report
/// GET /api/facebook/spend?send_slack=bool
///
/// Returns the structured entry list; any upstream failure aborts the
/// whole report and surfaces as a single error object.
pub async fn get_spend_report(
    State(state): State<AppState>,
    Query(query): Query<SpendReportQuery>,
) -> AppResult<Json<Vec<ReportEntry>>> {
    info!("Spend report requested (send_slack={})", query.send_slack);

    let report = state.report_engine.generate(query.send_slack).await?;

    // A failed notification never discards the computed entries.
    if let Some(warning) = &report.notification_warning {
        warn!("Report computed but notification failed: {}", warning);
    }

    Ok(Json(report.entries))
}

/// Read the declared campaign registry
/// GET /api/campaigns
pub async fn get_campaigns(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let accounts = state.registry.load_accounts().await?;
    Ok(Json(accounts))
}

/// Replace the declared campaign registry
/// POST /api/campaigns
pub async fn update_campaigns(
    State(state): State<AppState>,
    Json(accounts): Json<Vec<Account>>,
) -> AppResult<Json<UpdateResponse>> {
    info!("Registry update received: {} accounts", accounts.len());
    state.registry.store_accounts(&accounts).await?;
    Ok(Json(UpdateResponse {
        message: "Registry updated successfully".to_string(),
    }))
}
