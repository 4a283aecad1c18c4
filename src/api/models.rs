use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========== REQUEST MODELS ==========

/// Query parameters for the spend report endpoint
#[derive(Debug, Deserialize)]
pub struct SpendReportQuery {
    /// When true, the composed report text is also delivered to the
    /// notification sink.
    #[serde(default)]
    pub send_slack: bool,
}

// ========== RESPONSE MODELS ==========

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Registry update acknowledgement
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
}
