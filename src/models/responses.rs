use serde::{Deserialize, Serialize};

use crate::models::domain::Scored;
use crate::services::connections::RequestOutcome;

/// Partitioned ranking result for one candidate kind.
///
/// `recommended` is never empty while `others` is non-empty: when no
/// candidate clears the threshold the single best one is recommended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse<T> {
    pub mine: Vec<Scored<T>>,
    pub recommended: Vec<Scored<T>>,
    pub others: Vec<Scored<T>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for connection request/accept/cancel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionActionResponse {
    pub success: bool,
    pub status: RequestOutcome,
}

/// A user's connection graph, split by edge state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub connections: Vec<i64>,
    pub incoming: Vec<i64>,
    pub outgoing: Vec<i64>,
}
