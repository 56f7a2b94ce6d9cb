use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::filters::ConnectionFilter;

fn default_limit() -> u16 {
    20
}

/// Request to rank students against a user's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankStudentsRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: u16,
    /// Post-scoring cutoff; 0 disables it
    #[serde(alias = "min_score", rename = "minScore", default)]
    pub min_score: u8,
    /// Free-text search over name, major, and interests
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub connection: ConnectionFilter,
}

/// Request to rank groups, clubs, or modules against a user's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankCandidatesRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(alias = "min_score", rename = "minScore", default)]
    pub min_score: u8,
    /// Free-text search over name and description
    #[serde(default)]
    pub search: Option<String>,
}

/// Request to create, accept, or cancel a connection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionActionRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: i64,
}
