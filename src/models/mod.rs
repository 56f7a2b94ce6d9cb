// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AffiliationOverlap, CandidateKind, Club, Group, MatchProfile, Module, Scorable, Scored,
    ScoringWeights, Student, Thresholds,
};
pub use requests::{ConnectionActionRequest, RankCandidatesRequest, RankStudentsRequest};
pub use responses::{
    ConnectionActionResponse, ConnectionsResponse, ErrorResponse, HealthResponse, RankResponse,
};
