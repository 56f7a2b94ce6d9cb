//! Subset Algo - matching and recommendation service for the Subset campus network
//!
//! This library provides the matching core used by the Subset campus app:
//! a deterministic 0-100 compatibility score between a student profile and
//! any candidate entity (student, group, club, module), plus the
//! partitioner that turns scored candidates into the mine / recommended /
//! others shelves the app displays.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    calculate_match_score, period_distance, semester_value, Partitioned, Recommender,
};
pub use crate::models::{
    CandidateKind, Club, Group, MatchProfile, Module, RankResponse, Scorable, Scored,
    ScoringWeights, Student, Thresholds,
};
