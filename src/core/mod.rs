// Core algorithm exports
pub mod filters;
pub mod recommend;
pub mod scoring;
pub mod semester;

pub use filters::{matches_search, matches_student_filters, ConnectionFilter, StudentFilters};
pub use recommend::{Partitioned, Recommender};
pub use scoring::calculate_match_score;
pub use semester::{period_distance, semester_value};
