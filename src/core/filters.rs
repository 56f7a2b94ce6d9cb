use serde::{Deserialize, Serialize};

use crate::models::Student;

/// Connection-status filter for the student ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionFilter {
    #[default]
    All,
    Connected,
    NotConnected,
}

/// Pre-scoring filters for the student ranking
#[derive(Debug, Clone, Default)]
pub struct StudentFilters {
    /// Case-insensitive substring search over name, major, and interests
    pub search: Option<String>,
    /// Exact academic-period label
    pub year: Option<String>,
    /// Exact major
    pub major: Option<String>,
    /// Required interest tag
    pub interest: Option<String>,
    pub connection: ConnectionFilter,
}

/// Check whether a student passes the pre-scoring filters.
///
/// `connections` is the requesting user's accepted connection set, used by
/// the connection-status filter.
pub fn matches_student_filters(
    student: &Student,
    filters: &StudentFilters,
    connections: &[i64],
) -> bool {
    if let Some(term) = &filters.search {
        let term = term.to_lowercase();
        let matches_name = student.name.to_lowercase().contains(&term);
        let matches_major = student.major.to_lowercase().contains(&term);
        let matches_interest = student
            .interests
            .iter()
            .any(|i| i.to_lowercase().contains(&term));
        if !matches_name && !matches_major && !matches_interest {
            return false;
        }
    }

    if let Some(year) = &filters.year {
        if student.academic_period.as_deref() != Some(year.as_str()) {
            return false;
        }
    }

    if let Some(major) = &filters.major {
        if &student.major != major {
            return false;
        }
    }

    if let Some(interest) = &filters.interest {
        if !student.interests.contains(interest) {
            return false;
        }
    }

    let is_connected = connections.contains(&student.id);
    match filters.connection {
        ConnectionFilter::All => true,
        ConnectionFilter::Connected => is_connected,
        ConnectionFilter::NotConnected => !is_connected,
    }
}

/// Case-insensitive substring search over a name/description pair, used by
/// the group and club rankings
pub fn matches_search(name: &str, desc: &str, query: &str) -> bool {
    let query = query.to_lowercase();
    name.to_lowercase().contains(&query) || desc.to_lowercase().contains(&query)
}
