use serde::{Deserialize, Serialize};

/// Student profile as stored in the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub major: String,
    /// Academic period label, e.g. "WiSe 25/26" or "SoSe 25"
    #[serde(rename = "year", default)]
    pub academic_period: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Enrolled module titles
    #[serde(default)]
    pub courses: Vec<String>,
    /// Ids of clubs this student belongs to, filled in at read time
    /// from club membership documents
    #[serde(rename = "clubIds", default)]
    pub club_ids: Vec<i64>,
}

/// Study group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "maxMembers", default)]
    pub max_members: Option<u32>,
    #[serde(default = "default_member_count")]
    pub members: u32,
    #[serde(rename = "createdBy", default)]
    pub created_by: Option<i64>,
    #[serde(rename = "isPublic", default = "default_true")]
    pub is_public: bool,
    #[serde(rename = "memberIds", default)]
    pub member_ids: Vec<i64>,
}

/// Campus club
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: u32,
    #[serde(rename = "memberIds", default)]
    pub member_ids: Vec<i64>,
    #[serde(rename = "meetingDay", default)]
    pub meeting_day: Option<String>,
    #[serde(rename = "meetingTime", default)]
    pub meeting_time: Option<String>,
}

impl Club {
    pub fn has_member(&self, student_id: i64) -> bool {
        self.member_ids.contains(&student_id)
    }
}

/// Elective module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_true() -> bool { true }
fn default_member_count() -> u32 { 1 }

/// The scoring-relevant projection of the requesting user.
///
/// Built per request from the student document and club memberships;
/// there is no session-global current user anywhere in the service.
#[derive(Debug, Clone, Default)]
pub struct MatchProfile {
    pub user_id: i64,
    pub interests: Vec<String>,
    pub academic_period: Option<String>,
    pub club_ids: Vec<i64>,
    pub courses: Vec<String>,
}

impl MatchProfile {
    pub fn from_student(student: &Student) -> Self {
        Self {
            user_id: student.id,
            interests: student.interests.clone(),
            academic_period: student.academic_period.clone(),
            club_ids: student.club_ids.clone(),
            courses: student.courses.clone(),
        }
    }
}

/// Overlap between a candidate's affiliations and the profile's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffiliationOverlap {
    pub clubs: usize,
    pub modules: usize,
}

/// Capability every rankable entity exposes to the scoring core.
///
/// Candidates without an academic period or shared affiliations fall back
/// to the defaults, which disable those score terms.
pub trait Scorable {
    fn candidate_id(&self) -> i64;
    fn tags(&self) -> &[String];

    fn academic_period(&self) -> Option<&str> {
        None
    }

    fn affiliation_overlap(&self, _profile: &MatchProfile) -> AffiliationOverlap {
        AffiliationOverlap::default()
    }
}

impl Scorable for Student {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &[String] {
        &self.interests
    }

    fn academic_period(&self) -> Option<&str> {
        self.academic_period.as_deref()
    }

    fn affiliation_overlap(&self, profile: &MatchProfile) -> AffiliationOverlap {
        AffiliationOverlap {
            clubs: self
                .club_ids
                .iter()
                .filter(|id| profile.club_ids.contains(id))
                .count(),
            modules: self
                .courses
                .iter()
                .filter(|c| profile.courses.contains(c))
                .count(),
        }
    }
}

impl Scorable for Group {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Scorable for Club {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Scorable for Module {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Candidate kinds the recommender ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Student,
    Group,
    Club,
    Module,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Student => "students",
            CandidateKind::Group => "groups",
            CandidateKind::Club => "clubs",
            CandidateKind::Module => "modules",
        }
    }
}

/// A candidate together with its computed match score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "sharedTags")]
    pub shared_tags: Vec<String>,
    /// Distance between candidate and profile academic periods, when both
    /// are known. Tie-break key in the student ranking.
    #[serde(
        rename = "periodDistance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub period_distance: Option<f64>,
}

/// Scoring weights for the four score terms.
///
/// The terms sum to at most 100 with the default weights; the calculator
/// clamps the final score regardless.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub interest: f64,
    pub period: f64,
    pub affiliation: f64,
    pub base: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest: 40.0,
            period: 20.0,
            affiliation: 30.0,
            base: 10.0,
        }
    }
}

/// Per-kind recommendation thresholds
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub students: u8,
    pub groups: u8,
    pub clubs: u8,
    pub modules: u8,
}

impl Thresholds {
    pub fn for_kind(&self, kind: CandidateKind) -> u8 {
        match kind {
            CandidateKind::Student => self.students,
            CandidateKind::Group => self.groups,
            CandidateKind::Club => self.clubs,
            CandidateKind::Module => self.modules,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            students: 50,
            groups: 30,
            clubs: 30,
            modules: 30,
        }
    }
}
