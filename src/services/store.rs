use crate::models::{Club, Group, Module, Student};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Document-store API client
///
/// Handles all reads from the campus-network document backend:
/// - Fetching a single student profile
/// - Listing students, groups, clubs, and modules
///
/// Writes (joining groups, editing profiles, posts, chats) belong to the
/// main application backend, not to this service.
pub struct StoreClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: StoreCollections,
}

/// Collection ids in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub students: String,
    pub groups: String,
    pub clubs: String,
    pub modules: String,
}

impl StoreClient {
    /// Create a new document-store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: StoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    /// Fetch a single student by id
    pub async fn get_student(&self, student_id: i64) -> Result<Student, StoreError> {
        // Query format: JSON array of query strings
        let query_json = format!(r#"["id={}"]"#, student_id);
        let encoded_query = urlencoding::encode(&query_json);

        let url = format!(
            "{}/databases/{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.students,
            encoded_query
        );

        tracing::debug!("Fetching student {}", student_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to fetch student: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        let doc = documents
            .first()
            .ok_or_else(|| StoreError::NotFound(format!("Student {} not found", student_id)))?;

        let data = doc.get("data").unwrap_or(doc);

        serde_json::from_value(data.clone())
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse student: {}", e)))
    }

    /// List all students
    pub async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        self.list_documents(&self.collections.students).await
    }

    /// List all groups
    pub async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        self.list_documents(&self.collections.groups).await
    }

    /// List all clubs
    pub async fn list_clubs(&self) -> Result<Vec<Club>, StoreError> {
        self.list_documents(&self.collections.clubs).await
    }

    /// List all modules
    pub async fn list_modules(&self) -> Result<Vec<Module>, StoreError> {
        self.list_documents(&self.collections.modules).await
    }

    /// List every document of a collection, skipping unparseable entries
    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        );

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::ApiError(format!(
                "Failed to list {}: {}",
                collection,
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        let items: Vec<T> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect();

        tracing::debug!("Listed {} documents from {} (total: {})", items.len(), collection, total);

        Ok(items)
    }
}

/// Fill in each student's club memberships from the club documents, the
/// way the main backend enriches its student listing
pub fn enrich_with_club_ids(students: &mut [Student], clubs: &[Club]) {
    for student in students.iter_mut() {
        student.club_ids = clubs
            .iter()
            .filter(|c| c.has_member(student.id))
            .map(|c| c.id)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_collections() -> StoreCollections {
        StoreCollections {
            students: "students".to_string(),
            groups: "groups".to_string(),
            clubs: "clubs".to_string(),
            modules: "modules".to_string(),
        }
    }

    #[test]
    fn test_store_client_creation() {
        let client = StoreClient::new(
            "https://store.test/v1".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            test_collections(),
        );

        assert_eq!(client.base_url, "https://store.test/v1");
        assert_eq!(client.api_key, "test_key");
    }

    #[tokio::test]
    async fn test_list_students_parses_documents() {
        let mut server = mockito::Server::new_async().await;

        let body = serde_json::json!({
            "total": 2,
            "documents": [
                {
                    "id": 1,
                    "name": "Anna Schmidt",
                    "major": "Informatik",
                    "year": "SoSe 25",
                    "interests": ["KI", "Coding"]
                },
                {
                    "id": 2,
                    "name": "Ben Weber",
                    "major": "Maschinenbau",
                    "interests": []
                }
            ]
        });

        let mock = server
            .mock("GET", "/databases/db/collections/students/documents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = StoreClient::new(
            server.url(),
            "key".to_string(),
            "project".to_string(),
            "db".to_string(),
            test_collections(),
        );

        let students = client.list_students().await.unwrap();

        mock.assert_async().await;
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "Anna Schmidt");
        assert_eq!(students[0].academic_period.as_deref(), Some("SoSe 25"));
        assert_eq!(students[1].academic_period, None);
    }

    #[tokio::test]
    async fn test_get_student_not_found() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"/databases/db/collections/students/documents.*".into()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 0, "documents": []}"#)
            .create_async()
            .await;

        let client = StoreClient::new(
            server.url(),
            "key".to_string(),
            "project".to_string(),
            "db".to_string(),
            test_collections(),
        );

        let result = client.get_student(42).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_enrich_with_club_ids() {
        let mut students = vec![
            Student {
                id: 1,
                name: "Anna".to_string(),
                major: "Informatik".to_string(),
                academic_period: None,
                interests: vec![],
                bio: None,
                courses: vec![],
                club_ids: vec![],
            },
            Student {
                id: 2,
                name: "Ben".to_string(),
                major: "Maschinenbau".to_string(),
                academic_period: None,
                interests: vec![],
                bio: None,
                courses: vec![],
                club_ids: vec![],
            },
        ];

        let clubs = vec![
            Club {
                id: 201,
                name: "Schach AG".to_string(),
                desc: String::new(),
                tags: vec![],
                members: 2,
                member_ids: vec![1, 2],
                meeting_day: None,
                meeting_time: None,
            },
            Club {
                id: 202,
                name: "Laufgruppe".to_string(),
                desc: String::new(),
                tags: vec![],
                members: 1,
                member_ids: vec![1],
                meeting_day: None,
                meeting_time: None,
            },
        ];

        enrich_with_club_ids(&mut students, &clubs);

        assert_eq!(students[0].club_ids, vec![201, 202]);
        assert_eq!(students[1].club_ids, vec![201]);
    }
}
