//! Epic API client - the backend's REST API behind every collaborator port.
//!
//! # Configuration
//!
//! ```ignore
//! let config = EpicApiConfig::new("https://epic.example.org")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let client = EpicApiClient::new(config)?;
//! let tree = client.fetch_tree(&scope, &credential).await?;
//! ```
//!
//! # Endpoints
//!
//! | Port | Method | Path |
//! |------|--------|------|
//! | `TreeSource` | GET | `/api/area/?format=json` |
//! | `AgencySource` | GET | `/api/agency/?format=json` |
//! | `ProgressSource` | GET | `/api/program/{id}/progress/?format=json` |
//! | `QuestionSource` | GET | `/api/program/{id}/question-{kind}/?format=json` |
//! | `QuestionSource` | GET | `/api/question/{id}/answers/?format=json` |
//! | `AnswerSink` | PATCH | `/api/answer/{id}/` |
//!
//! Requests authenticate with `Authorization: Token <credential>`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::catalog::RawArea;
use crate::domain::foundation::{AgencyId, ProgramId, ScopeId};
use crate::domain::progress::ProgressRecord;
use crate::domain::selection::Agency;
use crate::ports::{
    AgencySource, AnswerSink, AnswerSubmission, AnswerValue, Credential, ProgressSource,
    Question, QuestionId, QuestionKind, QuestionSource, SourceError, StoredAnswer, TreeSource,
};

/// Configuration for the Epic API client.
#[derive(Debug, Clone)]
pub struct EpicApiConfig {
    /// Base URL of the backend, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for EpicApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

impl EpicApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// REST client for the Epic backend.
#[derive(Debug, Clone)]
pub struct EpicApiClient {
    config: EpicApiConfig,
    client: Client,
}

impl EpicApiClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotAvailable` if the underlying HTTP client cannot be built.
    pub fn new(config: EpicApiConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::not_available(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &EpicApiConfig {
        &self.config
    }

    fn areas_url(&self) -> String {
        format!("{}/api/area/?format=json", self.config.base_url)
    }

    fn agencies_url(&self) -> String {
        format!("{}/api/agency/?format=json", self.config.base_url)
    }

    fn progress_url(&self, program_id: ProgramId) -> String {
        format!(
            "{}/api/program/{}/progress/?format=json",
            self.config.base_url, program_id
        )
    }

    fn questions_url(&self, program_id: ProgramId, kind: QuestionKind) -> String {
        format!(
            "{}/api/program/{}/question-{}/?format=json",
            self.config.base_url,
            program_id,
            kind.path_segment()
        )
    }

    fn stored_answer_url(&self, question_id: QuestionId) -> String {
        format!(
            "{}/api/question/{}/answers/?format=json",
            self.config.base_url, question_id
        )
    }

    fn answer_url(&self, answer_id: u64) -> String {
        format!("{}/api/answer/{}/", self.config.base_url, answer_id)
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request
            .header("Authorization", format!("Token {}", credential.expose()))
            .header("Accept", "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SourceError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::not_available(format!(
                    "timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else if e.is_connect() {
                SourceError::not_available(format!("connection failed: {}", e))
            } else {
                SourceError::not_available(e.to_string())
            }
        })
    }

    /// Fetches a list endpoint where an unsuccessful status means "no data".
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        url: String,
        credential: &Credential,
    ) -> Result<Vec<T>, SourceError> {
        let response = self
            .send(self.authorized(self.client.get(&url), credential))
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "list request unsuccessful, treating as no data");
            return Ok(Vec::new());
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| SourceError::invalid_payload(format!("failed to parse {}: {}", url, e)))
    }
}

/// Maps an unsuccessful status to the error a caller can act on.
fn status_error(status: StatusCode) -> SourceError {
    match status.as_u16() {
        401 | 403 => SourceError::Unauthorized,
        code => SourceError::Rejected { status: code },
    }
}

// ─────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AgencyPayload {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    programs: Vec<AgencyProgramPayload>,
}

#[derive(Debug, Deserialize)]
struct AgencyProgramPayload {
    id: u64,
}

impl From<AgencyPayload> for Agency {
    fn from(payload: AgencyPayload) -> Self {
        Agency::new(
            AgencyId::new(payload.id),
            payload.name,
            payload
                .programs
                .into_iter()
                .map(|p| ProgramId::new(p.id))
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    progress: f64,
    #[serde(default, alias = "questions_answers")]
    question_answers: Vec<HashMap<String, Option<u64>>>,
}

impl ProgressPayload {
    fn into_record(self, program_id: ProgramId) -> Result<ProgressRecord, SourceError> {
        let total = u32::try_from(self.question_answers.len())
            .map_err(|_| SourceError::invalid_payload("too many questions"))?;
        let unanswered = self
            .question_answers
            .iter()
            .flat_map(|entry| entry.values())
            .filter(|answer| answer.is_none())
            .count();
        let unanswered = u32::try_from(unanswered)
            .map_err(|_| SourceError::invalid_payload("too many questions"))?;

        ProgressRecord::new(program_id, self.progress, unanswered, Some(total))
            .map_err(|e| SourceError::invalid_payload(format!("program {}: {}", program_id, e)))
    }
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    id: u64,
    program: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl QuestionPayload {
    fn into_question(self, kind: QuestionKind) -> Question {
        Question {
            id: self.id,
            program_id: ProgramId::new(self.program),
            kind,
            title: self.title,
            description: self.description,
        }
    }
}

/// A stored answer. An empty object means the question has no answer yet.
#[derive(Debug, Deserialize)]
struct StoredAnswerPayload {
    id: Option<u64>,
    question: Option<u64>,
    short_answer: Option<String>,
    selected_choice: Option<String>,
    #[serde(default)]
    justify_answer: String,
    selected_programs: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredAnswerResponse {
    Many(Vec<StoredAnswerPayload>),
    One(StoredAnswerPayload),
}

impl StoredAnswerResponse {
    fn into_payload(self) -> Option<StoredAnswerPayload> {
        match self {
            StoredAnswerResponse::Many(answers) => answers.into_iter().next(),
            StoredAnswerResponse::One(answer) => Some(answer),
        }
    }
}

impl StoredAnswerPayload {
    fn into_answer(self, question_id: QuestionId) -> Option<StoredAnswer> {
        let id = self.id?;
        let value = if let Some(programs) = self.selected_programs {
            AnswerValue::MultipleChoice {
                selected_programs: programs.into_iter().map(ProgramId::new).collect(),
            }
        } else if let Some(choice) = self.selected_choice {
            AnswerValue::SingleChoice {
                selected_choice: Some(choice).filter(|c| !c.is_empty()),
                justify_answer: self.justify_answer,
            }
        } else {
            AnswerValue::YesNo {
                short_answer: match self.short_answer.as_deref() {
                    Some("Y") => Some(true),
                    Some("N") => Some(false),
                    _ => None,
                },
                justify_answer: self.justify_answer,
            }
        };
        Some(StoredAnswer {
            id,
            question_id: self.question.unwrap_or(question_id),
            value,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnswerPatch<'a> {
    YesNo {
        justify_answer: &'a str,
        short_answer: bool,
    },
    SingleChoice {
        justify_answer: &'a str,
        selected_choice: &'a str,
    },
    MultipleChoice {
        justify_answer: &'a str,
        selected_programs: &'a [ProgramId],
    },
}

impl<'a> From<&'a AnswerSubmission> for AnswerPatch<'a> {
    fn from(submission: &'a AnswerSubmission) -> Self {
        match submission {
            AnswerSubmission::YesNo {
                justify_answer,
                short_answer,
                ..
            } => AnswerPatch::YesNo {
                justify_answer,
                short_answer: *short_answer,
            },
            AnswerSubmission::SingleChoice {
                justify_answer,
                selected_choice,
                ..
            } => AnswerPatch::SingleChoice {
                justify_answer,
                selected_choice,
            },
            AnswerSubmission::MultipleChoice {
                selected_programs, ..
            } => AnswerPatch::MultipleChoice {
                justify_answer: "",
                selected_programs,
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Port implementations
// ─────────────────────────────────────────────────────────────────────

#[async_trait]
impl TreeSource for EpicApiClient {
    async fn fetch_tree(
        &self,
        scope: &ScopeId,
        credential: &Credential,
    ) -> Result<Vec<RawArea>, SourceError> {
        // The backend serves a single tree per deployment; the scope only
        // tags the request in logs.
        debug!(scope = scope.as_str(), "fetching tree");
        self.fetch_list(self.areas_url(), credential)
            .await
            .map_err(|e| {
                error!(scope = scope.as_str(), error = %e, "tree fetch failed");
                e
            })
    }
}

#[async_trait]
impl AgencySource for EpicApiClient {
    async fn fetch_agencies(&self, credential: &Credential) -> Result<Vec<Agency>, SourceError> {
        let agencies: Vec<AgencyPayload> = self.fetch_list(self.agencies_url(), credential).await?;
        Ok(agencies.into_iter().map(Agency::from).collect())
    }
}

#[async_trait]
impl ProgressSource for EpicApiClient {
    async fn fetch_progress(
        &self,
        program_id: ProgramId,
        credential: &Credential,
    ) -> Result<ProgressRecord, SourceError> {
        let request = self.authorized(self.client.get(self.progress_url(program_id)), credential);
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let payload: ProgressPayload = response.json().await.map_err(|e| {
            SourceError::invalid_payload(format!("program {} progress: {}", program_id, e))
        })?;
        payload.into_record(program_id)
    }
}

#[async_trait]
impl QuestionSource for EpicApiClient {
    async fn fetch_questions(
        &self,
        program_id: ProgramId,
        kind: QuestionKind,
        credential: &Credential,
    ) -> Result<Vec<Question>, SourceError> {
        let questions: Vec<QuestionPayload> = self
            .fetch_list(self.questions_url(program_id, kind), credential)
            .await?;
        debug!(
            %program_id,
            kind = kind.path_segment(),
            count = questions.len(),
            "questions fetched"
        );
        Ok(questions.into_iter().map(|q| q.into_question(kind)).collect())
    }

    async fn fetch_answer(
        &self,
        question_id: QuestionId,
        credential: &Credential,
    ) -> Result<Option<StoredAnswer>, SourceError> {
        let url = self.stored_answer_url(question_id);
        let response = self
            .send(self.authorized(self.client.get(&url), credential))
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                question_id,
                status = status.as_u16(),
                "answer request unsuccessful, treating as unanswered"
            );
            return Ok(None);
        }

        let body: StoredAnswerResponse = response.json().await.map_err(|e| {
            SourceError::invalid_payload(format!("question {} answer: {}", question_id, e))
        })?;
        Ok(body
            .into_payload()
            .and_then(|payload| payload.into_answer(question_id)))
    }
}

#[async_trait]
impl AnswerSink for EpicApiClient {
    async fn save_answer(
        &self,
        submission: &AnswerSubmission,
        credential: &Credential,
    ) -> Result<(), SourceError> {
        let answer_id = submission.answer_id();
        let request = self
            .authorized(self.client.patch(self.answer_url(answer_id)), credential)
            .json(&AnswerPatch::from(submission));
        let response = self.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(answer_id, status = status.as_u16(), "answer save rejected");
            return Err(status_error(status));
        }
        debug!(answer_id, "answer saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> EpicApiClient {
        EpicApiClient::new(EpicApiConfig::new(base).with_timeout(Duration::from_secs(2))).unwrap()
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = EpicApiConfig::new("http://epic.local/");
        assert_eq!(config.base_url, "http://epic.local");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builds_endpoint_urls() {
        let client = client("http://epic.local");

        assert_eq!(client.areas_url(), "http://epic.local/api/area/?format=json");
        assert_eq!(client.agencies_url(), "http://epic.local/api/agency/?format=json");
        assert_eq!(
            client.progress_url(ProgramId::new(42)),
            "http://epic.local/api/program/42/progress/?format=json"
        );
        assert_eq!(client.answer_url(7), "http://epic.local/api/answer/7/");
        assert_eq!(
            client.questions_url(ProgramId::new(4), QuestionKind::Evolution),
            "http://epic.local/api/program/4/question-evolution/?format=json"
        );
        assert_eq!(
            client.stored_answer_url(11),
            "http://epic.local/api/question/11/answers/?format=json"
        );
    }

    #[test]
    fn question_payload_keeps_requested_kind() {
        let payload: QuestionPayload = serde_json::from_value(json!({
            "id": 8,
            "program": 4,
            "title": "Legal basis",
            "description": "Is there a national framework?"
        }))
        .unwrap();

        let question = payload.into_question(QuestionKind::NationalFramework);

        assert_eq!(question.id, 8);
        assert_eq!(question.program_id, ProgramId::new(4));
        assert_eq!(question.kind, QuestionKind::NationalFramework);
        assert_eq!(question.description.as_deref(), Some("Is there a national framework?"));
    }

    #[test]
    fn empty_answer_object_is_unanswered() {
        let body: StoredAnswerResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.into_payload().and_then(|p| p.into_answer(5)), None);

        let body: StoredAnswerResponse = serde_json::from_value(json!([])).unwrap();
        assert_eq!(body.into_payload().and_then(|p| p.into_answer(5)), None);
    }

    #[test]
    fn answer_payload_maps_by_present_fields() {
        let yes_no: StoredAnswerResponse = serde_json::from_value(json!({
            "id": 1, "question": 5, "short_answer": "N", "justify_answer": "Pending law"
        }))
        .unwrap();
        let single: StoredAnswerResponse = serde_json::from_value(json!([{
            "id": 2, "question": 6, "selected_choice": "", "justify_answer": ""
        }]))
        .unwrap();
        let multiple: StoredAnswerResponse = serde_json::from_value(json!({
            "id": 3, "question": 7, "selected_programs": [2, 9]
        }))
        .unwrap();

        assert_eq!(
            yes_no.into_payload().and_then(|p| p.into_answer(5)).map(|a| a.value),
            Some(AnswerValue::YesNo {
                short_answer: Some(false),
                justify_answer: "Pending law".to_string(),
            })
        );
        assert_eq!(
            single.into_payload().and_then(|p| p.into_answer(6)).map(|a| a.value),
            Some(AnswerValue::SingleChoice {
                selected_choice: None,
                justify_answer: String::new(),
            })
        );
        let multiple = multiple.into_payload().and_then(|p| p.into_answer(7)).unwrap();
        assert_eq!(multiple.id, 3);
        assert_eq!(multiple.question_id, 7);
        assert_eq!(
            multiple.value,
            AnswerValue::MultipleChoice {
                selected_programs: vec![ProgramId::new(2), ProgramId::new(9)],
            }
        );
    }

    #[test]
    fn progress_payload_derives_counts() {
        let payload: ProgressPayload = serde_json::from_value(json!({
            "progress": 0.5,
            "question_answers": [{"1": 10}, {"2": null}, {"3": 12}, {"4": null}]
        }))
        .unwrap();

        let record = payload.into_record(ProgramId::new(3)).unwrap();

        assert_eq!(record.program_id(), ProgramId::new(3));
        assert_eq!(record.total_questions(), Some(4));
        assert_eq!(record.unanswered_count(), 2);
    }

    #[test]
    fn progress_payload_accepts_legacy_key() {
        let payload: ProgressPayload = serde_json::from_value(json!({
            "progress": 0.0,
            "questions_answers": [{"1": null}]
        }))
        .unwrap();

        let record = payload.into_record(ProgramId::new(1)).unwrap();
        assert_eq!(record.unanswered_count(), 1);
    }

    #[test]
    fn out_of_range_progress_is_invalid_payload() {
        let payload: ProgressPayload =
            serde_json::from_value(json!({"progress": 1.5, "question_answers": []})).unwrap();

        let err = payload.into_record(ProgramId::new(1)).unwrap_err();
        assert!(matches!(err, SourceError::InvalidPayload(_)));
    }

    #[test]
    fn agency_payload_maps_program_ids() {
        let payload: AgencyPayload = serde_json::from_value(json!({
            "id": 2,
            "name": "Water Authority",
            "programs": [{"id": 5, "name": "Pipes"}, {"id": 9}]
        }))
        .unwrap();

        let agency = Agency::from(payload);
        assert_eq!(agency.id(), AgencyId::new(2));
        assert_eq!(agency.program_ids(), &[ProgramId::new(5), ProgramId::new(9)]);
    }

    #[test]
    fn answer_patch_bodies_match_backend_fields() {
        let yes_no = AnswerSubmission::YesNo {
            answer_id: 1,
            justify_answer: "Audited".to_string(),
            short_answer: true,
        };
        let multiple = AnswerSubmission::MultipleChoice {
            answer_id: 2,
            selected_programs: vec![ProgramId::new(4)],
        };

        assert_eq!(
            serde_json::to_value(AnswerPatch::from(&yes_no)).unwrap(),
            json!({"justify_answer": "Audited", "short_answer": true})
        );
        assert_eq!(
            serde_json::to_value(AnswerPatch::from(&multiple)).unwrap(),
            json!({"justify_answer": "", "selected_programs": [4]})
        );
    }

    #[test]
    fn status_errors() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED), SourceError::Unauthorized);
        assert_eq!(status_error(StatusCode::FORBIDDEN), SourceError::Unauthorized);
        assert_eq!(
            status_error(StatusCode::NOT_FOUND),
            SourceError::Rejected { status: 404 }
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_not_available() {
        let client = client("http://127.0.0.1:9");
        let scope = ScopeId::new("default").unwrap();

        let result = client.fetch_tree(&scope, &Credential::new("t")).await;

        assert!(matches!(result, Err(SourceError::NotAvailable { .. })));
    }

    #[tokio::test]
    async fn unreachable_backend_fails_question_reads() {
        let client = client("http://127.0.0.1:9");
        let credential = Credential::new("t");

        let questions = client
            .fetch_questions(ProgramId::new(1), QuestionKind::Linkages, &credential)
            .await;
        let answer = client.fetch_answer(1, &credential).await;

        assert!(matches!(questions, Err(SourceError::NotAvailable { .. })));
        assert!(matches!(answer, Err(SourceError::NotAvailable { .. })));
    }
}
