use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::published_quiz::PublishedQuiz;
use crate::models::quiz::{QuizDocument, QuizQuestion};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[serde(alias = "input")]
    #[validate(length(min = 1, max = 2000, message = "topic must be between 1 and 2000 characters"))]
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishQuizRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "quiz must contain at least one question"))]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PublishSessionRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedQuizResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl PublishedQuizResponse {
    pub fn new(record: &PublishedQuiz, url: String) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            created_at: record.created_at,
            url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub document: QuizDocument,
}
