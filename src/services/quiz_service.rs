use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, PublishError, Result};
use crate::models::published_quiz::PublishedQuiz;
use crate::models::quiz::QuizDocument;

pub const DEFAULT_TITLE: &str = "Untitled Quiz";

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores the document as a new record. Every call inserts a new row,
    /// so publishing the same document twice yields two ids.
    pub async fn publish(&self, document: &QuizDocument, title: Option<&str>) -> Result<PublishedQuiz> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        let questions = serde_json::to_value(document)?;

        let record = sqlx::query_as::<_, PublishedQuiz>(
            r#"
            INSERT INTO quizzes (title, questions)
            VALUES ($1, $2)
            RETURNING id, title, questions, created_at
            "#,
        )
        .bind(title)
        .bind(&questions)
        .fetch_one(&self.pool)
        .await
        .map_err(PublishError::StorageUnavailable)?;

        tracing::info!(quiz_id = %record.id, questions = document.len(), "Quiz published");
        Ok(record)
    }

    pub async fn get_record(&self, id: Uuid) -> Result<PublishedQuiz> {
        sqlx::query_as::<_, PublishedQuiz>(
            r#"SELECT id, title, questions, created_at FROM quizzes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(quiz_not_found)
    }

    pub async fn load(&self, id: Uuid) -> Result<QuizDocument> {
        let record = self.get_record(id).await?;
        decode_document(&record)
    }
}

pub fn quiz_not_found() -> Error {
    Error::NotFound("Quiz does not exist".to_string())
}

/// Parses a path segment as a quiz id; anything malformed is simply an
/// unknown quiz.
pub fn parse_quiz_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| quiz_not_found())
}

pub fn decode_document(record: &PublishedQuiz) -> Result<QuizDocument> {
    serde_json::from_value(record.questions.clone()).map_err(|e| {
        Error::Internal(format!("stored quiz {} is not a valid document: {}", record.id, e))
    })
}
