use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublishedQuiz {
    pub id: Uuid,
    pub title: String,
    pub questions: JsonValue,
    pub created_at: DateTime<Utc>,
}
