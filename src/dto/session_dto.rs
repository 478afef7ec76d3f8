use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::quiz::QuizQuestion;
use crate::services::session_service::{SessionOptions, SessionView};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, message = "quiz must contain at least one question"))]
    pub quiz: Vec<QuizQuestion>,
    pub show_immediate_feedback: Option<bool>,
    pub allow_publish: Option<bool>,
}

impl CreateSessionRequest {
    pub fn options(&self) -> SessionOptions {
        let defaults = SessionOptions::default();
        SessionOptions {
            show_immediate_feedback: self
                .show_immediate_feedback
                .unwrap_or(defaults.show_immediate_feedback),
            allow_publish: self.allow_publish.unwrap_or(defaults.allow_publish),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    #[validate(length(max = 2000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: SessionView,
}
