pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    ai_service::{AIService, AiSettings},
    quiz_service::QuizService,
    resume_service::ResumeService,
    session_store::SessionStore,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ai_service: AIService,
    pub quiz_service: QuizService,
    pub resume_service: ResumeService,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let ai_service = AIService::new(http_client.clone(), AiSettings::from_config(config));
        let quiz_service = QuizService::new(pool.clone());
        let resume_service = ResumeService::new(
            http_client,
            config.markdown_proxy_url.clone(),
            ai_service.clone(),
        );

        Ok(Self {
            pool,
            config: Arc::new(config.clone()),
            ai_service,
            quiz_service,
            resume_service,
            sessions: SessionStore::new(),
        })
    }
}
