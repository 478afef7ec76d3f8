use reqwest::Client;
use url::Url;

use crate::error::GenerationError;
use crate::services::ai_service::AIService;

/// Turns a public profile page into a generated resume: the page is fetched
/// as markdown through a conversion proxy and handed to the resume model.
#[derive(Clone)]
pub struct ResumeService {
    client: Client,
    markdown_proxy_url: String,
    ai_service: AIService,
}

impl ResumeService {
    pub fn new(client: Client, markdown_proxy_url: String, ai_service: AIService) -> Self {
        Self {
            client,
            markdown_proxy_url,
            ai_service,
        }
    }

    pub async fn build_resume(&self, source: &Url) -> Result<String, GenerationError> {
        let markdown = self.fetch_markdown(source).await?;
        tracing::info!(source = %source, bytes = markdown.len(), "Fetched markdown for resume");
        self.ai_service.generate_resume(&markdown).await
    }

    async fn fetch_markdown(&self, source: &Url) -> Result<String, GenerationError> {
        let mut proxy = Url::parse(&self.markdown_proxy_url).map_err(|e| {
            GenerationError::ServiceUnavailable(format!("invalid markdown proxy url: {}", e))
        })?;
        proxy.query_pairs_mut().append_pair("url", source.as_str());

        let response = self.client.get(proxy).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, source = %source, "Markdown proxy returned an error");
            return Err(GenerationError::ServiceUnavailable(format!(
                "markdown proxy status {}",
                status.as_u16()
            )));
        }
        Ok(response.text().await?)
    }
}
