use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::config::{Config, GenerationSettings};
use crate::error::GenerationError;
use crate::models::quiz::{QuizDocument, RawQuizDocument};
use crate::utils::logging::truncate_for_log;

const QUIZ_SYSTEM_INSTRUCTION: &str = "create a quiz for coding\n";

const QUIZ_PROMPT: &str = "You are a coding quiz generator. The details such as language, topic and \
difficulty level will be provided to you. Return the output strictly as a JSON object without any \
preceding text. The JSON object must have a key named \"quiz\" holding an array of question objects. \
Each question object must include the keys \"question\", \"options\" (plain text, without numbers or \
letters), \"correct_answer\" (exactly one of the options) and \"explanation\". Put any code the \
question refers to inside a fenced code block in the question text.";

const QUIZ_EXAMPLE_OUTPUT: &str = r#"output: {
  "quiz": [
    {
      "question": "Your question here",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correct_answer": "Option 2",
      "explanation": "The explanation for the correct answer."
    }
  ]
}"#;

const RESUME_PROMPT: &str = "You are a professional resume builder. You will receive user data in \
markdown format, as follows: {markdown}. Based on this information, create a well-structured and \
professional resume for the user.";

const SAFETY_SETTINGS: [(&str, &str); 4] = [
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_ONLY_HIGH"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_MEDIUM_AND_ABOVE"),
];

/// Connection and model settings for the generative service, built once at
/// startup and handed to [`AIService::new`].
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: String,
    pub base_url: String,
    pub quiz_model: String,
    pub resume_model: String,
    pub generation: GenerationSettings,
    pub shuffle_options: bool,
}

impl AiSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
            quiz_model: config.quiz_model.clone(),
            resume_model: config.resume_model.clone(),
            generation: config.generation.clone(),
            shuffle_options: config.shuffle_options,
        }
    }
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    settings: AiSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl AIService {
    pub fn new(client: Client, settings: AiSettings) -> Self {
        Self { client, settings }
    }

    pub async fn generate_quiz(&self, topic: &str) -> Result<QuizDocument, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::EmptyTopic);
        }

        tracing::info!(topic = %topic, model = %self.settings.quiz_model, "Generating quiz");
        let payload = self.quiz_payload(topic);
        let text = self
            .generate_content(&self.settings.quiz_model, payload)
            .await?;

        let document = parse_quiz_document(&text).map_err(|e| {
            tracing::warn!(
                error = %e,
                response = %truncate_for_log(&text, 300),
                "Unusable quiz from generative service"
            );
            e
        })?;
        let document = if self.settings.shuffle_options {
            shuffle_options(document, &mut rand::thread_rng())?
        } else {
            document
        };

        tracing::info!(questions = document.len(), "Quiz generated");
        Ok(document)
    }

    pub async fn generate_resume(&self, markdown: &str) -> Result<String, GenerationError> {
        if markdown.trim().is_empty() {
            return Err(GenerationError::InvalidResponse(
                "markdown source was empty".to_string(),
            ));
        }

        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": RESUME_PROMPT.replace("{markdown}", markdown) }]
            }],
            "safetySettings": safety_settings(),
        });

        self.generate_content(&self.settings.resume_model, payload)
            .await
    }

    fn quiz_payload(&self, topic: &str) -> JsonValue {
        let generation = &self.settings.generation;
        json!({
            "systemInstruction": { "parts": [{ "text": QUIZ_SYSTEM_INSTRUCTION }] },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": QUIZ_PROMPT },
                    { "text": format!("input: {}", topic) },
                    { "text": QUIZ_EXAMPLE_OUTPUT },
                ]
            }],
            "generationConfig": {
                "temperature": generation.temperature,
                "topP": generation.top_p,
                "topK": generation.top_k,
                "maxOutputTokens": generation.max_output_tokens,
                "responseMimeType": "application/json",
            },
            "safetySettings": safety_settings(),
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        payload: JsonValue,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        );

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            tracing::warn!(status = %status, "Generative service returned an error");
            return Err(GenerationError::ServiceUnavailable(format!(
                "status {}: {}",
                status.as_u16(),
                truncate_for_log(&body, 300)
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::InvalidResponse(format!("unexpected body: {}", e)))?;
        candidate_text(parsed)
    }
}

fn safety_settings() -> JsonValue {
    SAFETY_SETTINGS
        .iter()
        .map(|(category, threshold)| json!({ "category": category, "threshold": threshold }))
        .collect()
}

fn candidate_text(resp: GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::InvalidResponse(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::InvalidResponse("no candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::InvalidResponse(format!(
            "empty candidate (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(text)
}

/// Parses model output into a quiz. Accepts a `{"quiz": [...]}` object, the
/// `questions` alias, or a bare array, optionally wrapped in a code fence.
pub fn parse_quiz_document(text: &str) -> Result<QuizDocument, GenerationError> {
    let raw = strip_code_fence(text);
    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|e| GenerationError::InvalidResponse(format!("not JSON: {}", e)))?;

    let value = match value {
        JsonValue::Array(items) => json!({ "quiz": items }),
        other => other,
    };

    let raw: RawQuizDocument = serde_json::from_value(value)
        .map_err(|e| GenerationError::InvalidResponse(format!("unexpected quiz shape: {}", e)))?;

    Ok(QuizDocument::new(raw.questions)?)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}

fn shuffle_options(
    document: QuizDocument,
    rng: &mut impl rand::Rng,
) -> Result<QuizDocument, GenerationError> {
    let mut questions = document.into_questions();
    for q in &mut questions {
        q.options.shuffle(rng);
    }
    Ok(QuizDocument::new(questions)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::DocumentError;
    use rand::SeedableRng;

    fn service(base_url: &str) -> AIService {
        AIService::new(
            Client::new(),
            AiSettings {
                api_key: "test-key".into(),
                base_url: base_url.into(),
                quiz_model: "gemini-1.5-flash".into(),
                resume_model: "gemini-pro".into(),
                generation: GenerationSettings::default(),
                shuffle_options: false,
            },
        )
    }

    const QUIZ_JSON: &str = r#"{"quiz":[{"question":"2+2?","options":["3","4","5","6"],"correct_answer":"4","explanation":"basic math"}]}"#;

    #[test]
    fn parses_plain_object() {
        let doc = parse_quiz_document(QUIZ_JSON).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.questions()[0].correct_answer, "4");
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{}\n```", QUIZ_JSON);
        assert_eq!(parse_quiz_document(&fenced).unwrap().len(), 1);
    }

    #[test]
    fn parses_bare_array() {
        let arr = r#"[{"question":"q","options":["a","b"],"correct_answer":"b","explanation":""}]"#;
        assert_eq!(parse_quiz_document(arr).unwrap().questions()[0].correct_answer, "b");
    }

    #[test]
    fn rejects_non_json_as_invalid_response() {
        assert!(matches!(
            parse_quiz_document("Sure! Here is your quiz."),
            Err(GenerationError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_quiz_document(r#"{"items": []}"#),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn flags_contract_violations() {
        let bad = r#"{"quiz":[{"question":"q","options":["a","b"],"correct_answer":"c","explanation":""}]}"#;
        assert!(matches!(
            parse_quiz_document(bad),
            Err(GenerationError::ContractViolation(
                DocumentError::CorrectAnswerNotAnOption { index: 0, .. }
            ))
        ));
        assert!(matches!(
            parse_quiz_document(r#"{"quiz":[]}"#),
            Err(GenerationError::ContractViolation(DocumentError::Empty))
        ));
    }

    #[test]
    fn shuffling_keeps_correct_answer_valid() {
        let doc = parse_quiz_document(QUIZ_JSON).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let shuffled = shuffle_options(doc, &mut rng).unwrap();
        let q = &shuffled.questions()[0];
        assert!(q.options.contains(&q.correct_answer));
        assert_eq!(q.options.len(), 4);
    }

    #[test]
    fn quiz_payload_carries_settings_and_topic() {
        let payload = service("http://localhost").quiz_payload("Rust lifetimes");
        assert_eq!(payload["generationConfig"]["topK"], 64);
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(payload["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            payload["contents"][0]["parts"][1]["text"],
            "input: Rust lifetimes"
        );
    }

    #[test]
    fn candidate_text_joins_parts_and_reports_blocks() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ab" }, { "text": "cd" }] } }]
        }))
        .unwrap();
        assert_eq!(candidate_text(resp).unwrap(), "abcd");

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(matches!(
            candidate_text(blocked),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn blank_topic_fails_before_any_request() {
        // Nothing listens on port 9; reaching the network would be ServiceUnavailable.
        let svc = service("http://127.0.0.1:9");
        assert!(matches!(
            svc.generate_quiz("   ").await,
            Err(GenerationError::EmptyTopic)
        ));
    }
}
