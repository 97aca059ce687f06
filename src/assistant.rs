//! # Deal Assistant Module
//!
//! Free-text shopping questions ("which pack is cheaper per kilo?")
//! answered by Google's Generative Language API. The assistant never fails
//! loudly: a missing key or a broken request becomes a localized message.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::AssistantConfig;
use crate::errors::AssistantError;
use crate::localization::{detect_language, t_lang};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Language name the model is asked to answer in
fn answer_language(language: &str) -> &'static str {
    match language {
        "uk" => "Ukrainian",
        "ru" => "Russian",
        _ => "English",
    }
}

/// Prompt sent to the model for one user question
pub fn build_prompt(query: &str, currency: &str, language_code: Option<&str>) -> String {
    format!(
        "You are a helpful shopping assistant calculator.\n\
         The user will ask a question about shopping, prices, or comparing deals.\n\
         The currency is {currency}.\n\n\
         User Query: \"{query}\"\n\n\
         Please provide a concise analysis.\n\
         1. If it's a comparison, do the math step-by-step but keep it brief.\n\
         2. State clearly which option is better.\n\
         3. Answer in plain text. Do not use Markdown, asterisks or HTML tags.\n\
         4. Answer in {} language.",
        answer_language(detect_language(language_code))
    )
}

fn extract_text(response: GenerateResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .map(|p| p.text)
        .collect();
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub struct DealAssistant {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl DealAssistant {
    pub fn new(config: AssistantConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Ask the model, surfacing failures as [`AssistantError`]
    pub async fn try_analyze(
        &self,
        query: &str,
        currency: &str,
        language_code: Option<&str>,
    ) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;

        let prompt = build_prompt(query, currency, language_code);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let url = format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );
        debug!(model = %self.config.model, query_length = query.len(), "Sending assistant request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        extract_text(body).ok_or(AssistantError::EmptyResponse)
    }

    /// Ask the model; every failure becomes a localized message
    pub async fn analyze(&self, query: &str, currency: &str, language_code: Option<&str>) -> String {
        match self.try_analyze(query, currency, language_code).await {
            Ok(answer) => {
                info!(answer_length = answer.len(), "Assistant answered");
                answer
            }
            Err(AssistantError::MissingApiKey) => t_lang("assistant-no-key", language_code),
            Err(AssistantError::EmptyResponse) => t_lang("assistant-empty", language_code),
            Err(e) => {
                error!(error = %e, "Assistant request failed");
                t_lang("assistant-failed", language_code)
            }
        }
    }
}
