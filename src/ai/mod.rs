use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, Deserialize};

use crate::error::ApiError;
use crate::models::{AnalyzeRequest, Provider};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 2000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the upstream model providers. Cheap to clone; the inner
/// reqwest client is reference-counted.
#[derive(Clone)]
pub struct AiClient {
    http: Client,
    gemini_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

impl AiClient {
    pub(crate) fn new(gemini_api_key: Option<String>, anthropic_api_key: Option<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        AiClient { http, gemini_api_key, anthropic_api_key }
    }

    /// Reads provider API keys from the environment. A missing key is not
    /// fatal at startup; requests for that provider fail instead.
    pub fn from_env() -> Self {
        AiClient::new(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("ANTHROPIC_API_KEY").ok(),
        )
    }

    /// Forward a prompt to the chosen provider and return the completion text.
    pub async fn generate(&self, provider: Provider, prompt: &str) -> Result<String, ApiError> {
        match provider {
            Provider::Gemini => self.generate_gemini(prompt).await,
            Provider::Anthropic => self.generate_anthropic(prompt).await,
        }
    }

    async fn generate_gemini(&self, prompt: &str) -> Result<String, ApiError> {
        let api_key = self
            .gemini_api_key
            .as_deref()
            .ok_or(ApiError::MissingApiKey("Gemini"))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, GEMINI_MODEL, api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
        };

        tracing::debug!(model = GEMINI_MODEL, prompt_len = prompt.len(), "Calling Gemini API");

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = upstream_message(&response.text().await.unwrap_or_default());
            tracing::error!(%status, "Gemini API error: {}", message);
            return Err(ApiError::Upstream(format!("Gemini {}: {}", status, message)));
        }

        let body: GeminiResponse = response.json().await?;
        gemini_text(&body).ok_or(ApiError::EmptyCompletion)
    }

    async fn generate_anthropic(&self, prompt: &str) -> Result<String, ApiError> {
        let api_key = self
            .anthropic_api_key
            .as_deref()
            .ok_or(ApiError::MissingApiKey("Anthropic"))?;

        let request = AnthropicRequest {
            model: ANTHROPIC_MODEL.to_string(),
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::debug!(model = ANTHROPIC_MODEL, prompt_len = prompt.len(), "Calling Anthropic API");

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = upstream_message(&response.text().await.unwrap_or_default());
            tracing::error!(%status, "Anthropic API error: {}", message);
            return Err(ApiError::Upstream(format!("Anthropic {}: {}", status, message)));
        }

        let body: AnthropicResponse = response.json().await?;
        anthropic_text(&body).ok_or(ApiError::EmptyCompletion)
    }
}

/// The instruction that will accompany the play image once the vision model
/// call is wired up. Calibration hints that the client did not supply are
/// spelled out as "unknown" rather than defaulted to zero.
pub fn analysis_prompt(req: &AnalyzeRequest) -> String {
    let cal = req.calibrated.as_ref();
    let los_y = fmt_hint(cal.and_then(|c| c.los_y));
    let yard_scale = fmt_hint(cal.and_then(|c| c.yard_scale));

    let perspective = req
        .perspective
        .as_ref()
        .map(|p| serde_json::to_string(&p.p).unwrap_or_else(|_| "[]".to_string()))
        .unwrap_or_else(|| "[]".to_string());

    format!(
        "Identify positions (QB, RB, WR, TE, OL, CB, S, LB) and any route arrows.\n\
         Return JSON tokens:[{{id,label,role,x,y}}] and routes:[{{tokenId,type,points:[{{x,y}}]}}].\n\
         Line of scrimmage y: {los_y}; pixels per yard: {yard_scale}.\n\
         Field perspective points: {perspective}"
    )
}

fn fmt_hint(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}

// Pull a human-readable message out of an upstream error body. Gemini and
// Anthropic nest it as {"error": {"message": "..."}}; Resend puts it at the
// top level as {"message": "..."}.
pub(crate) fn upstream_message(body: &str) -> String {
    serde_json::from_str::<UpstreamErrorBody>(body)
        .ok()
        .and_then(|b| b.error.map(|e| e.message).or(b.message))
        .unwrap_or_else(|| body.to_string())
}

fn gemini_text(body: &GeminiResponse) -> Option<String> {
    body.candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .filter(|t| !t.is_empty())
}

fn anthropic_text(body: &AnthropicResponse) -> Option<String> {
    body.content
        .first()
        .map(|b| b.text.clone())
        .filter(|t| !t.is_empty())
}

// Gemini wire format

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

// Anthropic wire format

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}
