// Tutoring assistant
//
// Sends the student's question together with the initial conditions of the
// plotted motion to an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AssistantSettings;
use crate::error::CommunicationError;
use crate::motion_parameters::MotionParameters;

const SYSTEM_PROMPT: &str = "You are a clear and patient physics tutor.";

/// A question about a specific motion.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantRequest {
    pub initial_velocity: f64,
    pub acceleration: f64,
    pub max_time: f64,
    pub question: String,
}

impl AssistantRequest {
    pub fn new(params: &MotionParameters, question: impl Into<String>) -> Self {
        Self {
            initial_velocity: params.initial_velocity,
            acceleration: params.acceleration,
            max_time: params.max_time,
            question: question.into(),
        }
    }
}

/// Anything that can answer a question about a motion.
pub trait Assistant {
    fn ask(&self, request: &AssistantRequest) -> Result<String, CommunicationError>;
}

// ============================================================================
// OpenAI API types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Blocking chat-completions client.
pub struct OpenAiAssistant {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiAssistant {
    /// Creates a client. A missing key is only reported when a question is asked,
    /// so that charts keep working without one.
    pub fn new(settings: &AssistantSettings, api_key: Option<String>) -> Result<Self, CommunicationError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("mrua/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CommunicationError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key,
        })
    }
}

impl Assistant for OpenAiAssistant {
    fn ask(&self, request: &AssistantRequest) -> Result<String, CommunicationError> {
        let api_key = self.api_key.as_ref().ok_or(CommunicationError::MissingKey)?;
        let user_prompt = build_user_prompt(request);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        log::debug!("asking {} ({})", self.endpoint, self.model);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| CommunicationError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| CommunicationError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(api_error(status, &text));
        }
        parse_response(&text)
    }
}

/// Builds the user message for a request.
pub fn build_user_prompt(request: &AssistantRequest) -> String {
    format!(
        "You are analysing a uniformly accelerated motion with v0 = {} m/s, a = {} m/s² \
         and maximum time {} s.\n\
         The student asks or interprets: \"{}\".\n\
         Give a clear answer suited to a first-year university student.",
        request.initial_velocity,
        request.acceleration,
        request.max_time,
        request.question.trim()
    )
}

/// Extracts the answer text from a chat-completions response body.
pub fn parse_response(body: &str) -> Result<String, CommunicationError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CommunicationError::Parse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(CommunicationError::EmptyResponse);
    }
    Ok(content)
}

/// Maps a non-success response to an error, using the API message when present.
fn api_error(status: u16, body: &str) -> CommunicationError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    CommunicationError::Api { status, message }
}
