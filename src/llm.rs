//! LLM integration for weekly plan generation
//!
//! This module handles communication with the OpenAI API for generating
//! a week of workout suggestions. It is best-effort: callers are expected
//! to fall back to the heuristic planner when anything here fails.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{PlanConstraints, PlanUsage, WorkoutRecord, WorkoutSuggestion};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f64 = 0.7;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Only the most recent history entries are sent to keep token usage down.
const MAX_RECENT_WORKOUTS: usize = 25;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Pricing
/// ---------------------------------------------------------------------------

/// Rough/adjustable pricing in USD per 1M tokens (input, output).
fn model_pricing(model: &str) -> Option<(f64, f64)> {
  match model.to_lowercase().as_str() {
    "gpt-4o-mini" => Some((0.15, 0.60)),
    "gpt-4.1-mini" => Some((0.30, 1.20)),
    _ => None,
  }
}

/// Estimate the cost of a call; None when the model is unknown or token
/// counts are missing.
pub fn estimate_cost(
  model: &str,
  prompt_tokens: Option<u32>,
  completion_tokens: Option<u32>,
) -> Option<f64> {
  let (input, output) = model_pricing(model)?;
  let prompt = prompt_tokens? as f64;
  let completion = completion_tokens? as f64;
  Some((prompt * input + completion * output) / 1_000_000.0)
}

/// ---------------------------------------------------------------------------
/// OpenAI API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
  model: String,
  temperature: f64,
  messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
  usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
  pub prompt_tokens: Option<u32>,
  pub completion_tokens: Option<u32>,
  pub total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
  error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
  message: String,
}

/// One entry of the compact history sent with the prompt.
#[derive(Debug, Serialize)]
struct CompactWorkout {
  date: String,
  #[serde(rename = "type")]
  workout_type: String,
  planned_distance: Option<f64>,
  completed: bool,
  actual_distance: Option<f64>,
  actual_time_seconds: Option<i64>,
  rpe: Option<i64>,
}

/// One item of the expected JSON array response.
#[derive(Debug, Deserialize)]
struct SuggestionItem {
  date: Option<String>,
  workout_type: Option<String>,
  #[serde(default)]
  planned_distance: Option<f64>,
  #[serde(default)]
  planned_intensity: Option<String>,
  #[serde(default)]
  description: Option<String>,
}

/// ---------------------------------------------------------------------------
/// OpenAI Client
/// ---------------------------------------------------------------------------

pub struct OpenAiClient {
  client: Client,
  api_key: String,
  model: String,
  api_url: String,
}

impl OpenAiClient {
  pub fn new(api_key: String, model: String) -> Self {
    Self {
      client: Client::new(),
      api_key,
      model,
      api_url: OPENAI_API_URL.to_string(),
    }
  }

  /// Create a client with the API key from the environment
  pub fn from_env() -> Result<Self, LlmError> {
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| LlmError::MissingApiKey)?;
    Ok(Self::new(api_key, DEFAULT_MODEL.to_string()))
  }

  /// Override the API endpoint (self-hosted gateways, tests)
  pub fn with_api_url(mut self, api_url: String) -> Self {
    self.api_url = api_url;
    self
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Call the chat completions endpoint with a system prompt and user message
  pub async fn complete(
    &self,
    system_prompt: &str,
    user_message: &str,
  ) -> Result<(String, Option<ChatUsage>), LlmError> {
    let request = ChatRequest {
      model: self.model.clone(),
      temperature: TEMPERATURE,
      messages: vec![
        ChatMessage {
          role: "system".to_string(),
          content: system_prompt.to_string(),
        },
        ChatMessage {
          role: "user".to_string(),
          content: user_message.to_string(),
        },
      ],
    };

    let response = self
      .client
      .post(&self.api_url)
      .header("authorization", format!("Bearer {}", self.api_key))
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      // Try to parse error response
      if let Ok(error_resp) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let chat_response: ChatResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = chat_response
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .ok_or_else(|| LlmError::Parse("No message content in response".to_string()))?;

    Ok((text, chat_response.usage))
  }

  /// Ask the model for one week of workout suggestions.
  ///
  /// The response is reordered to match `week_dates` exactly; any date the
  /// model omitted comes back as a rest day.
  pub async fn plan_week(
    &self,
    ctx: &PlanConstraints,
    week_dates: &[String],
    recent: &[WorkoutRecord],
  ) -> Result<(Vec<WorkoutSuggestion>, PlanUsage), LlmError> {
    let system_prompt = include_str!("prompts/planner_system.txt");

    let compact: Vec<CompactWorkout> = recent
      .iter()
      .rev()
      .take(MAX_RECENT_WORKOUTS)
      .rev()
      .map(|r| CompactWorkout {
        date: r.date.to_string(),
        workout_type: r.workout_type.to_string(),
        planned_distance: r.planned_distance,
        completed: r.completed,
        actual_distance: r.actual_distance,
        actual_time_seconds: r.actual_time_seconds,
        rpe: r.actual_rpe,
      })
      .collect();

    let user_message = serde_json::json!({
      "context": ctx,
      "week_dates": week_dates,
      "recent_workouts": compact,
    })
    .to_string();

    let (response_text, usage) = self.complete(system_prompt, &user_message).await?;

    let json_str = extract_json(&response_text)?;
    let items: Vec<SuggestionItem> =
      serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(format!("{}: {}", e, json_str)))?;

    let mut by_date: HashMap<String, WorkoutSuggestion> = HashMap::new();
    for item in items {
      let Some(date) = item.date else { continue };
      let workout_type = item
        .workout_type
        .as_deref()
        .unwrap_or("easy")
        .parse()
        .unwrap_or_default();
      by_date.insert(
        date.clone(),
        WorkoutSuggestion {
          date,
          workout_type,
          planned_distance: item.planned_distance,
          planned_intensity: item.planned_intensity,
          description: item.description,
        },
      );
    }

    // Preserve the order of the incoming week_dates; fill gaps with rest
    let ordered: Vec<WorkoutSuggestion> = week_dates
      .iter()
      .map(|d| by_date.remove(d).unwrap_or_else(|| WorkoutSuggestion::rest(d)))
      .collect();

    let (prompt_tokens, completion_tokens, total_tokens) = match usage {
      Some(u) => (u.prompt_tokens, u.completion_tokens, u.total_tokens),
      None => (None, None, None),
    };

    Ok((
      ordered,
      PlanUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens,
        estimated_cost_usd: estimate_cost(&self.model, prompt_tokens, completion_tokens),
        model: self.model.clone(),
      },
    ))
  }
}

/// Extract JSON from a model response (handles markdown code blocks)
fn extract_json(text: &str) -> Result<String, LlmError> {
  // Try direct parse first
  let trimmed = text.trim();
  if trimmed.starts_with('[') || trimmed.starts_with('{') {
    return Ok(trimmed.to_string());
  }

  // Look for JSON in code blocks
  if let Some(start) = text.find("```json") {
    let start = start + 7;
    if let Some(end) = text[start..].find("```") {
      return Ok(text[start..start + end].trim().to_string());
    }
  }

  // Look for plain code blocks
  if let Some(start) = text.find("```") {
    let start = start + 3;
    // Skip language identifier if present
    let content_start = text[start..]
      .find('\n')
      .map(|i| start + i + 1)
      .unwrap_or(start);
    if let Some(end) = text[content_start..].find("```") {
      return Ok(text[content_start..content_start + end].trim().to_string());
    }
  }

  // Last resort: first bracket to last bracket
  if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
    if start < end {
      return Ok(text[start..=end].to_string());
    }
  }
  if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
    return Ok(text[start..=end].to_string());
  }

  Err(LlmError::Parse("Could not extract JSON from response".to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
