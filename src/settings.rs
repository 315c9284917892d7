//! Planner settings resolution
//!
//! Remote planning is opt-in: it requires both the `use_openai` toggle and a
//! usable API key. The `OPENAI_API_KEY` environment variable takes precedence
//! over any stored key, so a locally exported key always wins.

use crate::llm::DEFAULT_MODEL;
use crate::store::{self, DbPool};

pub const SETTING_USE_OPENAI: &str = "use_openai";
pub const SETTING_OPENAI_API_KEY: &str = "openai_api_key";
pub const SETTING_OPENAI_MODEL: &str = "openai_model";

/// Models the settings UI offers; anything else falls back to the default
pub const SUPPORTED_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-4.1-mini"];

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
  pub use_remote: bool,
  pub api_key: Option<String>,
  pub model: String,
}

impl Default for PlannerSettings {
  fn default() -> Self {
    Self {
      use_remote: false,
      api_key: None,
      model: DEFAULT_MODEL.to_string(),
    }
  }
}

impl PlannerSettings {
  /// Combine stored values with the environment.
  ///
  /// A non-empty `OPENAI_API_KEY` env var overrides the stored key; a blank
  /// one is ignored. Unknown models fall back to the default.
  pub fn resolve(use_remote: bool, stored_key: Option<String>, model: Option<String>) -> Self {
    let env_key = std::env::var("OPENAI_API_KEY")
      .ok()
      .filter(|k| !k.trim().is_empty());
    let api_key = env_key
      .or(stored_key)
      .filter(|k| !k.trim().is_empty());

    let model = model
      .filter(|m| SUPPORTED_MODELS.contains(&m.as_str()))
      .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Self { use_remote, api_key, model }
  }

  /// Load from the app_settings table, layered under the environment
  pub async fn load(pool: &DbPool) -> Result<Self, String> {
    dotenvy::dotenv().ok();

    let use_remote = store::get_setting(pool, SETTING_USE_OPENAI)
      .await?
      .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
      .unwrap_or(false);
    let stored_key = store::get_setting(pool, SETTING_OPENAI_API_KEY).await?;
    let model = store::get_setting(pool, SETTING_OPENAI_MODEL).await?;

    Ok(Self::resolve(use_remote, stored_key, model))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
