//! Request and response bodies of the `generateContent` method.

use serde::{Deserialize, Serialize};
use stride_core::summarize::Generation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
  pub contents:          Vec<Content>,
  pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:  Option<String>,
  #[serde(default)]
  pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  pub temperature:       f32,
  pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
  #[serde(default)]
  pub candidates:      Vec<Candidate>,
  /// Kept as raw JSON; it is only ever echoed back as feedback.
  #[serde(default)]
  pub prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  #[serde(default)]
  pub content:       Option<Content>,
  #[serde(default)]
  pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
  /// Concatenated text of the first candidate, or `Blocked` when there is none.
  pub fn into_generation(self) -> Generation {
    let first = self.candidates.into_iter().next();
    let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());

    let texts: Vec<String> = first
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
      .unwrap_or_default();

    if texts.is_empty() {
      return Generation::Blocked {
        feedback: describe_feedback(self.prompt_feedback.as_ref(), finish_reason.as_deref()),
      };
    }
    Generation::Text(texts.concat())
  }
}

fn describe_feedback(
  prompt_feedback: Option<&serde_json::Value>,
  finish_reason: Option<&str>,
) -> String {
  match (prompt_feedback, finish_reason) {
    (Some(feedback), _) => feedback.to_string(),
    (None, Some(reason)) => format!("finish_reason: {reason}"),
    (None, None) => "no feedback provided".to_owned(),
  }
}
