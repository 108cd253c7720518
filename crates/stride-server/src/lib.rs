//! Server wiring for Stride: configuration, client construction and the
//! HTTP middleware stack around [`stride_api::api_router`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, http::HeaderValue};
use config::{Config, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use serde::Deserialize;
use stride_api::{ApiState, api_router};
use stride_core::{store::EntryStore, summarize::Summarizer};
use stride_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use stride_store_supabase::SupabaseConfig;
use thiserror::Error;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Local development origins of the web client.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] =
  ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Which datastore holds entries and compiled logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  Supabase,
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub allowed_origins:      Vec<String>,
  pub gemini_api_key:       String,
  pub gemini_model:         String,
  pub gemini_base_url:      String,
  pub store_backend:        StoreBackend,
  pub supabase_url:         Option<String>,
  pub supabase_service_key: Option<String>,
  pub sqlite_path:          PathBuf,
}

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("{0} must be set when store_backend = \"supabase\"")]
  MissingSupabase(&'static str),

  #[error("gemini_api_key must not be empty")]
  MissingGeminiKey,
}

impl ServerConfig {
  /// Load from an optional TOML file overlaid with environment variables.
  ///
  /// Environment keys are unprefixed (`GEMINI_API_KEY`, `SUPABASE_URL`, ...);
  /// `ALLOWED_ORIGINS` is comma-separated.
  pub fn load(file: &Path) -> Result<Self, SettingsError> {
    let builder = with_defaults(Config::builder())?
      .add_source(config::File::from(file).required(false))
      .add_source(
        Environment::default()
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("allowed_origins"),
      );
    Self::from_builder(builder)
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
    let cfg: Self = builder.build()?.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> Result<(), SettingsError> {
    if self.gemini_api_key.trim().is_empty() {
      return Err(SettingsError::MissingGeminiKey);
    }
    if self.store_backend == StoreBackend::Supabase {
      self.supabase()?;
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn gemini(&self) -> GeminiConfig {
    GeminiConfig {
      api_key:  self.gemini_api_key.clone(),
      model:    self.gemini_model.clone(),
      base_url: self.gemini_base_url.clone(),
    }
  }

  pub fn supabase(&self) -> Result<SupabaseConfig, SettingsError> {
    let url = non_empty(&self.supabase_url).ok_or(SettingsError::MissingSupabase("supabase_url"))?;
    let service_key = non_empty(&self.supabase_service_key)
      .ok_or(SettingsError::MissingSupabase("supabase_service_key"))?;
    Ok(SupabaseConfig {
      url:         url.to_owned(),
      service_key: service_key.to_owned(),
    })
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn with_defaults(
  builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  builder
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000)?
    .set_default("allowed_origins", DEFAULT_ALLOWED_ORIGINS.to_vec())?
    .set_default("gemini_model", DEFAULT_MODEL)?
    .set_default("gemini_base_url", DEFAULT_BASE_URL)?
    .set_default("store_backend", "supabase")?
    .set_default("sqlite_path", "stride.db")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// CORS restricted to `origins`; wildcards and unparsable origins are skipped
/// with a warning, since credentials are allowed.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match o.parse::<HeaderValue>() {
      Ok(v) if o != "*" => Some(v),
      _ => {
        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods(AllowMethods::mirror_request())
    .allow_headers(AllowHeaders::mirror_request())
    .allow_credentials(true)
}

/// The complete application: API routes plus CORS and request tracing.
pub fn app<S, G>(config: &ServerConfig, store: Arc<S>, summarizer: Arc<G>) -> Router
where
  S: EntryStore + 'static,
  G: Summarizer + 'static,
{
  api_router(ApiState::new(store, summarizer))
    .layer(cors_layer(&config.allowed_origins))
    .layer(TraceLayer::new_for_http())
}
