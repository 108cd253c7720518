//! stride-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under the
//! environment and a `.env` file, constructs the datastore and Gemini clients
//! once, and serves the weekly log API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use stride_core::{store::EntryStore, summarize::Summarizer};
use stride_gemini::GeminiClient;
use stride_server::{ServerConfig, StoreBackend, expand_tilde};
use stride_store_sqlite::SqliteStore;
use stride_store_supabase::SupabaseStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stride weekly log compiler")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Load `.env` first so it can also set RUST_LOG.
  let dotenv = dotenvy::dotenv();

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if let Ok(path) = dotenv {
    tracing::debug!(path = %path.display(), "loaded .env");
  }

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let summarizer =
    GeminiClient::new(server_cfg.gemini()).context("failed to build Gemini client")?;

  match server_cfg.store_backend {
    StoreBackend::Supabase => {
      let store = SupabaseStore::new(server_cfg.supabase()?)
        .context("failed to build Supabase client")?;
      serve(&server_cfg, store, summarizer).await
    }
    StoreBackend::Sqlite => {
      let store_path = expand_tilde(&server_cfg.sqlite_path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      serve(&server_cfg, store, summarizer).await
    }
  }
}

async fn serve<S, G>(server_cfg: &ServerConfig, store: S, summarizer: G) -> anyhow::Result<()>
where
  S: EntryStore + 'static,
  G: Summarizer + 'static,
{
  let app = stride_server::app(server_cfg, Arc::new(store), Arc::new(summarizer));
  let address = server_cfg.address();

  tracing::info!(backend = ?server_cfg.store_backend, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
