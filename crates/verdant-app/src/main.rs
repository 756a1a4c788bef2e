mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use verdant_ai::{knowledge, prompt, GeminiClient, GeminiConfig, SessionRegistry};
use verdant_common::VerdantError;
use verdant_config::{Credentials, VerdantConfig};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let candidates = [
        // Workspace root when run via `cargo run`
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".env"),
        // Current directory
        PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    load_dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("verdant=info".parse().expect("static directive parses")),
        )
        .init();

    tracing::info!("Verdant v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
    tracing::info!("shutdown complete");
}

async fn run() -> Result<(), VerdantError> {
    let config_path = std::env::var("VERDANT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("verdant.toml"));
    let config: VerdantConfig = verdant_config::load(&config_path)?;

    // Missing credential is fatal: refuse to serve the UI without model access
    let credentials = Credentials::from_env().inspect_err(|_| {
        tracing::error!("set GEMINI_API_KEY in the environment or a .env file");
    })?;

    // Knowledge text and system instruction are built once and shared
    // read-only across every session for the process lifetime.
    let knowledge_text = knowledge::load(&config.knowledge.path);
    let instruction: Arc<str> = Arc::from(prompt::compose(&knowledge_text));

    let client = GeminiClient::new(
        GeminiConfig::new(credentials.api_key)
            .with_model(&config.model.model)
            .with_max_tokens(config.model.max_tokens)
            .with_temperature(config.model.temperature)
            .with_search(config.model.enable_search),
    );

    let app_state = Arc::new(state::AppState::new(
        instruction,
        Arc::new(client),
        Arc::new(SessionRegistry::new()),
    ));

    let app = routes::router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;

    tracing::info!(
        model = %config.model.model,
        search = config.model.enable_search,
        "listening on http://{}",
        config.server.bind_addr
    );

    axum::serve(listener, app).await?;
    Ok(())
}
