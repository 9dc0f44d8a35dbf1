use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use agendador::config::AppConfig;
use agendador::db;
use agendador::drafts::DraftStore;
use agendador::handlers;
use agendador::services::ai::gemini::GeminiProvider;
use agendador::services::ai::ollama::OllamaProvider;
use agendador::services::ai::LlmProvider;
use agendador::services::calendar::google::GoogleCalendarProvider;
use agendador::services::messaging::twilio::TwilioWhatsAppProvider;
use agendador::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                "llama3.2".to_string(),
            ))
        }
        _ => {
            anyhow::ensure!(
                !config.gemini_api_key.is_empty(),
                "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini"
            );
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Box::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))
        }
    };

    if config.google_calendar_token.is_empty() {
        tracing::warn!("GOOGLE_CALENDAR_TOKEN not set, event creation will fail");
    }
    let calendar = GoogleCalendarProvider::new(
        config.google_calendar_token.clone(),
        config.google_calendar_id.clone(),
    );

    let messaging = TwilioWhatsAppProvider::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_number.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        llm,
        calendar: Box::new(calendar),
        messaging: Box::new(messaging),
        drafts: DraftStore::new(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/whatsapp", post(handlers::webhook::whatsapp_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
