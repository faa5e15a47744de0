use std::sync::Arc;

use textures_openai::OpenAiApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: textures_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// OpenAI client; `None` when no API key is configured.
    pub openai: Option<Arc<OpenAiApi>>,
    /// Structure constraints appended to every generation prompt.
    pub structure_prompt: Arc<String>,
}
