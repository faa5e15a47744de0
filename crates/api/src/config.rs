use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`; generation
    /// requests wait on the image API).
    pub request_timeout_secs: u64,
    /// Directory where generated images are stored and served from.
    pub images_dir: PathBuf,
    /// Optional file overriding the built-in structure prompt.
    pub structure_prompt_path: Option<PathBuf>,
    /// OpenAI API key. When unset, generation endpoints return 503.
    pub openai_api_key: Option<String>,
    /// OpenAI image model (default: `dall-e-3`).
    pub openai_model: String,
    /// OpenAI API base URL (default: `https://api.openai.com`).
    pub openai_api_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `HOST`                  | `0.0.0.0`                 |
    /// | `PORT`                  | `3000`                    |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`  | `120`                     |
    /// | `IMAGES_DIR`            | `./generated_images`      |
    /// | `STRUCTURE_PROMPT_PATH` | unset                     |
    /// | `OPENAI_API_KEY`        | unset                     |
    /// | `OPENAI_MODEL`          | `dall-e-3`                |
    /// | `OPENAI_API_URL`        | `https://api.openai.com`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let images_dir = std::env::var("IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./generated_images"));

        let structure_prompt_path = std::env::var("STRUCTURE_PROMPT_PATH")
            .ok()
            .map(PathBuf::from);

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| textures_openai::api::DEFAULT_MODEL.into());

        let openai_api_url = std::env::var("OPENAI_API_URL")
            .unwrap_or_else(|_| textures_openai::api::DEFAULT_API_URL.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            images_dir,
            structure_prompt_path,
            openai_api_key,
            openai_model,
            openai_api_url,
        }
    }
}
