//! REST API client for the OpenAI image-generation endpoint.
//!
//! Wraps `POST /v1/images/generations` and the follow-up download of the
//! produced image using [`reqwest`].

use serde::Deserialize;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "dall-e-3";
/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// HTTP client for the OpenAI images API.
pub struct OpenAiApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

/// Response returned by the images endpoint.
#[derive(Debug, Deserialize)]
struct GenerationsResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

/// Errors from the OpenAI REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("OpenAI API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API reported success but returned no image.
    #[error("OpenAI API returned an empty image list")]
    EmptyResponse,
}

impl OpenAiApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://api.openai.com`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Generate a single image for a prompt, returning its hosted URL.
    ///
    /// The prompt must already be cleaned of tracking tags; the URL is
    /// short-lived and should be downloaded promptly.
    pub async fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> Result<String, OpenAiApiError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": size,
            "quality": quality,
            "n": 1,
            "response_format": "url",
        });

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerationsResponse = Self::parse_response(response).await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or(OpenAiApiError::EmptyResponse)
    }

    /// Download a generated image from its hosted URL.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, OpenAiApiError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`OpenAiApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OpenAiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAiApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAiApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
