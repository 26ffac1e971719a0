//! Adaptive level generation contract
//!
//! The generation service takes the session that just finished and answers
//! with the next level. It is an untrusted source: model output may arrive
//! wrapped in a markdown fence, be malformed, or describe an invalid grid.
//! Everything is validated here before it can reach the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{CompletionStats, LevelData, LevelError};

/// Failures talking to, or decoding answers from, the generation service
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("generation service error: {0}")]
    Service(String),

    #[error("invalid level: {0}")]
    InvalidLevel(#[from] LevelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(String),
}

/// Request body: the session that was just completed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub session_data: CompletionStats,
}

/// Successful response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub level: LevelData,
    /// Identifier of the stored level (opaque)
    #[serde(default)]
    pub level_id: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Remove an optional ```` ```json ```` / ```` ``` ```` fence around `content`
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[start + 3..];
    let body = after_fence.strip_prefix("json").unwrap_or(after_fence);
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}

/// Decode a level from raw model output
pub fn parse_level_content(content: &str) -> Result<LevelData, RemoteError> {
    Ok(LevelData::from_json(strip_code_fence(content))?)
}

/// Decode a service response body, surfacing `{ "error": ... }` as `Service`
pub fn parse_response(body: &str) -> Result<GenerationResponse, RemoteError> {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        return Err(RemoteError::Service(err.error));
    }
    let response: GenerationResponse = serde_json::from_str(body)?;
    response.level.validate()?;
    Ok(response)
}

/// POST the finished session to `endpoint` and decode the next level
#[cfg(target_arch = "wasm32")]
pub async fn fetch_next_level(
    endpoint: &str,
    auth_token: Option<&str>,
    stats: &CompletionStats,
) -> Result<LevelData, RemoteError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    fn js_err(value: JsValue) -> RemoteError {
        RemoteError::Request(format!("{:?}", value))
    }

    let body = serde_json::to_string(&GenerationRequest {
        session_data: *stats,
    })?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(endpoint, &opts).map_err(js_err)?;
    let headers = request.headers();
    headers
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    if let Some(token) = auth_token {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(js_err)?;
    }

    let window = web_sys::window().ok_or_else(|| RemoteError::Request("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();

    log::info!("Generation service responded with HTTP {}", response.status());
    match parse_response(&text) {
        Ok(parsed) => Ok(parsed.level),
        Err(RemoteError::Json(_)) if !response.ok() => Err(RemoteError::Service(format!(
            "HTTP {}",
            response.status()
        ))),
        Err(e) => Err(e),
    }
}
