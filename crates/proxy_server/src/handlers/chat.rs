use actix_web::http::header::{CACHE_CONTROL, CONNECTION};
use actix_web::{web, HttpResponse};
use chat_core::resolve_base_url;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::state::AppState;

fn default_provider() -> String {
    "deepseek".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(rename = "baseUrl", default)]
    pub base_url: Option<String>,
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

/// What the provider receives: the request minus routing and credentials.
#[derive(Debug, Serialize)]
struct UpstreamRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<&'a Value>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

/// `POST /api/chat`: forward to `{base}/chat/completions` and relay the
/// answer, streamed or whole.
pub async fn handler(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let req: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        log::error!("Chat API Error: invalid body: {}", e);
        AppError::from(e)
    })?;

    let api_key = req
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(AppError::MissingApiKey)?;

    let base_url = resolve_base_url(Some(&req.provider), req.base_url.as_deref());
    let url = format!("{}/chat/completions", base_url);
    let upstream_body = UpstreamRequest {
        model: req.model.as_deref(),
        messages: req.messages.as_ref(),
        temperature: req.temperature,
        max_tokens: req.max_tokens,
        stream: req.stream,
    };

    log::info!(
        "Forwarding chat to {} (provider: {}, model: {:?}, stream: {})",
        url,
        req.provider,
        req.model,
        req.stream
    );

    let upstream = state
        .client
        .post(&url)
        .bearer_auth(api_key)
        .json(&upstream_body)
        .send()
        .await
        .map_err(|e| {
            log::error!("Chat API Error: {}", e);
            AppError::from(e)
        })?;

    let status = upstream.status();
    if !status.is_success() {
        let body = upstream.text().await.unwrap_or_default();
        log::error!("LLM API Error: {} {}", status, body);
        return Err(AppError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    if req.stream {
        let stream = upstream
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| AppError::Internal(e.to_string())));

        return Ok(HttpResponse::Ok()
            .content_type("text/event-stream")
            .insert_header((CACHE_CONTROL, "no-cache"))
            .insert_header((CONNECTION, "keep-alive"))
            .streaming(stream));
    }

    let data: Value = upstream.json().await?;
    Ok(HttpResponse::Ok().json(data))
}
