/// API request handlers
///
/// Two request flows live here. The art endpoint always answers 200 with
/// the same response shape; hidden authentication failures of any kind
/// degrade silently to an unauthenticated art response. The encrypted
/// channel endpoint is the only place that surfaces terminal failures.

use super::responses::*;
use artcanvas_common::types::ArtParameters;
use artcanvas_common::ServiceConfig;
use artcanvas_core::{art, favicon, stego, subscribe, template};
use artcanvas_core::{run_subscription_pipeline, EnvelopeCodec, FaviconResult, TemplateStore};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub codec: Arc<EnvelopeCodec>,
    pub templates: Arc<TemplateStore>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServiceConfig, templates: TemplateStore) -> Self {
        let codec = EnvelopeCodec::new(config.secret.clone());
        Self {
            config: Arc::new(config),
            codec: Arc::new(codec),
            templates: Arc::new(templates),
            client: reqwest::Client::new(),
        }
    }
}

/// Query parameters for the encrypted channel endpoint
#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub seed: Option<String>,
}

/// Handler for POST /api/generate
///
/// Always answers 200. The body is read defensively: a missing or
/// non-JSON body simply renders default art.
pub async fn generate_art(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Json<ArtGenerationResponse> {
    debug!("API: POST /api/generate");

    let raw = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let params = stego::normalize_art_params(&raw);
    let validation = stego::validate_art_params(&params);

    let mut authenticated = false;
    let mut favicon_data = None;
    let mut config_data = None;

    if validation.is_valid {
        match build_hidden_payload(&state, &params).await {
            Ok(Some((favicon, config))) => {
                authenticated = true;
                favicon_data = Some(favicon);
                config_data = Some(config);
            }
            // Wrong or missing credentials: plain unauthenticated art
            Ok(None) => {}
            // Internal failures must not be distinguishable either
            Err(e) => warn!("hidden payload assembly failed: {e}"),
        }
    }

    let art_data = art::generate_base_art(&params);

    Json(ArtGenerationResponse {
        art_data,
        authenticated,
        favicon_data,
        config_data,
        metadata: ArtMetadata {
            style: params.style.clone().unwrap_or_else(|| "geometric".to_string()),
            complexity: params
                .complexity
                .clone()
                .unwrap_or_else(|| "medium".to_string()),
            auth_status: authenticated,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            validation_errors: (!validation.errors.is_empty()).then_some(validation.errors),
        },
    })
}

/// Run the hidden side of an art request.
///
/// `Ok(None)` is the silent no-match outcome; `Err` is an internal
/// failure the caller also swallows.
async fn build_hidden_payload(
    state: &AppState,
    params: &ArtParameters,
) -> anyhow::Result<Option<(FaviconData, ConfigData)>> {
    let auth = stego::extract_hidden_auth(params);

    let secret = match state.config.secret.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };
    if auth.password.as_deref() != Some(secret) {
        return Ok(None);
    }

    let urls: Vec<String> = auth.subscription_url.iter().cloned().collect();
    let output = run_subscription_pipeline(&state.client, &urls, &state.config.resolver_tag).await;

    let merged =
        template::merge_into_template(state.templates.get_base_template(), output.outbounds)?;

    let favicon = match auth.subscription_url.as_deref() {
        Some(url) => favicon::fetch_favicon(&state.client, url).await,
        None => FaviconResult::fallback(),
    };

    let favicon_data = FaviconData {
        favicon_base64: favicon.favicon_base64.clone(),
        mime_type: favicon.mime_type.clone(),
        encoded: favicon::encode_favicon_for_art(&favicon),
        is_default: favicon.is_default.then_some(true),
    };

    let config_data = ConfigData {
        singbox: merged,
        clash: output.raw_documents.into_iter().next(),
    };

    Ok(Some((favicon_data, config_data)))
}

/// Handler for GET /api/process — the encrypted configuration channel.
///
/// Missing seed is the caller's fault (400); everything else that goes
/// wrong is answered with a 500 so the transport itself never fails.
pub async fn process_channel(
    State(state): State<AppState>,
    Query(query): Query<SeedQuery>,
) -> Result<Response, AppError> {
    debug!("API: GET /api/process");

    let Some(seed) = query.seed else {
        return Ok((StatusCode::BAD_REQUEST, "No seed provided").into_response());
    };

    let params = state
        .codec
        .decrypt(&seed)
        .map_err(|e| AppError::internal(e.to_string()))?;

    // Non-object payloads pass straight through as plain text
    if !params.is_object() {
        let text = match params {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Ok((StatusCode::OK, text).into_response());
    }

    // Best effort: when the sources cannot be worked with, the decrypted
    // parameters themselves become the payload.
    let payload = match translate_sources(&state, &params).await {
        Some(outbounds) => outbounds,
        None => params,
    };

    let envelope = state
        .codec
        .encrypt(&payload)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok((StatusCode::OK, envelope).into_response())
}

async fn translate_sources(state: &AppState, params: &Value) -> Option<Value> {
    let urls = match subscribe::params_to_urls(params) {
        Ok(urls) => urls,
        Err(reason) => {
            warn!(%reason, "request carried unusable urls field");
            return None;
        }
    };

    let output = run_subscription_pipeline(&state.client, &urls, &state.config.resolver_tag).await;
    serde_json::to_value(&output.outbounds).ok()
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    debug!("API: GET /health");
    (StatusCode::OK, "OK")
}

/// Application error type
pub struct AppError {
    message: String,
    status_code: StatusCode,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API Error: {}", self.message);
        (self.status_code, self.message).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err.to_string())
    }
}
