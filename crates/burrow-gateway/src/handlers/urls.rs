use crate::error::Result;
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Json;
use burrow_core::{ShortenOptions, Shortener};
use burrow_service::RequestEnv;

/// Creates (or reuses) a mapping and returns the formatted short URL.
pub async fn create_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let options = ShortenOptions::builder()
        .delete_on_use(request.delete_on_use)
        .valid_until(request.valid_until)
        .url_key(request.url_key)
        .build();

    let key = state
        .shortener
        .shorten(&request.target_url, &options)
        .await?;

    let env = request_env(&headers, &uri, &state.formatter.config().site_base_url);
    let short_url = state.formatter.short_url(&key, &env);

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            key: key.to_string(),
            short_url,
            target_url: request.target_url,
        }),
    ))
}

fn request_env(headers: &HeaderMap, uri: &Uri, site_base_url: &str) -> RequestEnv {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    RequestEnv {
        host: header("host"),
        request_uri: Some(uri.to_string()),
        script_name: None,
        path_info: Some(uri.path().to_string()),
        query_string: uri.query().map(str::to_owned),
        referer: header("referer"),
        remote_addr: None,
        user_agent: header("user-agent"),
        accept_language: header("accept-language"),
        site_url: Some(site_base_url.to_string()),
    }
}
