use crate::error::Result;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Redirect;
use burrow_core::{Resolver, TinyUrlError, UrlKey};
use std::collections::HashMap;

/// Redirect endpoint: resolves the key carried by the configured query
/// parameter and issues a temporary redirect to the target URL.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect> {
    let param = &state.formatter.config().redirect_param_name;

    // A missing or empty key parameter is indistinguishable from an unknown
    // key for the caller: 404 either way.
    let raw = params.get(param).map(String::as_str).unwrap_or("");
    if raw.is_empty() {
        return Err(TinyUrlError::NotFound(raw.to_string()).into());
    }

    let key = UrlKey::new_unchecked(raw);
    let target_url = state.resolver.resolve(&key).await?;

    Ok(Redirect::temporary(&target_url))
}
