use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub target_url: String,
    #[serde(default)]
    pub url_key: Option<String>,
    #[serde(default)]
    pub delete_on_use: bool,
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub key: String,
    pub short_url: String,
    pub target_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
