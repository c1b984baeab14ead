use burrow_core::UrlKey;
use typed_builder::TypedBuilder;

/// Marker substituted with the short key in speaking-URL templates.
pub const KEY_MARKER: &str = "###TINY_URL_KEY###";

/// Deployment-wide configuration for short-URL formatting.
#[derive(Debug, Clone, TypedBuilder)]
pub struct FormatConfig {
    /// Base URL of the site serving the redirect endpoint.
    #[builder(setter(into))]
    pub site_base_url: String,
    /// Query parameter carrying the key in direct mode.
    #[builder(default = String::from("key"), setter(into))]
    pub redirect_param_name: String,
    /// Render speaking URLs instead of query-string redirects.
    #[builder(default)]
    pub create_speaking_urls: bool,
    /// Template for speaking URLs, with `###`-delimited markers.
    #[builder(default, setter(into))]
    pub speaking_url_template: String,
}

/// Request-scoped environment values available to speaking-URL templates.
///
/// Each field backs one `###NAME###` marker. Unset fields substitute as the
/// empty string; markers outside this set pass through untouched.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct RequestEnv {
    #[builder(default, setter(into, strip_option))]
    pub host: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub request_uri: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub script_name: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub path_info: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub query_string: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub referer: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub remote_addr: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub user_agent: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub accept_language: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub site_url: Option<String>,
}

impl RequestEnv {
    /// The enumerated marker set, in template order of no significance.
    fn markers(&self) -> [(&'static str, Option<&str>); 10] {
        [
            ("HTTP_HOST", self.host.as_deref()),
            ("REQUEST_URI", self.request_uri.as_deref()),
            ("SCRIPT_NAME", self.script_name.as_deref()),
            ("PATH_INFO", self.path_info.as_deref()),
            ("QUERY_STRING", self.query_string.as_deref()),
            ("HTTP_REFERER", self.referer.as_deref()),
            ("REMOTE_ADDR", self.remote_addr.as_deref()),
            ("HTTP_USER_AGENT", self.user_agent.as_deref()),
            ("HTTP_ACCEPT_LANGUAGE", self.accept_language.as_deref()),
            ("SITE_URL", self.site_url.as_deref()),
        ]
    }
}

/// Formats outward-facing short URLs. Pure; no store access.
#[derive(Debug, Clone)]
pub struct UrlFormatter {
    config: FormatConfig,
}

impl UrlFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Renders the short URL for a key in the configured output mode.
    pub fn short_url(&self, key: &UrlKey, env: &RequestEnv) -> String {
        if self.config.create_speaking_urls {
            self.speaking_url(key, env)
        } else {
            format!(
                "{}?{}={}",
                self.config.site_base_url, self.config.redirect_param_name, key
            )
        }
    }

    fn speaking_url(&self, key: &UrlKey, env: &RequestEnv) -> String {
        let mut url = self.config.speaking_url_template.clone();

        for (name, value) in env.markers() {
            let marker = format!("###{name}###");
            if url.contains(&marker) {
                url = url.replace(&marker, value.unwrap_or(""));
            }
        }

        url.replace(KEY_MARKER, key.as_str())
    }
}
