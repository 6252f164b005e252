//! Runtime settings resolved once at startup.

use api::ApiClient;

/// Environment variable consulted by desktop builds.
pub const API_ENV_VAR: &str = "FEEDBACK_RADAR_API";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub api_base_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl AppSettings {
    /// Web builds talk to the origin that served them; desktop builds read
    /// `FEEDBACK_RADAR_API`.
    pub fn detect() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let origin = web_sys::window().and_then(|window| window.location().origin().ok());
            match origin {
                Some(origin) if !origin.is_empty() && origin != "null" => Self {
                    api_base_url: origin,
                },
                _ => Self::default(),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_env_value(std::env::var(API_ENV_VAR).ok())
        }
    }

    pub fn from_env_value(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => Self { api_base_url: url },
            _ => Self::default(),
        }
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(&self.api_base_url)
    }
}
