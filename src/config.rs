use thiserror::Error;

pub const APP_ID: &str = "com.scout.Scout";
pub const APP_NAME: &str = "Scout";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const ENGINE_ID_VAR: &str = "SEARCH_ENGINE_ID";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Credentials for the search API.
#[derive(Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub endpoint: String,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"***")
            .field("engine_id", &self.engine_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl SearchConfig {
    /// Read the credentials from the process environment, falling back to
    /// values baked in when the binary was built.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), build_time_value)
    }

    fn from_lookup<R, B>(runtime: R, build_time: B) -> Result<Self, ConfigError>
    where
        R: Fn(&str) -> Option<String>,
        B: Fn(&str) -> Option<&'static str>,
    {
        let resolve = |name: &'static str| {
            runtime(name)
                .or_else(|| build_time(name).map(str::to_string))
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            api_key: resolve(API_KEY_VAR)?,
            engine_id: resolve(ENGINE_ID_VAR)?,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        })
    }
}

fn build_time_value(name: &str) -> Option<&'static str> {
    match name {
        API_KEY_VAR => option_env!("GOOGLE_API_KEY"),
        ENGINE_ID_VAR => option_env!("SEARCH_ENGINE_ID"),
        _ => None,
    }
}
