use crate::errors::CounterError;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_VISITED_KEY: &str = "visitCounterVisited_v2";
pub const DEFAULT_SESSION_KEY: &str = "visitCounterIncrementedThisSession_v2";
pub const DEFAULT_STATE_PATH: &str = "data/visitor_state.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP method the counting service expects on `{base}/up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncrementMethod {
    #[default]
    Get,
    Post,
}

impl FromStr for IncrementMethod {
    type Err = CounterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            other => Err(CounterError::config(format!(
                "increment method must be 'get' or 'post', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CounterConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub increment_method: IncrementMethod,
    pub timeout: Duration,
    pub state_path: PathBuf,
    pub visited_key: String,
    pub session_key: String,
    pub group_separator: String,
    pub fallback_text: String,
    pub error_text: String,
    pub user_agent: String,
    pub automated: bool,
}

impl CounterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            increment_method: IncrementMethod::default(),
            timeout: DEFAULT_TIMEOUT,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            visited_key: DEFAULT_VISITED_KEY.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            group_separator: ",".to_string(),
            fallback_text: "—".to_string(),
            error_text: "Error loading count".to_string(),
            user_agent: concat!("visit_counter/", env!("CARGO_PKG_VERSION")).to_string(),
            automated: false,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_increment_method(mut self, method: IncrementMethod) -> Self {
        self.increment_method = method;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    pub fn with_keys(mut self, visited_key: impl Into<String>, session_key: impl Into<String>) -> Self {
        self.visited_key = visited_key.into();
        self.session_key = session_key.into();
        self
    }

    pub fn with_group_separator(mut self, separator: impl Into<String>) -> Self {
        self.group_separator = separator.into();
        self
    }

    pub fn from_env() -> Result<Self, CounterError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from `COUNTER_*` variables fetched through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CounterError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = var("COUNTER_BASE_URL")
            .ok_or_else(|| CounterError::config("COUNTER_BASE_URL is not set"))?;
        let mut config = Self::new(base_url.trim());

        config.api_key = var("COUNTER_API_KEY");
        if let Some(method) = var("COUNTER_INCREMENT_METHOD") {
            config.increment_method = method.parse()?;
        }
        if let Some(secs) = var("COUNTER_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                CounterError::config(format!("COUNTER_TIMEOUT_SECS must be a whole number, got '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = var("COUNTER_STATE_PATH") {
            config.state_path = PathBuf::from(path);
        }
        if let Some(key) = var("COUNTER_VISITED_KEY") {
            config.visited_key = key;
        }
        if let Some(key) = var("COUNTER_SESSION_KEY") {
            config.session_key = key;
        }
        if let Some(separator) = lookup("COUNTER_GROUP_SEPARATOR") {
            config.group_separator = separator;
        }
        if let Some(text) = var("COUNTER_FALLBACK_TEXT") {
            config.fallback_text = text;
        }
        if let Some(text) = var("COUNTER_ERROR_TEXT") {
            config.error_text = text;
        }
        if let Some(agent) = var("COUNTER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(flag) = var("COUNTER_AUTOMATED") {
            config.automated = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if config.visited_key == config.session_key {
            return Err(CounterError::config("visited and session keys must differ"));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn requires_base_url() {
        let err = CounterConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, CounterError::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let config =
            CounterConfig::from_lookup(lookup(&[("COUNTER_BASE_URL", "http://counter.test/v")]))
                .unwrap();
        assert_eq!(config.base_url, "http://counter.test/v");
        assert_eq!(config.api_key, None);
        assert_eq!(config.increment_method, IncrementMethod::Get);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(config.group_separator, ",");
        assert!(!config.automated);
    }

    #[test]
    fn reads_overrides() {
        let config = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_BASE_URL", "http://counter.test/v"),
            ("COUNTER_API_KEY", "secret"),
            ("COUNTER_INCREMENT_METHOD", "POST"),
            ("COUNTER_TIMEOUT_SECS", "3"),
            ("COUNTER_STATE_PATH", "/tmp/state.json"),
            ("COUNTER_GROUP_SEPARATOR", "."),
            ("COUNTER_AUTOMATED", "true"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.increment_method, IncrementMethod::Post);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.state_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.group_separator, ".");
        assert!(config.automated);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_method = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_BASE_URL", "http://counter.test/v"),
            ("COUNTER_INCREMENT_METHOD", "put"),
        ]));
        assert!(bad_method.is_err());

        let bad_timeout = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_BASE_URL", "http://counter.test/v"),
            ("COUNTER_TIMEOUT_SECS", "soon"),
        ]));
        assert!(bad_timeout.is_err());

        let same_keys = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_BASE_URL", "http://counter.test/v"),
            ("COUNTER_VISITED_KEY", "k"),
            ("COUNTER_SESSION_KEY", "k"),
        ]));
        assert!(same_keys.is_err());
    }
}
