//! Runtime configuration read from the environment.

/// Public placeholder service used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Environment variable overriding the service base URL.
pub const BASE_URL_VAR: &str = "POSTS_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_placeholder_service() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn override_is_trimmed() {
        let config = ClientConfig::from_lookup(|key| {
            (key == BASE_URL_VAR).then(|| " http://127.0.0.1:3000 ".to_string())
        });
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn blank_override_falls_back() {
        let config = ClientConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
