use std::fmt;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5500,http://127.0.0.1:5500,http://localhost:5501,http://127.0.0.1:5501";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid {expected}: {value}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the upstream client needs, handed over at construction.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    /// Weather host, e.g. `https://api.openweathermap.org/data/2.5`
    pub base_url: String,
    /// Geocoding host, e.g. `https://api.openweathermap.org/geo/1.0`
    pub geo_url: String,
    /// Deadline for each individual provider call.
    pub timeout: Duration,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("geo_url", &self.geo_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("OPENWEATHER_API_KEY").ok_or(ConfigError::Missing("OPENWEATHER_API_KEY"))?;

        let timeout_secs: u64 = parse_or(&var, "UPSTREAM_TIMEOUT_SECS", 10, "number of seconds")?;
        let window_secs: u64 = parse_or(&var, "RATE_LIMIT_WINDOW_SECS", 900, "number of seconds")?;

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        // Credentialed CORS cannot use a wildcard origin.
        if let Some(wildcard) = allowed_origins.iter().find(|o| o.as_str() == "*") {
            return Err(ConfigError::Invalid {
                name: "ALLOWED_ORIGINS",
                expected: "list of explicit origins",
                value: wildcard.clone(),
            });
        }

        Ok(Self {
            upstream: UpstreamConfig {
                api_key,
                base_url: trim_slash(var("OPENWEATHER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string())),
                geo_url: trim_slash(var("OPENWEATHER_GEO_URL").unwrap_or_else(|| DEFAULT_GEO_URL.to_string())),
                timeout: Duration::from_secs(timeout_secs),
            },
            allowed_origins,
            port: parse_or(&var, "PORT", 3000, "port number")?,
            rate_limit_max_requests: parse_or(&var, "RATE_LIMIT_MAX_REQUESTS", 100, "request count")?,
            rate_limit_window: Duration::from_secs(window_secs),
            log_json: var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = AppConfig::from_lookup(lookup(&[("OPENWEATHER_API_KEY", "secret")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upstream.geo_url, DEFAULT_GEO_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(!config.log_json);
    }

    #[test]
    fn test_missing_api_key() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENWEATHER_API_KEY")));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[
            ("OPENWEATHER_API_KEY", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "PORT is not a valid port number: eighty");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENWEATHER_API_KEY", "secret"),
            ("OPENWEATHER_BASE_URL", "http://127.0.0.1:9000/data/2.5/"),
            ("ALLOWED_ORIGINS", "https://weather.example, ,https://app.example"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("UPSTREAM_TIMEOUT_SECS", "2"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000/data/2.5");
        assert_eq!(
            config.allowed_origins,
            vec!["https://weather.example", "https://app.example"]
        );
        assert_eq!(config.rate_limit_max_requests, 5);
        assert_eq!(config.upstream.timeout, Duration::from_secs(2));
        assert!(config.log_json);
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        for origins in ["*", "https://weather.example, *"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("OPENWEATHER_API_KEY", "secret"),
                ("ALLOWED_ORIGINS", origins),
            ]))
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "ALLOWED_ORIGINS is not a valid list of explicit origins: *"
            );
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig::from_lookup(lookup(&[("OPENWEATHER_API_KEY", "hunter2")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
