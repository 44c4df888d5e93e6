//! Environment configuration. §6.3.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub frontend_url: Option<String>,
    pub log_level: String,
    pub node_env: String,
    pub integration_test: bool,
}

fn env_bool_truthy(raw: &str) -> bool {
    matches!(raw, "1" | "true" | "TRUE" | "True" | "yes")
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);
        let frontend_url = env::var("FRONTEND_URL").ok();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let node_env = env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string());
        let integration_test = env::var("INTEGRATION_TEST")
            .map(|v| env_bool_truthy(&v))
            .unwrap_or(false);

        Self {
            port,
            frontend_url,
            log_level,
            node_env,
            integration_test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values_recognized() {
        assert!(env_bool_truthy("1"));
        assert!(env_bool_truthy("true"));
        assert!(!env_bool_truthy("0"));
        assert!(!env_bool_truthy(""));
    }
}
