use churn_common::error::{ChurnError, ChurnResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::tracing_init::LogFormat;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub model_path: String,
    /// Feature columns fed to the model, in model input order.
    pub required_columns: Vec<String>,
    /// Replacement rule table; the built-in table is used when unset.
    pub rules_path: Option<String>,
    pub preview_rows: usize,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads the vars, falling back to defaults.
    pub fn from_env() -> ChurnResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "5000")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            log_format: parse_var("LOG_FORMAT", "text")?,
            model_path: get_var_or("MODEL_PATH", "churn_model.json"),
            required_columns: parse_column_list(&get_var_or("REQUIRED_COLUMNS", "")),
            rules_path: env::var("RULES_PATH").ok().filter(|p| !p.trim().is_empty()),
            preview_rows: parse_var("PREVIEW_ROWS", "100")?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", "10485760")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated column list, trimming names and dropping blanks.
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(key: &str, default: &str) -> ChurnResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .trim()
        .parse()
        .map_err(|e| ChurnError::Config(format!("invalid {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "LOG_LEVEL",
        "LOG_FORMAT",
        "MODEL_PATH",
        "REQUIRED_COLUMNS",
        "RULES_PATH",
        "PREVIEW_ROWS",
        "MAX_UPLOAD_BYTES",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn config_from_env_uses_defaults() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_vars();

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.model_path, "churn_model.json");
        assert!(cfg.required_columns.is_empty());
        assert!(cfg.rules_path.is_none());
        assert_eq!(cfg.preview_rows, 100);
        assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn config_from_env_reads_overrides() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_vars();

        env::set_var("PORT", "9090");
        env::set_var("MODEL_PATH", "/models/churn.json");
        env::set_var("REQUIRED_COLUMNS", "tenure_months, open_tickets,,late_invoices ");
        env::set_var("RULES_PATH", "/etc/churn/rules.json");
        env::set_var("PREVIEW_ROWS", "25");
        env::set_var("LOG_FORMAT", "json");

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.model_path, "/models/churn.json");
        assert_eq!(
            cfg.required_columns,
            vec!["tenure_months", "open_tickets", "late_invoices"]
        );
        assert_eq!(cfg.rules_path.as_deref(), Some("/etc/churn/rules.json"));
        assert_eq!(cfg.preview_rows, 25);
        assert_eq!(cfg.log_format, LogFormat::Json);

        clear_vars();
    }

    #[test]
    fn config_from_env_fails_on_invalid_port() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_vars();

        env::set_var("PORT", "not-a-port");
        let result = AppConfig::from_env();
        assert!(matches!(result, Err(ChurnError::Config(msg)) if msg.contains("PORT")));

        clear_vars();
    }

    #[test]
    fn blank_rules_path_is_ignored() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        clear_vars();

        env::set_var("RULES_PATH", "  ");
        let cfg = AppConfig::from_env().expect("should parse config");
        assert!(cfg.rules_path.is_none());

        clear_vars();
    }

    #[test]
    fn parse_column_list_handles_empty_input() {
        assert!(parse_column_list("").is_empty());
        assert!(parse_column_list(" , ,").is_empty());
        assert_eq!(parse_column_list("a"), vec!["a"]);
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let cfg = AppConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_level: "debug".to_owned(),
            log_format: LogFormat::Text,
            model_path: String::new(),
            required_columns: Vec::new(),
            rules_path: None,
            preview_rows: 100,
            max_upload_bytes: 1024,
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }
}
