// src/config.rs
use std::env;

/// Runtime configuration, read once at startup from environment variables.
///
/// Required variables abort startup when missing. Optional variables only
/// disable the integration they belong to; `warnings()` lists them so the
/// operator can see which features are off.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    /// Absolute base URL used when building magic links for email.
    pub base_url: String,

    /// Wealth-tracking partner (deal sync + net-worth summary).
    pub wealth_api_url: Option<String>,
    pub wealth_api_key: Option<String>,
    /// Lending partner (pre-qualification + loan applications).
    pub lending_api_url: Option<String>,
    pub lending_api_key: Option<String>,

    /// Property estimate lookup service.
    pub estimate_api_url: Option<String>,
    pub estimate_api_key: Option<String>,

    /// Transactional email for magic links.
    pub mail_api_key: Option<String>,
    pub mail_sender_email: Option<String>,
    pub mail_sender_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "flip_analyzer.sqlite3".to_string());
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| format!("http://{bind_addr}"));

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            errors.push("BASE_URL must start with http:// or https://".to_string());
        }

        let cfg = Self {
            bind_addr,
            database_path,
            base_url,
            wealth_api_url: optional("WEALTH_API_URL"),
            wealth_api_key: optional("WEALTH_API_KEY"),
            lending_api_url: optional("LENDING_API_URL"),
            lending_api_key: optional("LENDING_API_KEY"),
            estimate_api_url: optional("ESTIMATE_API_URL"),
            estimate_api_key: optional("ESTIMATE_API_KEY"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_sender_email: optional("MAIL_SENDER_EMAIL"),
            mail_sender_name: optional("MAIL_SENDER_NAME"),
        };

        if errors.is_empty() {
            Ok(cfg)
        } else {
            Err(errors)
        }
    }

    /// Optional variables that are unset, one warning line per disabled feature.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.wealth_api_url.is_none() || self.wealth_api_key.is_none() {
            warnings.push("wealth partner not configured (WEALTH_API_URL / WEALTH_API_KEY): deal sync disabled".to_string());
        }
        if self.lending_api_url.is_none() || self.lending_api_key.is_none() {
            warnings.push("lending partner not configured (LENDING_API_URL / LENDING_API_KEY): loan applications disabled".to_string());
        }
        if self.estimate_api_url.is_none() || self.estimate_api_key.is_none() {
            warnings.push("estimate service not configured (ESTIMATE_API_URL / ESTIMATE_API_KEY): address lookup disabled".to_string());
        }
        if self.mail_api_key.is_none() {
            warnings.push(
                "mailer not configured (MAIL_API_KEY): magic links will be logged instead"
                    .to_string(),
            );
        }
        warnings
    }
}

/// Treats unset and blank the same way.
fn optional(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
