use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::layout::{default_page_config, PageConfig};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on letter text accepted by the API, in bytes.
    pub max_letter_bytes: usize,
    pub pdf_font_size_pt: f32,
    pub pdf_leading_pt: f32,
    /// Download name used when no company or position is known.
    pub default_export_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_letter_bytes: parse_or(&lookup, "MAX_LETTER_BYTES", 256 * 1024)?,
            pdf_font_size_pt: parse_or(&lookup, "PDF_FONT_SIZE_PT", 12.0)?,
            pdf_leading_pt: parse_or(&lookup, "PDF_LEADING_PT", 14.0)?,
            default_export_name: lookup("DEFAULT_EXPORT_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "cover_letter".to_string()),
        };

        ensure!(config.max_letter_bytes > 0, "MAX_LETTER_BYTES must be positive");
        ensure!(config.pdf_font_size_pt > 0.0, "PDF_FONT_SIZE_PT must be positive");
        ensure!(config.pdf_leading_pt > 0.0, "PDF_LEADING_PT must be positive");
        Ok(config)
    }

    /// Default page geometry with the configured type size.
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            font_size_pt: self.pdf_font_size_pt,
            leading_pt: self.pdf_leading_pt,
            ..default_page_config()
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_letter_bytes, 262_144);
        assert_eq!(config.default_export_name, "cover_letter");
        assert_eq!(config.page_config(), default_page_config());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("PDF_FONT_SIZE_PT", "11"),
            ("PDF_LEADING_PT", "13.5"),
            ("DEFAULT_EXPORT_NAME", "letter"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.page_config().font_size_pt, 11.0);
        assert_eq!(config.page_config().leading_pt, 13.5);
        assert_eq!(config.default_export_name, "letter");
    }

    #[test]
    fn test_invalid_port_names_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"), "{err}");
    }

    #[test]
    fn test_non_positive_font_size_rejected() {
        assert!(config_from(&[("PDF_FONT_SIZE_PT", "0")]).is_err());
    }
}
