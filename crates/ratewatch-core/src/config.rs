use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_SITE_URL: &str = "https://ratings.uschess.org";
pub const DEFAULT_API_URL: &str = "https://ratings-api.uschess.org/api/v1";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Reads `.env` (if any) into the process environment, then builds the
/// configuration from it.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Builds the configuration from the process environment as it stands; no
/// `.env` file is read.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses `var` (or `default` when unset) with `FromStr`.
fn parse_var<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_owned());
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_owned(),
        reason: format!("{e} (got \"{raw}\")"),
    })
}

/// Builds the configuration from an injectable variable lookup.
///
/// Every variable has a default, so the only failure mode is an unparseable
/// or out-of-range value.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_owned())
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_owned())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_owned(),
                reason: format!("expected an http(s) URL, got \"{raw}\""),
            })
        }
    };

    let log_level = or_default("RATEWATCH_LOG_LEVEL", "info");
    let site_url = parse_url("RATEWATCH_SITE_URL", DEFAULT_SITE_URL)?;
    let api_url = parse_url("RATEWATCH_API_URL", DEFAULT_API_URL)?;
    let webdriver_url = parse_url("RATEWATCH_WEBDRIVER_URL", DEFAULT_WEBDRIVER_URL)?;
    let headless = parse_bool(
        "RATEWATCH_HEADLESS",
        &or_default("RATEWATCH_HEADLESS", "true"),
    )?;
    let user_agent = or_default("RATEWATCH_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs: u64 = parse_var(&lookup, "RATEWATCH_REQUEST_TIMEOUT_SECS", "10")?;
    let max_retries: u32 = parse_var(&lookup, "RATEWATCH_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms: u64 =
        parse_var(&lookup, "RATEWATCH_RETRY_BACKOFF_BASE_MS", "500")?;

    let discovery_wait_secs: u64 = parse_var(&lookup, "RATEWATCH_DISCOVERY_WAIT_SECS", "10")?;
    let heading_wait_secs: u64 = parse_var(&lookup, "RATEWATCH_HEADING_WAIT_SECS", "5")?;
    let section_settle_ms: u64 = parse_var(&lookup, "RATEWATCH_SECTION_SETTLE_MS", "1000")?;
    let max_sections: u32 = parse_var(&lookup, "RATEWATCH_MAX_SECTIONS", "20")?;
    if max_sections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RATEWATCH_MAX_SECTIONS".to_owned(),
            reason: "must be at least 1".to_owned(),
        });
    }
    let post_rating_position: usize =
        parse_var(&lookup, "RATEWATCH_POST_RATING_POSITION", "1")?;

    Ok(AppConfig {
        log_level,
        site_url,
        api_url,
        webdriver_url,
        headless,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        discovery_wait_secs,
        heading_wait_secs,
        section_settle_ms,
        max_sections,
        post_rating_position,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_owned(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
