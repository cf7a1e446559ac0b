use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.site_url, "https://ratings.uschess.org");
    assert_eq!(cfg.api_url, "https://ratings-api.uschess.org/api/v1");
    assert_eq!(cfg.webdriver_url, "http://localhost:9515");
    assert!(cfg.headless);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.discovery_wait_secs, 10);
    assert_eq!(cfg.heading_wait_secs, 5);
    assert_eq!(cfg.section_settle_ms, 1000);
    assert_eq!(cfg.max_sections, 20);
    assert_eq!(cfg.post_rating_position, 1);
}

#[test]
fn build_app_config_strips_trailing_slash_from_urls() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_SITE_URL", "https://example.org/");
    map.insert("RATEWATCH_WEBDRIVER_URL", "http://127.0.0.1:4444/wd/hub/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.site_url, "https://example.org");
    assert_eq!(cfg.webdriver_url, "http://127.0.0.1:4444/wd/hub");
}

#[test]
fn build_app_config_rejects_non_http_url() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_API_URL", "ratings-api.example.org");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATEWATCH_API_URL"),
        "expected InvalidEnvVar(RATEWATCH_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_headless_override() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_HEADLESS", "No");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.headless);
}

#[test]
fn build_app_config_headless_invalid() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_HEADLESS", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATEWATCH_HEADLESS"),
        "expected InvalidEnvVar(RATEWATCH_HEADLESS), got: {result:?}"
    );
}

#[test]
fn build_app_config_section_settle_ms_override() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_SECTION_SETTLE_MS", "1500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.section_settle_ms, 1500);
}

#[test]
fn build_app_config_max_sections_invalid() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_MAX_SECTIONS", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATEWATCH_MAX_SECTIONS"),
        "expected InvalidEnvVar(RATEWATCH_MAX_SECTIONS), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_sections_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_MAX_SECTIONS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATEWATCH_MAX_SECTIONS"),
        "expected InvalidEnvVar(RATEWATCH_MAX_SECTIONS), got: {result:?}"
    );
}

#[test]
fn build_app_config_post_rating_position_override() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_POST_RATING_POSITION", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.post_rating_position, 2);
}

#[test]
fn build_app_config_max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("RATEWATCH_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATEWATCH_MAX_RETRIES"),
        "expected InvalidEnvVar(RATEWATCH_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn parse_bool_accepts_common_spellings() {
    for raw in ["true", "TRUE", "1", "yes"] {
        assert!(parse_bool("X", raw).unwrap(), "{raw} should be true");
    }
    for raw in ["false", "0", "no", " False "] {
        assert!(!parse_bool("X", raw).unwrap(), "{raw} should be false");
    }
}

#[test]
fn build_app_config_treats_unreadable_values_as_unset() {
    let lookup = |_: &str| Err(VarError::NotUnicode(std::ffi::OsString::from("x")));
    let cfg = build_app_config(lookup).unwrap();
    assert_eq!(cfg.site_url, DEFAULT_SITE_URL);
    assert_eq!(cfg.max_sections, 20);
}
