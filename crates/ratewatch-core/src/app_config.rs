/// Runtime configuration for the published-ratings client and the live crawler.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub site_url: String,
    pub api_url: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub discovery_wait_secs: u64,
    pub heading_wait_secs: u64,
    pub section_settle_ms: u64,
    pub max_sections: u32,
    pub post_rating_position: usize,
}
