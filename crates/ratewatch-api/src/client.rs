//! HTTP client for the published-ratings REST API.
//!
//! One call is exposed: [`PublishedClient::fetch_member`], a `GET` on
//! `{base}/members/{id}` decoded into a [`PublishedMember`]. Transient
//! failures are retried with back-off; everything else surfaces as a typed
//! [`ApiError`] so callers can decide how to degrade.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, StatusCode, Url};

use crate::error::ApiError;
use crate::normalize::member_from_response;
use crate::retry::retry_with_backoff;
use crate::types::{MemberResponse, PublishedMember};

/// Client for the published-ratings API.
pub struct PublishedClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PublishedClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// `site_url` is sent as the `Referer`/`Origin` of every request; the API
    /// rejects requests that do not look like they come from the ratings site.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidBaseUrl`] if `base_url` cannot be parsed or
    ///   cannot carry path segments.
    /// - [`ApiError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        site_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            ApiError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        let mut headers = HeaderMap::new();
        let origin = site_url.trim_end_matches('/');
        if let Ok(value) = HeaderValue::from_str(&format!("{origin}/")) {
            headers.insert(REFERER, value);
        }
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(ORIGIN, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches a member's published ratings.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`]: HTTP 404 (not retried).
    /// - [`ApiError::UnexpectedStatus`]: any other non-2xx status; 5xx is
    ///   retried first.
    /// - [`ApiError::Http`]: network or TLS failure after all retries.
    /// - [`ApiError::Deserialize`]: body is not a member document.
    pub async fn fetch_member(&self, member_id: &str) -> Result<PublishedMember, ApiError> {
        let url = self.member_url(member_id);

        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == StatusCode::NOT_FOUND {
                    return Err(ApiError::NotFound {
                        member_id: member_id.to_owned(),
                    });
                }
                if !status.is_success() {
                    return Err(ApiError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<MemberResponse>(&body).map_err(|e| ApiError::Deserialize {
                    context: format!("member {member_id}"),
                    source: e,
                })
            }
        })
        .await?;

        let member = member_from_response(&response);
        tracing::debug!(
            member_id,
            name = %member.name,
            rated = member.ratings.iter().filter(|(_, v)| v.is_rated()).count(),
            "fetched published ratings"
        );
        Ok(member)
    }

    /// Builds `{base}/members/{id}` with the id percent-encoded as a single
    /// path segment.
    fn member_url(&self, member_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("members").push(member_id);
        }
        url
    }
}
