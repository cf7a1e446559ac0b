//! Published-ratings API response types.
//!
//! Only the fields the live-ratings tool consumes are modelled; everything
//! else in the member document is ignored.

use ratewatch_core::RatingSnapshot;
use serde::Deserialize;

/// Member document returned by `GET /members/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
}

/// One `{ratingSystem, rating}` pair.
///
/// `rating` is kept as a raw JSON value: the API has been seen to return
/// numbers, numeric strings and `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    #[serde(default)]
    pub rating_system: Option<String>,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
}

/// A member's display name and published ratings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMember {
    pub name: String,
    pub ratings: RatingSnapshot,
}

impl PublishedMember {
    /// Placeholder used when the API could not be reached or returned nothing
    /// usable.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_owned(),
            ratings: RatingSnapshot::unrated(),
        }
    }
}
