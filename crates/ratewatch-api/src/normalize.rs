//! Mapping from the raw member document to a [`PublishedMember`].

use ratewatch_core::{RatingCategory, RatingSnapshot, RatingValue};

use crate::types::{MemberResponse, PublishedMember};

/// Converts an API member document into a name and a total rating snapshot.
///
/// - Unknown `ratingSystem` codes are ignored.
/// - A `null`, `0`, empty, or non-scalar `rating` leaves the category `Unrated`.
/// - When a code appears more than once, the last entry wins.
#[must_use]
pub fn member_from_response(response: &MemberResponse) -> PublishedMember {
    let mut ratings = RatingSnapshot::unrated();

    for entry in &response.ratings {
        let Some(category) = entry
            .rating_system
            .as_deref()
            .and_then(RatingCategory::from_code)
        else {
            continue;
        };
        let value = entry
            .rating
            .as_ref()
            .map_or(RatingValue::Unrated, rating_value_from_json);
        if value.is_rated() {
            ratings.set(category, value);
        }
    }

    PublishedMember {
        name: display_name(response),
        ratings,
    }
}

fn rating_value_from_json(raw: &serde_json::Value) -> RatingValue {
    match raw {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                RatingValue::from_text(&i.to_string())
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0) {
                RatingValue::from_text(&format!("{f:.0}"))
            } else {
                RatingValue::Unrated
            }
        }
        serde_json::Value::String(s) => RatingValue::from_text(s),
        _ => RatingValue::Unrated,
    }
}

fn display_name(response: &MemberResponse) -> String {
    let name = format!(
        "{} {}",
        response.first_name.as_deref().unwrap_or_default(),
        response.last_name.as_deref().unwrap_or_default()
    );
    let name = name.trim();
    if name.is_empty() {
        "Unknown".to_owned()
    } else {
        name.to_owned()
    }
}
