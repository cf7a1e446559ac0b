//! Locating a person's row in a rendered results table and pulling the
//! post-event ratings out of its text.
//!
//! Result rows are not uniformly structured: the rating columns for each
//! time control sit after a one-letter system code (`R`, `Q`, `B`) followed
//! by the pre-event rating, the post-event rating, and sometimes other
//! numbers. The extraction is a heuristic, tuned by [`RowParseOptions`].

use ratewatch_core::{RatingCategory, RowExtraction};
use scraper::{ElementRef, Html, Selector};

/// Knobs for the row heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowParseOptions {
    /// How many tokens after a system code are searched for rating numbers.
    pub window: usize,
    /// Minimum digit count for a token to count as a rating number.
    pub min_digits: usize,
    /// Zero-based index, among the rating numbers found, of the post-event
    /// rating. `1` means "the second number", after the pre-event rating.
    pub post_rating_position: usize,
}

impl Default for RowParseOptions {
    fn default() -> Self {
        Self {
            window: 5,
            min_digits: 3,
            post_rating_position: 1,
        }
    }
}

/// Finds the table row containing a link whose text is exactly `person_id`
/// and returns its flattened text: every text node trimmed, empty ones
/// dropped, joined with `|`.
///
/// Returns `None` when no such link sits inside a `<tr>`.
#[must_use]
pub fn locate_row(page_source: &str, person_id: &str) -> Option<String> {
    let document = Html::parse_document(page_source);
    let links = Selector::parse("a").ok()?;

    document
        .select(&links)
        .filter(|link| link.text().collect::<String>().trim() == person_id)
        .find_map(|link| {
            link.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "tr")
        })
        .map(|row| flatten_text(&row))
}

fn flatten_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("|")
}

/// Extracts post-event ratings from a flattened row.
///
/// For each base system code present as a token, the first `window` tokens
/// after its first occurrence are scanned for all-digit tokens of at least
/// `min_digits` digits. The one at `post_rating_position` is the post-event
/// rating; with fewer candidates the code is skipped. Online events map each
/// code to its online category.
#[must_use]
pub fn parse_row(row_text: &str, online: bool, options: &RowParseOptions) -> RowExtraction {
    let tokens: Vec<&str> = row_text
        .split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let mut extraction = RowExtraction::new();
    for base in RatingCategory::BASE {
        let Some(index) = tokens.iter().position(|t| *t == base.code()) else {
            continue;
        };

        let candidates: Vec<&str> = tokens[index + 1..]
            .iter()
            .take(options.window)
            .copied()
            .filter(|t| is_rating_number(t, options.min_digits))
            .collect();

        let Some(post) = candidates.get(options.post_rating_position) else {
            tracing::debug!(
                code = base.code(),
                found = candidates.len(),
                "not enough rating numbers after system code; skipping"
            );
            continue;
        };

        let category = if online { base.online_variant() } else { base };
        extraction.insert_if_absent(category, *post);
    }
    extraction
}

fn is_rating_number(token: &str, min_digits: usize) -> bool {
    token.len() >= min_digits.max(1) && token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
