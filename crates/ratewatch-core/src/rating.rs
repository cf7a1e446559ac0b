//! Rating categories and the snapshot types built from them.
//!
//! A [`RatingSnapshot`] always holds a value for every [`RatingCategory`];
//! "unknown" is expressed with [`RatingValue::Unrated`], never by absence.

use std::collections::BTreeMap;

/// One of the six rating systems: in-person or online, crossed with
/// regular, quick and blitz time controls.
///
/// Variant order is the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatingCategory {
    Regular,
    Quick,
    Blitz,
    OnlineRegular,
    OnlineQuick,
    OnlineBlitz,
}

impl RatingCategory {
    /// All categories in display order.
    pub const ALL: [RatingCategory; 6] = [
        RatingCategory::Regular,
        RatingCategory::Quick,
        RatingCategory::Blitz,
        RatingCategory::OnlineRegular,
        RatingCategory::OnlineQuick,
        RatingCategory::OnlineBlitz,
    ];

    /// The in-person categories whose codes appear in event result rows.
    pub const BASE: [RatingCategory; 3] = [
        RatingCategory::Regular,
        RatingCategory::Quick,
        RatingCategory::Blitz,
    ];

    /// The short system code used by the ratings API and result tables.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            RatingCategory::Regular => "R",
            RatingCategory::Quick => "Q",
            RatingCategory::Blitz => "B",
            RatingCategory::OnlineRegular => "OR",
            RatingCategory::OnlineQuick => "OQ",
            RatingCategory::OnlineBlitz => "OB",
        }
    }

    /// Human-readable label, e.g. `"Online Quick"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RatingCategory::Regular => "Regular",
            RatingCategory::Quick => "Quick",
            RatingCategory::Blitz => "Blitz",
            RatingCategory::OnlineRegular => "Online Regular",
            RatingCategory::OnlineQuick => "Online Quick",
            RatingCategory::OnlineBlitz => "Online Blitz",
        }
    }

    /// Parses an exact system code (`"R"`, `"OB"`, ...). Codes are case-sensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Maps a category to its online counterpart. Online categories map to
    /// themselves.
    #[must_use]
    pub fn online_variant(self) -> Self {
        match self {
            RatingCategory::Regular | RatingCategory::OnlineRegular => {
                RatingCategory::OnlineRegular
            }
            RatingCategory::Quick | RatingCategory::OnlineQuick => RatingCategory::OnlineQuick,
            RatingCategory::Blitz | RatingCategory::OnlineBlitz => RatingCategory::OnlineBlitz,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A rating value: either an integer-like rating string or the `Unrated`
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RatingValue {
    Rated(String),
    #[default]
    Unrated,
}

impl RatingValue {
    /// Builds a value from raw text; blank text and `"0"` are unrated.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("unrated") {
            RatingValue::Unrated
        } else {
            RatingValue::Rated(trimmed.to_owned())
        }
    }

    #[must_use]
    pub fn is_rated(&self) -> bool {
        matches!(self, RatingValue::Rated(_))
    }

    #[must_use]
    pub fn as_rated(&self) -> Option<&str> {
        match self {
            RatingValue::Rated(v) => Some(v),
            RatingValue::Unrated => None,
        }
    }
}

impl std::fmt::Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingValue::Rated(v) => f.write_str(v),
            RatingValue::Unrated => f.write_str("Unrated"),
        }
    }
}

/// A total mapping from every [`RatingCategory`] to a [`RatingValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSnapshot {
    values: [RatingValue; 6],
}

impl Default for RatingSnapshot {
    fn default() -> Self {
        Self::unrated()
    }
}

impl RatingSnapshot {
    /// A snapshot with every category set to [`RatingValue::Unrated`].
    #[must_use]
    pub fn unrated() -> Self {
        Self {
            values: std::array::from_fn(|_| RatingValue::Unrated),
        }
    }

    #[must_use]
    pub fn get(&self, category: RatingCategory) -> &RatingValue {
        &self.values[category.index()]
    }

    pub fn set(&mut self, category: RatingCategory, value: RatingValue) {
        self.values[category.index()] = value;
    }

    /// Builder-style [`Self::set`].
    #[must_use]
    pub fn with(mut self, category: RatingCategory, value: RatingValue) -> Self {
        self.set(category, value);
        self
    }

    /// Iterates `(category, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingCategory, &RatingValue)> {
        RatingCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
    }
}

/// Category values extracted from a single result-table row.
///
/// The first value recorded for a category is kept; later inserts for the
/// same category are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowExtraction {
    values: BTreeMap<RatingCategory, String>,
}

impl RowExtraction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `rating` for `category` unless the category is already present.
    /// Returns `true` when the value was stored.
    pub fn insert_if_absent(
        &mut self,
        category: RatingCategory,
        rating: impl Into<String>,
    ) -> bool {
        if self.values.contains_key(&category) {
            return false;
        }
        self.values.insert(category, rating.into());
        true
    }

    #[must_use]
    pub fn get(&self, category: RatingCategory) -> Option<&str> {
        self.values.get(&category).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates extracted values in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingCategory, &str)> {
        self.values.iter().map(|(c, v)| (*c, v.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(RatingCategory, S)> for RowExtraction {
    fn from_iter<I: IntoIterator<Item = (RatingCategory, S)>>(iter: I) -> Self {
        let mut extraction = RowExtraction::new();
        for (category, rating) in iter {
            extraction.insert_if_absent(category, rating);
        }
        extraction
    }
}
