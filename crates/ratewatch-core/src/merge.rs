//! Newest-wins-once merge of live row extractions over a published snapshot.
//!
//! Extractions must be applied newest event first. The first extraction to
//! supply a category settles it; every later (older) extraction is ignored
//! for that category.

use crate::rating::{RatingCategory, RatingSnapshot, RatingValue, RowExtraction};

/// Incremental merge state for one person's crawl.
#[derive(Debug, Clone)]
pub struct LiveMerge {
    snapshot: RatingSnapshot,
    settled: [bool; 6],
}

impl LiveMerge {
    /// Starts from a copy of the published snapshot with nothing settled.
    #[must_use]
    pub fn new(published: &RatingSnapshot) -> Self {
        Self {
            snapshot: published.clone(),
            settled: [false; 6],
        }
    }

    /// Applies one extraction and returns the categories it settled.
    pub fn apply(&mut self, extraction: &RowExtraction) -> Vec<RatingCategory> {
        let mut newly_settled = Vec::new();
        for (category, rating) in extraction.iter() {
            let slot = &mut self.settled[category.index()];
            if *slot {
                continue;
            }
            *slot = true;
            self.snapshot
                .set(category, RatingValue::Rated(rating.to_owned()));
            newly_settled.push(category);
        }
        newly_settled
    }

    #[must_use]
    pub fn is_settled(&self, category: RatingCategory) -> bool {
        self.settled[category.index()]
    }

    /// `true` once every category has been settled by some extraction.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.settled.iter().all(|s| *s)
    }

    #[must_use]
    pub fn snapshot(&self) -> &RatingSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn into_snapshot(self) -> RatingSnapshot {
        self.snapshot
    }
}

/// Merges `extractions` (newest first) over `published`.
#[must_use]
pub fn merge<'a, I>(published: &RatingSnapshot, extractions: I) -> RatingSnapshot
where
    I: IntoIterator<Item = &'a RowExtraction>,
{
    let mut live = LiveMerge::new(published);
    for extraction in extractions {
        live.apply(extraction);
    }
    live.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(v: &str) -> RatingValue {
        RatingValue::Rated(v.to_owned())
    }

    #[test]
    fn newest_extraction_wins_per_category() {
        let published = RatingSnapshot::unrated().with(RatingCategory::Regular, rated("1500"));
        let newest: RowExtraction = [(RatingCategory::Regular, "1550")].into_iter().collect();
        let older: RowExtraction = [
            (RatingCategory::Regular, "1600"),
            (RatingCategory::Quick, "1400"),
        ]
        .into_iter()
        .collect();

        let live = merge(&published, [&newest, &older]);

        assert_eq!(live.get(RatingCategory::Regular), &rated("1550"));
        assert_eq!(live.get(RatingCategory::Quick), &rated("1400"));
        assert_eq!(live.get(RatingCategory::Blitz), &RatingValue::Unrated);
    }

    #[test]
    fn untouched_categories_keep_published_values() {
        let published = RatingSnapshot::unrated()
            .with(RatingCategory::Blitz, rated("1710"))
            .with(RatingCategory::OnlineQuick, rated("1333"));
        let extraction: RowExtraction = [(RatingCategory::Regular, "1502")].into_iter().collect();

        let live = merge(&published, [&extraction]);

        assert_eq!(live.get(RatingCategory::Regular), &rated("1502"));
        assert_eq!(live.get(RatingCategory::Blitz), &rated("1710"));
        assert_eq!(live.get(RatingCategory::OnlineQuick), &rated("1333"));
    }

    #[test]
    fn no_extractions_returns_published() {
        let published = RatingSnapshot::unrated().with(RatingCategory::Quick, rated("1200"));
        assert_eq!(merge(&published, []), published);
    }

    #[test]
    fn empty_extraction_settles_nothing() {
        let mut live = LiveMerge::new(&RatingSnapshot::unrated());
        assert!(live.apply(&RowExtraction::new()).is_empty());
        assert!(!live.is_settled(RatingCategory::Regular));
    }

    #[test]
    fn apply_reports_newly_settled_categories_only() {
        let mut live = LiveMerge::new(&RatingSnapshot::unrated());
        let first: RowExtraction = [(RatingCategory::Quick, "1401")].into_iter().collect();
        let second: RowExtraction = [
            (RatingCategory::Quick, "1390"),
            (RatingCategory::Blitz, "1450"),
        ]
        .into_iter()
        .collect();

        assert_eq!(live.apply(&first), vec![RatingCategory::Quick]);
        assert_eq!(live.apply(&second), vec![RatingCategory::Blitz]);
        assert_eq!(live.snapshot().get(RatingCategory::Quick), &rated("1401"));
    }

    #[test]
    fn complete_once_all_six_are_settled() {
        let mut live = LiveMerge::new(&RatingSnapshot::unrated());
        let offline: RowExtraction = RatingCategory::BASE
            .into_iter()
            .map(|c| (c, "1500"))
            .collect();
        live.apply(&offline);
        assert!(!live.is_complete());

        let online: RowExtraction = RatingCategory::BASE
            .into_iter()
            .map(|c| (c.online_variant(), "1600"))
            .collect();
        live.apply(&online);
        assert!(live.is_complete());
    }
}
