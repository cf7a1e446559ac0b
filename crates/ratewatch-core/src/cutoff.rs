//! Earliest event date worth scanning for unpublished rating changes.
//!
//! The monthly publication cycle is anchored to the third Wednesday of the
//! month. Events dated from two days before the previous month's anchor
//! onward may not be reflected in the published snapshot yet.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

/// Days subtracted from the third Wednesday of the previous month.
const CUTOFF_BUFFER_DAYS: u64 = 2;

/// Which occurrence of [`ANCHOR_WEEKDAY`] anchors the cutoff.
const ANCHOR_OCCURRENCE: u64 = 3;

const ANCHOR_WEEKDAY: Weekday = Weekday::Wed;

/// Cutoff date relative to the local current date.
#[must_use]
pub fn cutoff_date() -> NaiveDate {
    cutoff_date_for(Local::now().date_naive())
}

/// Cutoff date relative to `today`: two days before the third Wednesday of
/// the month preceding `today`'s month.
#[must_use]
pub fn cutoff_date_for(today: NaiveDate) -> NaiveDate {
    // Stepping back `day` days from any date lands on the previous month's last day.
    let previous_month_end = today - Days::new(u64::from(today.day()));
    let previous_month_start = previous_month_end - Days::new(u64::from(previous_month_end.day0()));

    let start_weekday = u64::from(previous_month_start.weekday().num_days_from_monday());
    let anchor_weekday = u64::from(ANCHOR_WEEKDAY.num_days_from_monday());
    let first_occurrence_offset = (anchor_weekday + 7 - start_weekday) % 7;

    let anchor = previous_month_start
        + Days::new(first_occurrence_offset + 7 * (ANCHOR_OCCURRENCE - 1));
    anchor - Days::new(CUTOFF_BUFFER_DAYS)
}
