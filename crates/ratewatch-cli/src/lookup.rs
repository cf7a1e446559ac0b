//! Read-only commands: `published` and `cutoff`.

use chrono::NaiveDate;
use ratewatch_core::{cutoff_date, cutoff_date_for, AppConfig};

use crate::live::{build_published_client, fetch_published};
use crate::output;

/// Print a member's published ratings.
///
/// # Errors
///
/// Returns an error if the published-ratings client cannot be built. Lookup
/// failures print the `Unknown` placeholder instead.
pub(crate) async fn run_published(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = build_published_client(config)?;
    let member = fetch_published(&client, id).await;
    print!("{}", output::render_published(id, &member));
    Ok(())
}

/// Print the cutoff date for `today`, or for the local date when `None`.
pub(crate) fn run_cutoff(today: Option<NaiveDate>) {
    let cutoff = today.map_or_else(cutoff_date, cutoff_date_for);
    println!("{}", cutoff.format("%Y-%m-%d"));
}
