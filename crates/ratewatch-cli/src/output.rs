//! Rendering results for the terminal and for CSV files.

use std::collections::HashSet;
use std::io;

use ratewatch_api::PublishedMember;
use ratewatch_core::{RatingCategory, RatingValue};
use ratewatch_crawler::{CrawlReport, DiscoveryStatus, EventReport, SectionState};

use crate::live::MemberRatings;

/// Batches larger than this are written to a file instead of a table.
pub(crate) const TERMINAL_LIMIT: usize = 5;

pub(crate) const DEFAULT_OUTPUT_FILE: &str = "uscf_ratings_output.csv";

/// Short column headings, in category order.
const SHORT_LABELS: [&str; 6] = ["Reg", "Quick", "Blitz", "Onl-Reg", "Onl-Qck", "Onl-Blz"];

const TABLE_WIDTH: usize = 95;
const NAME_WIDTH: usize = 24;

/// How a `live` run reports its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    /// One line of live values per member on stdout.
    Csv,
    /// Fixed-width table on stdout.
    Table,
    /// Published-vs-live comparison written to a CSV file.
    File,
}

impl OutputMode {
    pub(crate) fn select(force_csv: bool, members: usize) -> Self {
        if force_csv {
            OutputMode::Csv
        } else if members <= TERMINAL_LIMIT {
            OutputMode::Table
        } else {
            OutputMode::File
        }
    }
}

pub(crate) fn render_table(results: &[MemberRatings]) -> String {
    let rule = "-".repeat(TABLE_WIDTH);
    let header: String = SHORT_LABELS
        .iter()
        .map(|label| format!(" {label:<8}"))
        .collect();

    let mut lines = vec![format!("{:<10} {:<25}{header}", "ID", "Name"), rule.clone()];
    for member in results {
        let name: String = member.name.chars().take(NAME_WIDTH).collect();
        let values: String = member
            .live
            .iter()
            .map(|(_, value)| format!(" {:<8}", value.to_string()))
            .collect();
        lines.push(format!("{:<10} {:<25}{values}", member.id, name));
    }
    lines.push(rule);
    join_lines(&lines)
}

/// Writes the six live values of each member, one record per member.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub(crate) fn write_live_csv<W: io::Write>(
    writer: W,
    results: &[MemberRatings],
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for member in results {
        csv.write_record(member.live.iter().map(|(_, value)| value.to_string()))?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `Name, ID` followed by a published/live pair per category.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub(crate) fn write_comparison_csv<W: io::Write>(
    writer: W,
    results: &[MemberRatings],
) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Name".to_owned(), "ID".to_owned()];
    for category in RatingCategory::ALL {
        header.push(format!("{}_Published", category.code()));
        header.push(format!("{}_Live", category.code()));
    }
    csv.write_record(&header)?;

    for member in results {
        let mut row = vec![member.name.clone(), member.id.clone()];
        for category in RatingCategory::ALL {
            row.push(member.published.get(category).to_string());
            row.push(member.live.get(category).to_string());
        }
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

pub(crate) fn render_published(id: &str, member: &PublishedMember) -> String {
    let rule = "=".repeat(30);
    let mut lines = vec![
        format!("Player: {}", member.name),
        format!("ID:     {id}"),
        String::new(),
        rule.clone(),
        format!("{:<20} RATING", "TYPE"),
        rule.clone(),
    ];
    for (category, value) in member.ratings.iter() {
        lines.push(format!("{:<20} {value}", category.label()));
    }
    lines.push(rule);
    join_lines(&lines)
}

pub(crate) fn render_history(name: &str, report: &CrawlReport) -> String {
    let rule = "=".repeat(40);
    let mut lines = vec![
        format!("History for {} ({name})", report.person_id),
        format!("Scanning back to: {}", report.cutoff.format("%Y-%m-%d")),
        String::new(),
    ];

    lines.push(match &report.discovery {
        DiscoveryStatus::Found(count) => format!("Found {count} recent events."),
        DiscoveryStatus::NoEvents => "No events since the cutoff.".to_owned(),
        DiscoveryStatus::Failed(reason) => format!("Could not read the player profile: {reason}"),
    });
    lines.extend(report.events.iter().map(event_line));

    let live: HashSet<RatingCategory> = report
        .events
        .iter()
        .flat_map(|e| e.settled.iter().copied())
        .collect();

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push("   LIVE RATINGS (Including Online)".to_owned());
    lines.push(rule.clone());
    for (category, value) in report.live.iter() {
        let display = match value {
            RatingValue::Rated(rating) if live.contains(&category) => rating.as_str(),
            _ => "No recent play",
        };
        lines.push(format!("{:<16}: {display}", category.label()));
    }
    lines.push(rule);
    join_lines(&lines)
}

/// Joins `lines` with a newline after each one.
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn event_line(report: &EventReport) -> String {
    let venue = if report.scan.online { "online" } else { "in person" };
    let outcome = match &report.scan.outcome {
        SectionState::PlayerFound(_) if !report.settled.is_empty() => {
            let updates: Vec<String> = report
                .settled
                .iter()
                .map(|category| {
                    let value = report
                        .scan
                        .extraction()
                        .and_then(|e| e.get(*category))
                        .unwrap_or_default();
                    format!("{}={value}", category.code())
                })
                .collect();
            format!("updated {}", updates.join(", "))
        }
        SectionState::PlayerFound(_) => "found, nothing newer".to_owned(),
        SectionState::DriverError(reason) => format!("skipped: {reason}"),
        SectionState::Exhausted | SectionState::AtSection(_) => "no rating data found".to_owned(),
    };
    format!(
        "  {}  {:<16} {:<10} {outcome}",
        report.event.date.format("%Y-%m-%d"),
        report.event.id,
        venue
    )
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
