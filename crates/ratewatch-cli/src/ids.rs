//! Working out which member ids a `live` run should process.
//!
//! Precedence: ids given on the command line, then the first line of the
//! `--input` file, then the first line of the first usable `*.csv` in the
//! working directory, then [`DEFAULT_ID`].

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Member processed when nothing else names one.
pub(crate) const DEFAULT_ID: &str = "32073536";

/// Resolves the ids to process.
///
/// # Errors
///
/// Returns an error only when an explicit `input` file cannot be read.
/// Auto-discovered files that cannot be read are skipped.
pub(crate) fn gather_ids(
    args: &[String],
    input: Option<&Path>,
    dir: &Path,
) -> anyhow::Result<Vec<String>> {
    let from_args = ids_from_args(args);
    if !from_args.is_empty() {
        return Ok(from_args);
    }

    if let Some(path) = input {
        let ids = ids_from_csv(path)
            .with_context(|| format!("failed to read ids from {}", path.display()))?;
        if !ids.is_empty() {
            tracing::info!(path = %path.display(), count = ids.len(), "ids read from input file");
            return Ok(ids);
        }
    }

    for path in candidate_csv_files(dir) {
        match ids_from_csv(&path) {
            Ok(ids) if !ids.is_empty() => {
                tracing::info!(path = %path.display(), count = ids.len(), "ids read from csv file");
                return Ok(ids);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable csv");
            }
        }
    }

    tracing::info!(id = DEFAULT_ID, "no ids given; using default member");
    Ok(vec![DEFAULT_ID.to_owned()])
}

/// Splits arguments on commas and whitespace, keeping all-digit tokens.
pub(crate) fn ids_from_args(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(|c: char| c == ',' || c.is_whitespace()))
        .map(str::trim)
        .filter(|token| is_id(token))
        .map(str::to_owned)
        .collect()
}

/// All-digit fields of the first non-empty line of a CSV file.
pub(crate) fn ids_from_csv(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record
        .iter()
        .filter(|field| is_id(field))
        .map(str::to_owned)
        .collect())
}

/// `*.csv` files in `dir` whose name does not contain "output", sorted by
/// name so the pick is stable.
fn candidate_csv_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| !name.contains("output"))
        })
        .collect();
    files.sort();
    files
}

fn is_id(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
