use std::collections::BTreeMap;

use reqwest::Url;

use crate::types::{Condition, Record, RecordTableRow};

/// Whether an answer to a yes/no question means yes.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Local file name for an image URL.
///
/// Takes the last path segment of the URL and replaces every character
/// outside `[A-Za-z0-9._-]` with `_`. Returns `None` when nothing usable is
/// left.
pub fn sanitize_image_filename(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let sanitized: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return None;
    }

    Some(sanitized)
}

/// Totals in grade order, best condition first; unknown grades follow
/// alphabetically.
pub fn ordered_totals(totals: &BTreeMap<String, f64>) -> Vec<(String, f64)> {
    let mut ordered: Vec<(String, f64)> = Condition::ALL
        .iter()
        .filter_map(|c| totals.get(c.label()).map(|v| (c.label().to_string(), *v)))
        .collect();

    ordered.extend(
        totals
            .iter()
            .filter(|(grade, _)| Condition::from_label(grade).is_none())
            .map(|(grade, value)| (grade.clone(), *value)),
    );

    ordered
}

pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn record_table_row(record: &Record) -> RecordTableRow {
    let release = record.release.as_ref();
    let join = |values: Option<&Vec<String>>| {
        values
            .map(|v| v.iter().take(3).cloned().collect::<Vec<_>>().join(","))
            .unwrap_or_default()
    };

    RecordTableRow {
        key: record.key.clone(),
        title: record.title().unwrap_or_default().to_string(),
        year: release
            .and_then(|r| r.year.as_ref())
            .map(|y| y.to_string())
            .unwrap_or_default(),
        country: release
            .and_then(|r| r.country.clone())
            .unwrap_or_default(),
        genre: join(release.map(|r| &r.genre)),
        label: join(release.map(|r| &r.label)),
        tracks: record
            .tracklist
            .as_ref()
            .map(|t| t.len().to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}
