//! Pure normalization of raw feed bytes into [`EntryUpdate`] batches.
//!
//! No I/O happens here: both feed clients hand their response bodies to these
//! functions, which makes the date/number edge cases testable in isolation
//! from any network behavior.
//!
//! Leniency rules (deliberate, per the upstream's undocumented format):
//! - one malformed CSV row is skipped with a diagnostic, never aborting the
//!   batch;
//! - a numeric field that fails to parse is stored as zero and counted in
//!   [`FeedBatch::defaulted_fields`] rather than failing the row;
//! - an absent embedded weight array yields an empty batch, not an error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::contract::{EntryUpdate, FeedBatch};

/// Diet CSV date format after the weekday prefix is stripped, e.g.
/// "January 2, 2012".
const DIET_DATE_FORMAT: &str = "%B %d, %Y";

/// Weight record display-date format, e.g. "2012-01-02".
const WEIGHT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The inline script variable the weight page assigns its JSON array to.
/// Compiled once; both patterns are hit once per row/record.
fn weight_data_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"var weight_data = (\[[^\[]+\])").unwrap())
}

/// Leading two-letter day-of-week abbreviation and comma on diet dates.
fn weekday_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*[A-Za-z]{2},\s*").unwrap())
}

/// One element of the embedded weight array.
#[derive(Debug, Deserialize)]
struct WeightRecord {
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    datestamp: String,
}

/// Parse the diary CSV export body into diet updates.
///
/// The first row is a header and is discarded unconditionally. Each remaining
/// row carries five ordered fields: date, calorie goal, calories consumed,
/// calories burned, net calories.
pub fn parse_diet_csv(body: &str) -> FeedBatch {
    let mut batch = FeedBatch::default();

    for (index, line) in body.lines().enumerate() {
        if index == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_csv_row(line);
        if fields.len() != 5 {
            warn!(
                row = index + 1,
                columns = fields.len(),
                "Skipping diet row without the five expected columns"
            );
            batch.skipped += 1;
            continue;
        }

        let date = match parse_diet_date(&fields[0]) {
            Some(date) => date,
            None => {
                warn!(row = index + 1, raw = %fields[0], "Skipping diet row with unparsable date");
                batch.skipped += 1;
                continue;
            }
        };

        let calorie_goal = lenient_number(&fields[1], "calorie_goal", date, &mut batch);
        let calories_consumed = lenient_number(&fields[2], "calories_consumed", date, &mut batch);
        let calories_burned = lenient_number(&fields[3], "calories_burned", date, &mut batch);
        let net_calories = lenient_number(&fields[4], "net_calories", date, &mut batch);

        batch.updates.push(EntryUpdate::diet(
            date,
            calorie_goal,
            calories_consumed,
            calories_burned,
            net_calories,
        ));
    }

    batch
}

/// Extract the embedded weight array from the weight page HTML and parse it
/// into weight updates. A page without the expected variable yields an empty
/// batch — weight data being absent is not an error.
pub fn extract_weight_records(html: &str) -> FeedBatch {
    let mut batch = FeedBatch::default();

    let raw = match weight_data_pattern().captures(html).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => {
            debug!("Weight page carries no embedded weight_data array");
            return batch;
        }
    };

    let records: Vec<WeightRecord> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Embedded weight_data array is not valid JSON, treating as absent");
            return batch;
        }
    };

    for record in records {
        let weight = match record.weight {
            Some(w) => w,
            None => {
                warn!(datestamp = %record.datestamp, "Skipping weight record without a weight value");
                batch.skipped += 1;
                continue;
            }
        };
        match NaiveDate::parse_from_str(&record.datestamp, WEIGHT_DATE_FORMAT) {
            Ok(date) => batch.updates.push(EntryUpdate::weight(date, weight)),
            Err(e) => {
                warn!(datestamp = %record.datestamp, error = %e, "Skipping weight record with unparsable date");
                batch.skipped += 1;
            }
        }
    }

    batch
}

/// Parse a diet CSV date field. The field carries a leading two-letter
/// day-of-week abbreviation and comma ("Mo, January 2, 2012") which is
/// stripped before parsing.
pub fn parse_diet_date(raw: &str) -> Option<NaiveDate> {
    let stripped = weekday_prefix_pattern().replace(raw.trim(), "");
    NaiveDate::parse_from_str(stripped.trim(), DIET_DATE_FORMAT).ok()
}

/// Parse a numeric CSV field, defaulting to zero on failure. The default is
/// counted and logged so the data-quality compromise stays visible.
fn lenient_number(raw: &str, field: &str, date: NaiveDate, batch: &mut FeedBatch) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            warn!(%date, field, raw = %raw, "Numeric field failed to parse, storing zero");
            batch.defaulted_fields += 1;
            0.0
        }
    }
}

/// Split one CSV row into its fields, honoring double-quoted fields (commas
/// inside quotes do not split; doubled quotes escape a literal quote).
pub fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
