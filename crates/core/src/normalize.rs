//! Pure conversion of free-text board values into typed analytic fields.
//!
//! Every function here is total: malformed input degrades to the documented
//! default (`0`, `"Unknown"`, `"Other"`) instead of failing, so a single bad
//! cell can never abort a board analysis.

use crate::domain::{
    NormalizedRecord, RawRecord, DEFAULT_SECTOR, DEFAULT_STAGE, DEFAULT_STATUS,
};

/// Parse a monetary display text such as `"$10k"`, `"₹2l"` or `"1,500,000"`.
///
/// Currency symbols and thousands separators are stripped, then a trailing
/// magnitude suffix is applied: `k` ×1 000, `m` ×1 000 000, `l` (lakh)
/// ×100 000. Anything that still fails to parse as a decimal yields `0.0`.
pub fn normalize_revenue(raw: &str) -> f64 {
    let stripped: String = raw.chars().filter(|ch| !matches!(ch, '₹' | '$' | ',')).collect();
    let clean = stripped.trim().to_lowercase();

    let (number, multiplier) = if let Some(prefix) = clean.strip_suffix('k') {
        (prefix, 1_000.0)
    } else if let Some(prefix) = clean.strip_suffix('m') {
        (prefix, 1_000_000.0)
    } else if let Some(prefix) = clean.strip_suffix('l') {
        (prefix, 100_000.0)
    } else {
        (clean.as_str(), 1.0)
    };

    match number.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value * multiplier,
        _ => 0.0,
    }
}

/// Parse a close-probability display text such as `"45%"` or `"0.3"`.
///
/// A parsed value greater than `1` is assumed to be on the 0–100 percentage
/// scale and is divided by 100; values less than or equal to `1` are taken
/// as already fractional, so `"1"` means 100%, not 1%. The >1 test runs
/// once, on the raw parsed number: `"150"` yields `1.5`.
pub fn normalize_probability(raw: &str) -> f64 {
    let clean = raw.replace('%', "");
    match clean.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value > 1.0 {
                value / 100.0
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Normalize a page of raw board items into one [`NormalizedRecord`] each.
///
/// Field classification is a case-insensitive substring match on the column
/// identifier, tested in rule order: `revenue|amount|value`, then `prob`,
/// then `stage|status` (one source text feeds both attributes), then
/// `sector|industry`. The first matching rule wins per field; unmatched
/// fields are ignored. When two fields of one record classify the same way,
/// the later field overwrites the earlier one; last-write-wins is part of
/// the contract because it determines which column feeds the aggregates.
/// Attributes no field supplied fall back to the documented defaults.
pub fn normalize_board_data(records: &[RawRecord]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize_record).collect()
}

fn normalize_record(record: &RawRecord) -> NormalizedRecord {
    let mut revenue = None;
    let mut probability = None;
    let mut stage = None;
    let mut status = None;
    let mut sector = None;

    for field in &record.fields {
        let field_id = field.id.to_lowercase();
        let text = field.text.as_deref().unwrap_or("");

        // Rule order is load-bearing: a column id like `status_value`
        // contains `value` and therefore classifies as revenue.
        if contains_any(&field_id, &["revenue", "amount", "value"]) {
            revenue = Some(normalize_revenue(text));
        } else if field_id.contains("prob") {
            probability = Some(normalize_probability(text));
        } else if contains_any(&field_id, &["stage", "status"]) {
            let label = non_empty_or(text, DEFAULT_STAGE);
            stage = Some(label.clone());
            status = Some(label);
        } else if contains_any(&field_id, &["sector", "industry"]) {
            sector = Some(non_empty_or(text, DEFAULT_SECTOR));
        }
    }

    NormalizedRecord {
        id: record.id.clone(),
        name: record.name.clone(),
        revenue: revenue.unwrap_or(0.0),
        probability: probability.unwrap_or(0.0),
        stage: stage.unwrap_or_else(|| DEFAULT_STAGE.to_string()),
        status: status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        sector: sector.unwrap_or_else(|| DEFAULT_SECTOR.to_string()),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn non_empty_or(text: &str, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}
