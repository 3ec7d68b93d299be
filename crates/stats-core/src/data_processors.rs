use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses `created` cells from the variety of formats found in spreadsheet
/// exports.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Attempt to parse a cell into a UTC [`DateTime`].
    ///
    /// Handles:
    /// * empty cell   → `None`
    /// * integer/float → Unix timestamp in seconds (Steam's native form).
    /// * ISO 8601 / RFC 3339 (including `Z`-suffix), RFC 2822, or common
    ///   date-time patterns.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(secs) = s.parse::<i64>() {
            return DateTime::from_timestamp(secs, 0);
        }
        if let Ok(f) = s.parse::<f64>() {
            if !f.is_finite() {
                return None;
            }
            // Floor so the nanosecond part is always a forward offset.
            let floor = f.floor();
            let nanos = ((f - floor) * 1_000_000_000.0).round() as u32;
            return DateTime::from_timestamp(floor as i64, nanos.min(999_999_999));
        }

        Self::parse_str(s)
    }

    fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%m/%d/%Y %H:%M:%S",
            "%m/%d/%Y %H:%M",
        ];

        for fmt in FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

        for fmt in DATE_FORMATS {
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        debug!("TimestampProcessor: could not parse \"{}\"", s);
        None
    }
}

// ── FieldParser ───────────────────────────────────────────────────────────────

/// Typed conversions for the non-timestamp cells of a review row.
pub struct FieldParser;

impl FieldParser {
    /// Parse a boolean cell.
    ///
    /// Accepts `true/false`, `1/0`, `yes/no`, `t/f`, `y/n` case-insensitively.
    pub fn parse_bool(raw: &str) -> Option<bool> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "t" | "y" | "1.0" => Some(true),
            "false" | "0" | "no" | "f" | "n" | "0.0" => Some(false),
            _ => None,
        }
    }

    /// Parse a non-negative whole-number cell.
    ///
    /// Integral floats such as `"120.0"` are accepted since workbook numbers
    /// are always stored as floats.
    pub fn parse_minutes(raw: &str) -> Option<u64> {
        let s = raw.trim();
        if let Ok(n) = s.parse::<u64>() {
            return Some(n);
        }
        let f = s.parse::<f64>().ok()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
            Some(f as u64)
        } else {
            None
        }
    }

    /// `true` when a cell carries no value. Whitespace is a value.
    pub fn is_missing(raw: &str) -> bool {
        raw.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
