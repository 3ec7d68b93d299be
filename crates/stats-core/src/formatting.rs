use crate::models::SummaryStatistics;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // "0.50" -> ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a number of hours with one decimal place and an `h` suffix.
///
/// ```
/// use stats_core::formatting::format_hours;
///
/// assert_eq!(format_hours(6.0), "6.0h");
/// assert_eq!(format_hours(1234.56), "1,234.6h");
/// ```
pub fn format_hours(hours: f64) -> String {
    format!("{}h", format_number(hours, 1))
}

/// Format a `0.0..=1.0` ratio as a percentage with one decimal place.
///
/// ```
/// use stats_core::formatting::format_rate;
///
/// assert_eq!(format_rate(2.0 / 3.0), "66.7%");
/// assert_eq!(format_rate(1.0), "100.0%");
/// ```
pub fn format_rate(rate: f64) -> String {
    format!("{}%", format_number(rate * 100.0, 1))
}

/// One-line human summary of a statistics object, used in run logs.
pub fn summary_line(summary: &SummaryStatistics) -> String {
    format!(
        "{} users, {} liked ({}), {} purchased, {} free, {} total / {} avg playtime",
        format_number(summary.user_count as f64, 0),
        format_number(summary.like_count as f64, 0),
        format_rate(summary.avg_like_rate),
        format_number(summary.purchased_count as f64, 0),
        format_number(summary.free_count as f64, 0),
        format_hours(summary.total_hours),
        format_hours(summary.avg_hours),
    )
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
