//! Number formatting for tables and exports.
//!
//! Display values use up to `digits` decimals with trailing zeros trimmed and
//! thousands separators (`12,345.678`); export values drop the separators so
//! spreadsheets parse them as numbers. Unknown values render as `-`.

/// Placeholder for an unknown value
pub const UNKNOWN: &str = "-";

/// Format with up to `digits` decimals, trailing zeros trimmed, no grouping.
pub fn format_decimal(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return UNKNOWN.to_string();
    }
    let fixed = format!("{:.*}", digits, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed
    }
}

/// Format like [`format_decimal`] with `,` thousands separators.
pub fn format_display(value: f64, digits: usize) -> String {
    let plain = format_decimal(value, digits);
    if plain == UNKNOWN {
        return plain;
    }

    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// [`format_display`] for an optional value
pub fn format_optional(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format_display(v, digits),
        None => UNKNOWN.to_string(),
    }
}

/// [`format_decimal`] for an optional value
pub fn format_optional_decimal(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format_decimal(v, digits),
        None => UNKNOWN.to_string(),
    }
}
