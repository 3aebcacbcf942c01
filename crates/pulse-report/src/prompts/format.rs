//! Number formatting for posted messages
//!
//! Every helper returns `N/A` for a missing or non-finite value, so no `NaN`
//! or `inf` ever reaches a message.

use pulse_prompt::Language;

pub const NOT_AVAILABLE: &str = "N/A";

/// `0.1234` as `12.34%`
pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Two-decimal ratio
pub fn format_ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Large amounts in language-specific units
///
/// English uses T/B/M, Japanese uses 兆 (10^12) and 億 (10^8). Smaller values
/// are printed whole with thousands separators.
pub fn format_large_number(value: Option<f64>, lang: Language) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let units: &[(f64, &str)] = match lang {
        Language::Japanese => &[(1e12, " 兆"), (1e8, " 億")],
        _ => &[(1e12, "T"), (1e9, "B"), (1e6, "M")],
    };

    for &(scale, unit) in units {
        if v.abs() >= scale {
            return format!("{:.2}{unit}", v / scale);
        }
    }

    group_thousands(v.round() as i64)
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
