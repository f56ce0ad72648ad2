const UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Formats a byte count as the largest of KB/MB/GB whose magnitude is at
/// least one, rounded to one decimal with a trailing `.0` dropped. A value
/// that rounds up to 1024 moves to the next unit.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && round_tenth(value) >= 1024.0 {
        value /= 1024.0;
        unit += 1;
    }
    let mut text = format!("{value:.1}");
    if text.ends_with(".0") {
        text.truncate(text.len() - 2);
    }
    text.push_str(UNITS[unit]);
    text
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Inverse of [`format_size`], up to its rounding.
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim();
    let (idx, unit) = UNITS
        .iter()
        .enumerate()
        .find(|(_, unit)| text.ends_with(*unit))?;
    let value: f64 = text[..text.len() - unit.len()].trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 1024f64.powi(idx as i32 + 1)).round() as u64)
}
