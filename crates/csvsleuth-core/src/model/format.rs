/// Number formatting utilities for highlight cards and the history list.
///
/// Spend values are `f64` internally. Rounding only happens at the
/// display-formatting boundary.

/// Format a spend amount.
///
/// Whole values are printed without a fractional part; anything else is
/// rounded to two decimals with trailing zeros removed.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a row count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
