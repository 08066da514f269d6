//! Patch wear-time normalization.

use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(days|day|hours|hour|hrs|hr)").expect("duration pattern is valid")
});

/// Normalize a duration to `"<N> days"` or `"<N> hours"`.
///
/// Input is lowercased and trimmed, then must start with an integer and a
/// unit. Anything else, fractional values included, yields an empty string.
pub fn normalize_duration(duration: &str) -> String {
    let duration = duration.trim().to_lowercase();

    let Some(caps) = DURATION_RE.captures(&duration) else {
        return String::new();
    };

    let number = &caps[1];
    let unit = &caps[2];
    if unit.contains("hour") || unit.contains("hr") {
        format!("{} hours", number)
    } else {
        format!("{} days", number)
    }
}
