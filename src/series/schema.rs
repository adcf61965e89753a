//! Ordered-candidate column resolution.
//!
//! Upstream datasets do not guarantee a stable column set, so every lookup
//! goes through an explicit candidate policy instead of assuming a name.
//! `None` means "dataset shape unrecognized", a recoverable condition that
//! the caller surfaces as an empty series, never a fatal error.

/// Timestamp candidates in priority order. DK-local time wins over UTC.
pub const TIMESTAMP_CANDIDATES: &[&str] = &["HourDK", "TimeDK", "HourUTC", "TimeUTC"];

/// Resolve the first candidate present in `available`, case-insensitive
/// exact match, preserving the spelling the upstream actually used.
pub fn resolve_column(available: &[String], candidates: &[&str]) -> Option<String> {
    for &candidate in candidates {
        for name in available {
            if name.eq_ignore_ascii_case(candidate) {
                return Some(name.clone());
            }
        }
    }
    None
}

/// Two-tier measurement resolution.
///
/// First filter `available` down to names containing `keyword` as a
/// case-insensitive substring; then apply `preference` order over that pool.
/// When no preferred name matches, fall back to the first pool member in its
/// original (upstream) order. An empty pool fails the resolution.
pub fn resolve_measurement(
    available: &[String],
    keyword: &str,
    preference: &[&str],
) -> Option<String> {
    let keyword = keyword.to_ascii_lowercase();
    let pool: Vec<&str> = available
        .iter()
        .map(String::as_str)
        .filter(|name| name.to_ascii_lowercase().contains(&keyword))
        .collect();

    for &preferred in preference {
        if let Some(hit) = pool.iter().find(|name| name.eq_ignore_ascii_case(preferred)) {
            return Some((*hit).to_string());
        }
    }

    pool.first().map(|name| (*name).to_string())
}
