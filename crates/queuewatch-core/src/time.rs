/// Returns a simple ISO 8601 timestamp (Unix epoch seconds with Z suffix).
pub fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}Z", dur.as_secs())
}

/// Convert a report duration cell (`H:MM:SS` or `MM:SS`) to whole seconds.
///
/// Anything that does not have exactly two or three numeric components
/// yields 0. A single bad cell must never abort a refresh cycle, so callers
/// rely on this being total.
pub fn to_seconds(display: &str) -> u64 {
    let mut parts = [0u64; 3];
    let mut count = 0;
    for part in display.split(':') {
        if count == parts.len() {
            return 0;
        }
        let part = part.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        let Ok(value) = part.parse::<u64>() else {
            return 0;
        };
        parts[count] = value;
        count += 1;
    }

    let total = match count {
        3 => parts[0]
            .checked_mul(3600)
            .and_then(|h| parts[1].checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(parts[2])),
        2 => parts[0]
            .checked_mul(60)
            .and_then(|m| m.checked_add(parts[1])),
        _ => None,
    };
    total.unwrap_or(0)
}
