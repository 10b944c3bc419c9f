//! Human readable durations for operator-facing status text

use std::time::Duration;

const UNITS: &[(&str, u64)] = &[("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

/// Render a duration as `1d 2h 3m 4s`, omitting zero-valued units.
///
/// Sub-second durations render as `0s` so status text always carries a value.
pub fn readable_duration(elapsed: Duration) -> String {
    let mut remaining = elapsed.as_secs();
    if remaining == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::with_capacity(UNITS.len());
    for (suffix, size) in UNITS {
        let amount = remaining / size;
        if amount > 0 {
            parts.push(format!("{amount}{suffix}"));
            remaining %= size;
        }
    }
    parts.join(" ")
}
