//! Utility functions for dynawrap

use std::time::Duration;

/// Parse duration string (e.g., "500ms", "30s", "5m", "1h")
pub fn parse_duration(s: &str) -> crate::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(crate::Error::InvalidConfig("empty duration".into()));
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (num_str, unit) = s.split_at(split);

    let num: u64 = num_str
        .parse()
        .map_err(|_| crate::Error::InvalidConfig(format!("invalid duration: {}", s)))?;

    let duration = match unit {
        "" | "ms" => Duration::from_millis(num),
        "s" => Duration::from_secs(num),
        "m" => Duration::from_secs(num * 60),
        "h" => Duration::from_secs(num * 3600),
        _ => {
            return Err(crate::Error::InvalidConfig(format!(
                "unknown duration unit: {}",
                unit
            )))
        }
    };

    Ok(duration)
}

/// Parse a comma-separated backoff schedule, e.g. "0,500ms,1s".
pub fn parse_intervals(s: &str) -> crate::Result<Vec<Duration>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_duration)
        .collect()
}

/// Number of requests needed to cover `total` items at `chunk_size` per request,
/// and the size of the last request.
pub fn chunk_plan(total: usize, chunk_size: usize) -> (usize, usize) {
    if total == 0 || chunk_size == 0 {
        return (0, 0);
    }
    let requests = total.div_ceil(chunk_size);
    let last = match total % chunk_size {
        0 => chunk_size,
        rem => rem,
    };
    (requests, last)
}
