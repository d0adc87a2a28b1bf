use chrono::{DateTime, SecondsFormat, Utc};

/// Format an epoch-seconds timestamp as an RFC3339 string.
///
/// Zero and out-of-range timestamps render as an empty string, matching the
/// "unknown creation time" convention used throughout the dossier output.
pub fn ts_to_rfc3339(ts: f64) -> String {
    if ts == 0.0 {
        return String::new();
    }
    match DateTime::<Utc>::from_timestamp(ts.trunc() as i64, 0) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => String::new(),
    }
}

/// The date portion (YYYY-MM-DD) of an epoch-seconds timestamp, or "Unknown".
pub fn ts_to_date_str(ts: f64) -> String {
    let full = ts_to_rfc3339(ts);
    if full.len() >= 10 { full[..10].to_string() } else { "Unknown".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_to_rfc3339() {
        assert_eq!(ts_to_rfc3339(1700000000.0), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_ts_to_rfc3339_zero() {
        assert_eq!(ts_to_rfc3339(0.0), "");
    }

    #[test]
    fn test_ts_to_date_str() {
        assert_eq!(ts_to_date_str(1700000000.0), "2023-11-14");
        assert_eq!(ts_to_date_str(0.0), "Unknown");
    }
}
