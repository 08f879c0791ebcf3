use chrono::{DateTime, Utc};

pub const FIXED_TIME_ENV: &str = "LINKSNIFF_FIXED_TIME";

pub fn now_utc() -> DateTime<Utc> {
    if let Ok(value) = std::env::var(FIXED_TIME_ENV) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
            return dt.with_timezone(&Utc);
        }
    }
    Utc::now()
}

/// `YYYY-MM-DD` bucket key for history statistics.
pub fn date_key(ts: &DateTime<Utc>) -> String {
    ts.date_naive().format("%Y-%m-%d").to_string()
}
