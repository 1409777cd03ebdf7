use time::OffsetDateTime;

/// Current UTC time, truncated to microseconds so it survives a Postgres round-trip.
pub fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}
