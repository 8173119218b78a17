use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Rounds half away from zero (`10.5 -> 11`, `-2.5 -> -3`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_temp(value: f64) -> i64 {
    value.round() as i64
}

#[must_use]
pub fn utc_offset(seconds: Option<i32>) -> FixedOffset {
    seconds
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

#[must_use]
pub fn local_datetime(timestamp: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}
