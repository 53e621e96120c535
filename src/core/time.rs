use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime, PrimitiveDateTime};

/// Timestamps are stored as `TIMESTAMP` (no zone) and are always UTC.
pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn plus_minutes(value: PrimitiveDateTime, minutes: i32) -> PrimitiveDateTime {
    value + Duration::minutes(i64::from(minutes))
}
