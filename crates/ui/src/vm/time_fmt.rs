use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_now;

    #[test]
    fn formats_utc_timestamp() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13:20 UTC");
    }
}
