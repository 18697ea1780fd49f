use std::time::SystemTime;

use chrono::{DateTime, Local};

pub fn format_datetime(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `"start -> end"` stamp recorded in each entry's `request_time` field.
pub fn format_span(start: SystemTime, end: SystemTime) -> String {
    format!("{} -> {}", format_datetime(start), format_datetime(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn span_joins_two_stamps() {
        let start = SystemTime::now();
        let span = format_span(start, start + Duration::from_secs(1));
        let (left, right) = span.split_once(" -> ").unwrap();
        assert_eq!(left.len(), "2026-01-01 00:00:00".len());
        assert_eq!(right.len(), left.len());
    }
}
