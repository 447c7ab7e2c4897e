//! Text helpers shared by the HTML renderers.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};

use crate::locale::Locale;
use crate::models::message::parse_timestamp;

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Cuts `text` to at most `max_chars` characters, appending an ellipsis when
/// anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => format!("{}…", text[..byte_index].trim_end()),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimestampFormat {
    pub locale: Locale,
    pub offset_minutes: i32,
}

impl TimestampFormat {
    /// Relative for the last 24 hours, absolute after that. Unparseable input
    /// is returned as-is; callers escape it.
    pub fn display(&self, raw: &str, now: DateTime<Utc>) -> String {
        match parse_timestamp(raw) {
            Some(timestamp) => self.display_parsed(timestamp, now),
            None => raw.to_string(),
        }
    }

    pub fn display_parsed(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(timestamp);
        if elapsed.num_milliseconds() < 0 {
            return self.locale.minutes_ago(0);
        }

        let hours = elapsed.num_hours();
        if hours < 1 {
            self.locale.minutes_ago(elapsed.num_minutes())
        } else if hours < 24 {
            self.locale.hours_ago(hours)
        } else {
            self.absolute(timestamp)
        }
    }

    pub fn absolute(&self, timestamp: DateTime<Utc>) -> String {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        let local = timestamp.with_timezone(&offset);
        self.locale.absolute_date(
            local.day(),
            local.month(),
            local.year(),
            local.hour(),
            local.minute(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap()
    }

    fn en() -> TimestampFormat {
        TimestampFormat {
            locale: Locale::En,
            offset_minutes: 0,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script> & \"q\""),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt; &amp; &quot;q&quot;"
        );
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
        assert_eq!(truncate_chars("ñandú ñandú", 5), "ñandú…");
        assert_eq!(truncate_chars("one two three", 4), "one…");
    }

    #[test]
    fn relative_and_absolute_ranges() {
        let format = en();
        let now = now();
        assert_eq!(format.display_parsed(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format.display_parsed(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(format.display_parsed(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(format.display_parsed(now - Duration::hours(23), now), "23 hours ago");
        assert_eq!(
            format.display_parsed(now - Duration::hours(24), now),
            "17 October 2026, 14:05"
        );
    }

    #[test]
    fn future_timestamps_show_zero_minutes() {
        let now = now();
        assert_eq!(en().display_parsed(now + Duration::minutes(5), now), "0 minutes ago");
    }

    #[test]
    fn absolute_dates_respect_display_offset() {
        let format = TimestampFormat {
            locale: Locale::Es,
            offset_minutes: 120,
        };
        let timestamp = Utc.with_ymd_and_hms(2026, 1, 3, 23, 30, 0).unwrap();
        assert_eq!(format.absolute(timestamp), "4 de enero de 2026, 01:30");
    }

    #[test]
    fn unparseable_text_passes_through() {
        assert_eq!(en().display("not a date", now()), "not a date");
    }
}
