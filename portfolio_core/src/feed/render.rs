//! HTML fragments for the admin feed and the message overlay. All
//! user-supplied text is escaped here.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use url::Url;

use super::view::{FeedStats, FeedStatus, FeedView};
use crate::config::FeedConfig;
use crate::format::{escape_html, truncate_chars, TimestampFormat};
use crate::locale::{Locale, Text};
use crate::models::{Message, MessageId};

/// `/admin/messages/{id}[/{action}]` with the id percent-encoded.
pub fn message_path(id: &MessageId, action: Option<&str>) -> String {
    let Ok(mut url) = Url::parse("http://admin.invalid/admin/messages") else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id.as_str());
        if let Some(action) = action {
            segments.push(action);
        }
    }
    url.path().to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct FeedRenderer {
    locale: Locale,
    preview_chars: usize,
    timestamps: TimestampFormat,
}

impl FeedRenderer {
    pub fn new(locale: Locale, config: &FeedConfig) -> Self {
        Self {
            locale,
            preview_chars: config.preview_chars,
            timestamps: TimestampFormat {
                locale,
                offset_minutes: config.display_offset_minutes,
            },
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn t(&self, key: Text) -> &'static str {
        self.locale.text(key)
    }

    fn status_badge(&self, read: bool) -> String {
        if read {
            format!(r#"<span class="badge badge-read">{}</span>"#, self.t(Text::StatusRead))
        } else {
            format!(r#"<span class="badge badge-new">{}</span>"#, self.t(Text::StatusNew))
        }
    }

    pub fn render_row(&self, message: &Message, now: DateTime<Utc>) -> String {
        let id = escape_html(message.id.as_str());
        let mut actions = format!(
            r#"<a class="action-view" href="{}">{}</a>"#,
            escape_html(&message_path(&message.id, None)),
            self.t(Text::ActionView)
        );
        if !message.read {
            let _ = write!(
                actions,
                r#"<form class="inline" method="post" action="{}"><button type="submit" class="action-mark">{}</button></form>"#,
                escape_html(&message_path(&message.id, Some("read"))),
                self.t(Text::ActionMark)
            );
        }

        format!(
            concat!(
                r#"<tr class="message-row {}" data-id="{}">"#,
                r#"<td class="status">{}</td>"#,
                r#"<td class="name">{}</td>"#,
                r#"<td class="email">{}</td>"#,
                r#"<td class="preview">{}</td>"#,
                r#"<td class="date">{}</td>"#,
                r#"<td class="actions">{}</td>"#,
                "</tr>"
            ),
            if message.read { "read" } else { "unread" },
            id,
            self.status_badge(message.read),
            escape_html(&message.name),
            escape_html(&message.email),
            escape_html(&truncate_chars(&message.message, self.preview_chars)),
            escape_html(&self.timestamps.display(&message.timestamp, now)),
            actions
        )
    }

    pub fn render_rows(&self, messages: &[Message], now: DateTime<Utc>) -> String {
        messages
            .iter()
            .map(|message| self.render_row(message, now))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The message table, or the placeholder when the collection is empty.
    pub fn render_table(&self, view: &FeedView, now: DateTime<Utc>) -> String {
        if view.is_empty() {
            if view.status == FeedStatus::Loading {
                return format!(
                    r#"<div id="no-messages" class="placeholder">{}</div>"#,
                    self.t(Text::FeedLoading)
                );
            }
            return format!(
                r#"<div id="no-messages" class="placeholder">{}</div>"#,
                self.t(Text::NoMessages)
            );
        }

        format!(
            concat!(
                r#"<table class="messages"><thead><tr>"#,
                "<th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th>",
                r#"</tr></thead><tbody id="messages-tbody">"#,
                "{}",
                "</tbody></table>"
            ),
            self.t(Text::FieldStatus),
            self.t(Text::FieldName),
            self.t(Text::FieldEmail),
            self.t(Text::FieldMessage),
            self.t(Text::FieldDate),
            self.t(Text::ColumnActions),
            self.render_rows(&view.messages, now)
        )
    }

    pub fn render_stats(&self, stats: &FeedStats) -> String {
        format!(
            concat!(
                r#"<div class="stats">"#,
                r#"<div class="stat"><span class="stat-label">{}</span><span class="stat-value" id="total-messages">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">{}</span><span class="stat-value" id="unread-messages">{}</span></div>"#,
                r#"<div class="stat"><span class="stat-label">{}</span><span class="stat-value" id="read-messages">{}</span></div>"#,
                "</div>"
            ),
            self.t(Text::StatsTotal),
            stats.total,
            self.t(Text::StatsUnread),
            stats.unread,
            self.t(Text::StatsRead),
            stats.read
        )
    }

    /// Persistent banner with a retry action while the subscription is down.
    pub fn render_banner(&self, status: &FeedStatus) -> String {
        match status {
            FeedStatus::Failed(_) => format!(
                concat!(
                    r#"<div class="banner banner-error" role="alert"><span>{}</span>"#,
                    r#"<form class="inline" method="post" action="/admin/feed/retry"><button type="submit">{}</button></form>"#,
                    "</div>"
                ),
                self.t(Text::FeedFailed),
                self.t(Text::ActionRetry)
            ),
            FeedStatus::Loading | FeedStatus::Live => String::new(),
        }
    }

    pub fn render_detail(&self, message: &Message, now: DateTime<Utc>) -> String {
        let state = if message.read {
            format!(r#"<span class="state-read">{}</span>"#, self.t(Text::StatusRead))
        } else {
            format!(r#"<span class="state-unread">{}</span>"#, self.t(Text::StatusUnread))
        };
        let mark = if message.read {
            String::new()
        } else {
            format!(
                r#"<form method="post" action="{}"><button type="submit" class="button-mark">{}</button></form>"#,
                escape_html(&message_path(&message.id, Some("read"))),
                self.t(Text::ActionMarkAsRead)
            )
        };

        format!(
            concat!(
                r#"<div class="overlay" id="message-modal" role="dialog" aria-modal="true">"#,
                r#"<form class="overlay-backdrop" method="post" action="/admin/overlay/dismiss"><button type="submit" class="backdrop-hit" aria-label="{close}"></button></form>"#,
                r#"<div class="overlay-content" id="modal-content">"#,
                r#"<form class="overlay-close" method="post" action="/admin/overlay/close"><button type="submit" id="close-modal-btn">{close}</button></form>"#,
                r#"<dl class="detail">"#,
                "<dt>{name_label}</dt><dd>{name}</dd>",
                "<dt>{email_label}</dt><dd>{email}</dd>",
                r#"<dt>{message_label}</dt><dd class="message-body">{message}</dd>"#,
                "<dt>{date_label}</dt><dd>{date}</dd>",
                "<dt>{status_label}</dt><dd>{state}</dd>",
                "</dl>{mark}</div></div>"
            ),
            close = self.t(Text::ActionClose),
            name_label = self.t(Text::FieldName),
            name = escape_html(&message.name),
            email_label = self.t(Text::FieldEmail),
            email = escape_html(&message.email),
            message_label = self.t(Text::FieldMessage),
            message = escape_html(&message.message),
            date_label = self.t(Text::FieldDate),
            date = escape_html(&self.timestamps.display(&message.timestamp, now)),
            status_label = self.t(Text::FieldStatus),
            state = state,
            mark = mark
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoredMessage;
    use chrono::TimeZone;

    fn renderer() -> FeedRenderer {
        FeedRenderer::new(Locale::En, &FeedConfig::default())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap()
    }

    fn message(id: &str, read: bool, text: &str) -> Message {
        Message::from_stored(
            MessageId::parse(id).unwrap(),
            StoredMessage {
                name: "Ana".into(),
                email: "a@b.com".into(),
                message: text.into(),
                timestamp: "2026-10-18T14:00:00.000Z".into(),
                read,
            },
        )
    }

    #[test]
    fn unread_rows_offer_mark_action_and_read_rows_do_not() {
        let renderer = renderer();
        let unread = renderer.render_row(&message("m1", false, "hi"), now());
        let read = renderer.render_row(&message("m2", true, "hi"), now());

        assert!(unread.contains(r#"action="/admin/messages/m1/read""#));
        assert!(unread.contains(r#"href="/admin/messages/m1""#));
        assert!(!read.contains("/read\""));
        assert!(read.contains(r#"href="/admin/messages/m2""#));
        assert!(unread.contains("5 minutes ago"));
    }

    #[test]
    fn script_in_any_field_renders_as_text() {
        let renderer = renderer();
        let mut hostile = message("m1", false, "<script>alert(1)</script>");
        hostile.name = "<script>x</script>".into();
        hostile.email = "\"><img src=x onerror=alert(1)>".into();
        hostile.timestamp = "<script>t</script>".into();

        let row = renderer.render_row(&hostile, now());
        let detail = renderer.render_detail(&hostile, now());
        for html in [&row, &detail] {
            assert!(!html.contains("<script>"));
            assert!(!html.contains("<img"));
            assert!(html.contains("&lt;script&gt;"));
        }
    }

    #[test]
    fn long_messages_are_truncated_in_the_table_but_not_the_overlay() {
        let renderer = renderer();
        let long = "x".repeat(200);
        let row = renderer.render_row(&message("m1", false, &long), now());
        let detail = renderer.render_detail(&message("m1", false, &long), now());
        assert!(row.contains(&format!("{}…", "x".repeat(80))));
        assert!(!row.contains(&"x".repeat(81)));
        assert!(detail.contains(&long));
    }

    #[test]
    fn empty_feed_renders_placeholder_and_zero_counters() {
        let renderer = renderer();
        let view = FeedView::from_snapshot(Vec::new());
        let table = renderer.render_table(&view, now());
        let stats = renderer.render_stats(&view.stats);

        assert!(table.contains("No messages yet"));
        assert!(!table.contains("<table"));
        assert!(stats.contains(r#"id="total-messages">0<"#));
        assert!(stats.contains(r#"id="unread-messages">0<"#));
        assert!(stats.contains(r#"id="read-messages">0<"#));
    }

    #[test]
    fn failed_feed_shows_retry_banner() {
        let renderer = renderer();
        assert!(renderer.render_banner(&FeedStatus::Live).is_empty());
        let banner = renderer.render_banner(&FeedStatus::Failed("permission denied".into()));
        assert!(banner.contains("/admin/feed/retry"));
        assert!(banner.contains("Retry"));
    }

    #[test]
    fn detail_offers_mark_as_read_only_when_unread() {
        let renderer = renderer();
        assert!(renderer
            .render_detail(&message("m1", false, "hi"), now())
            .contains("Mark as read"));
        assert!(!renderer
            .render_detail(&message("m1", true, "hi"), now())
            .contains("Mark as read"));
    }

    #[test]
    fn message_paths_encode_ids() {
        let id = MessageId::parse("a b?c").unwrap();
        assert_eq!(message_path(&id, Some("read")), "/admin/messages/a%20b%3Fc/read");
    }
}
