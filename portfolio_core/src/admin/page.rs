use chrono::{DateTime, Utc};

use super::context::AdminContext;
use crate::detail::Overlay;
use crate::feed::FeedView;
use crate::format::escape_html;
use crate::locale::{Locale, Text};

/// Keeps the dashboard in step with the session's feed socket.
const FEED_SCRIPT: &str = r##"<script>
(function () {
  var panel = document.getElementById("admin-panel");
  if (!panel || !window.WebSocket) return;
  var scheme = location.protocol === "https:" ? "wss://" : "ws://";
  var socket = new WebSocket(scheme + location.host + panel.dataset.feedSocket);
  function set(id, value) {
    var el = document.getElementById(id);
    if (el) el.textContent = value;
  }
  socket.onmessage = function (event) {
    var frame = JSON.parse(event.data);
    var data = frame.data || {};
    switch (frame.type) {
      case "FeedRendered":
        set("total-messages", data.stats.total);
        set("unread-messages", data.stats.unread);
        set("read-messages", data.stats.read);
        document.getElementById("feed-table").innerHTML = data.table_html;
        document.getElementById("feed-banner").innerHTML = "";
        break;
      case "FeedFailed":
        if (!document.querySelector("#feed-banner .banner-error")) location.reload();
        break;
      case "OverlayOpened":
        var current = document.getElementById("message-modal");
        if (current) current.outerHTML = data.html;
        else document.body.insertAdjacentHTML("beforeend", data.html);
        break;
      case "OverlayClosed":
        var open = document.getElementById("message-modal");
        if (open) open.remove();
        break;
      case "SignedOut":
        location.assign("/admin");
        break;
    }
  };
})();
</script>"##;

fn layout(locale: Locale, title: &str, body_class: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="{lang}"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "<title>{title}</title>",
            r#"<link rel="stylesheet" href="/assets/site.css">"#,
            r#"</head><body class="{class}">{body}</body></html>"#
        ),
        lang = locale.lang_tag(),
        title = escape_html(title),
        class = body_class,
        body = body
    )
}

pub fn render_login(locale: Locale, error: Option<&str>, email: &str, google_enabled: bool) -> String {
    let t = |key| locale.text(key);

    let error = error
        .map(|message| {
            format!(
                r#"<p class="login-error" id="login-error" role="alert">{}</p>"#,
                escape_html(message)
            )
        })
        .unwrap_or_default();

    let google = if google_enabled {
        format!(
            r#"<a class="button button-google" id="google-login-btn" href="/admin/login/google">{}</a>"#,
            t(Text::ActionLoginGoogle)
        )
    } else {
        String::new()
    };

    let body = format!(
        concat!(
            r#"<main class="login-container" id="login-container">"#,
            "<h1>{title}</h1>{error}",
            r#"<form class="login-form" id="login-form" method="post" action="/admin/login">"#,
            r#"<label for="email">{email_label}</label>"#,
            r#"<input type="email" id="email" name="email" value="{email}" required autocomplete="username">"#,
            r#"<label for="password">{password_label}</label>"#,
            r#"<input type="password" id="password" name="password" required autocomplete="current-password">"#,
            r#"<button type="submit" class="button">{login}</button>"#,
            "</form>{google}</main>"
        ),
        title = t(Text::LoginTitle),
        error = error,
        email_label = t(Text::FieldEmail),
        email = escape_html(email),
        password_label = t(Text::FieldPassword),
        login = t(Text::ActionLogin),
        google = google
    );

    layout(locale, t(Text::LoginTitle), "admin login", &body)
}

pub fn render_dashboard(
    context: &AdminContext,
    view: &FeedView,
    alert: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let renderer = context.renderer();
    let locale = renderer.locale();
    let t = |key| locale.text(key);

    let overlay = match context.overlay() {
        Overlay::Open(message) => renderer.render_detail(&message, now),
        Overlay::Closed => String::new(),
    };

    let alert = alert
        .map(|message| {
            format!(
                concat!(
                    r#"<div class="alert-backdrop"><div class="alert" role="alertdialog" aria-modal="true">"#,
                    r#"<p>{}</p><a class="button" href="/admin">{}</a></div></div>"#
                ),
                escape_html(message),
                t(Text::ActionOk)
            )
        })
        .unwrap_or_default();

    let body = format!(
        concat!(
            r#"<header class="admin-header"><h1>{title}</h1>"#,
            r#"<div class="operator"><span>{signed_in_as} <strong id="user-email">{email}</strong></span>"#,
            r#"<form class="inline" method="post" action="/admin/logout"><button type="submit" id="logout-btn">{logout}</button></form>"#,
            "</div></header>",
            r#"<main class="admin-panel" id="admin-panel" data-feed-socket="/admin/feed">"#,
            r#"<div id="feed-banner">{banner}</div>{stats}<section id="feed-table">{table}</section>"#,
            "</main>{overlay}{alert}{script}"
        ),
        title = t(Text::AdminTitle),
        signed_in_as = t(Text::SignedInAs),
        email = escape_html(&context.operator().email),
        logout = t(Text::ActionLogout),
        banner = renderer.render_banner(&view.status),
        stats = renderer.render_stats(&view.stats),
        table = renderer.render_table(view, now),
        overlay = overlay,
        alert = alert,
        script = FEED_SCRIPT
    );

    layout(locale, t(Text::AdminTitle), "admin dashboard", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_escapes_echoed_values() {
        let html = render_login(
            Locale::En,
            Some("<b>bad</b>"),
            "\"><script>x</script>",
            false,
        );
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("/admin/login/google"));
    }

    #[test]
    fn feed_script_swaps_the_rendered_regions() {
        assert!(FEED_SCRIPT.contains("panel.dataset.feedSocket"));
        for id in [
            "feed-table",
            "feed-banner",
            "total-messages",
            "unread-messages",
            "read-messages",
            "message-modal",
        ] {
            assert!(FEED_SCRIPT.contains(id), "script does not touch #{}", id);
        }
    }

    #[test]
    fn google_button_only_when_configured() {
        let html = render_login(Locale::Es, None, "", true);
        assert!(html.contains(r#"href="/admin/login/google""#));
        assert!(html.contains("Continuar con Google"));
        assert!(!html.contains("login-error"));
    }
}
