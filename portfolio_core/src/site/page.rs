use chrono::{DateTime, Datelike, Utc};
use std::fmt::Write;

use crate::config::SiteConfig;
use crate::format::escape_html;
use crate::locale::{Locale, Text};
use crate::models::ContactSubmission;

/// Result of a `POST /contact`, shown as a toast on the re-rendered page.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactOutcome {
    Sent,
    /// The submitted values are put back into the form.
    Failed {
        submitted: ContactSubmission,
        missing: Option<Text>,
    },
}

impl ContactOutcome {
    pub fn failed(submitted: ContactSubmission) -> Self {
        let missing = missing_field(&submitted);
        ContactOutcome::Failed { submitted, missing }
    }
}

/// The first blank field, in form order.
pub fn missing_field(submission: &ContactSubmission) -> Option<Text> {
    if submission.name.trim().is_empty() {
        Some(Text::ContactMissingName)
    } else if submission.email.trim().is_empty() {
        Some(Text::ContactMissingEmail)
    } else if submission.message.trim().is_empty() {
        Some(Text::ContactMissingMessage)
    } else {
        None
    }
}

pub fn render_home(site: &SiteConfig, outcome: Option<&ContactOutcome>, now: DateTime<Utc>) -> String {
    let locale = site.locale;

    let body = format!(
        concat!(
            r#"<div id="scroll-progress" class="scroll-progress"></div>"#,
            "{header}",
            "<main>{hero}{about}{projects}{contact}</main>",
            "{footer}{toast}"
        ),
        header = render_header(site),
        hero = render_hero(site),
        about = render_about(site),
        projects = render_projects(site),
        contact = render_contact(locale, outcome),
        footer = render_footer(site, now),
        toast = render_toast(site, outcome)
    );

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="{lang}"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "<title>{title}</title>",
            r#"<link rel="stylesheet" href="/assets/site.css">"#,
            "</head><body>{body}</body></html>"
        ),
        lang = locale.lang_tag(),
        title = escape_html(&format!("{} | {}", site.owner_name, site.headline)),
        body = body
    )
}

fn render_header(site: &SiteConfig) -> String {
    let t = |key| site.locale.text(key);
    format!(
        concat!(
            r#"<header class="site-header"><a class="brand" href="/">{owner}</a>"#,
            r##"<a class="menu-open" id="menu-toggle" href="#navbar-sticky" aria-label="{menu}">&#9776;</a>"##,
            r#"<nav id="navbar-sticky" class="site-nav">"#,
            r##"<a class="menu-close" href="#" aria-label="{menu}">&times;</a>"##,
            r##"<a href="#about">{about}</a><a href="#projects">{projects}</a><a href="#contact">{contact}</a>"##,
            "</nav></header>"
        ),
        owner = escape_html(&site.owner_name),
        menu = t(Text::NavMenu),
        about = t(Text::NavAbout),
        projects = t(Text::NavProjects),
        contact = t(Text::NavContact)
    )
}

fn render_hero(site: &SiteConfig) -> String {
    format!(
        concat!(
            r#"<section id="home" class="hero reveal">"#,
            "<h1>{owner}</h1><h2>{headline}</h2><p>{tagline}</p>",
            r##"<a class="button" href="#contact">{contact}</a>"##,
            "</section>"
        ),
        owner = escape_html(&site.owner_name),
        headline = escape_html(&site.headline),
        tagline = escape_html(&site.tagline),
        contact = site.locale.text(Text::NavContact)
    )
}

fn render_about(site: &SiteConfig) -> String {
    let mut counters = String::new();
    for counter in &site.counters {
        let _ = write!(
            counters,
            concat!(
                r#"<div class="stat-card">"#,
                r#"<span class="counter" data-target="{target}">{target}</span>"#,
                r#"<span class="counter-suffix">{suffix}</span>"#,
                r#"<p class="counter-label">{label}</p></div>"#
            ),
            target = counter.target,
            suffix = escape_html(&counter.suffix),
            label = escape_html(&counter.label)
        );
    }

    format!(
        concat!(
            r#"<section id="about" class="about reveal"><h2>{title}</h2>"#,
            r#"<div class="counters">{counters}</div></section>"#
        ),
        title = site.locale.text(Text::AboutTitle),
        counters = counters
    )
}

fn render_projects(site: &SiteConfig) -> String {
    let mut cards = String::new();
    for project in &site.projects {
        let title = match &project.url {
            Some(url) => format!(
                r#"<a href="{}" rel="noopener">{}</a>"#,
                escape_html(url),
                escape_html(&project.title)
            ),
            None => escape_html(&project.title),
        };
        let _ = write!(
            cards,
            r#"<article class="project-card reveal"><h3>{}</h3><p>{}</p></article>"#,
            title,
            escape_html(&project.description)
        );
    }

    format!(
        r#"<section id="projects" class="projects"><h2>{}</h2><div class="project-grid">{}</div></section>"#,
        site.locale.text(Text::ProjectsTitle),
        cards
    )
}

fn render_contact(locale: Locale, outcome: Option<&ContactOutcome>) -> String {
    let t = |key| locale.text(key);
    let empty = ContactSubmission::default();
    let values = match outcome {
        Some(ContactOutcome::Failed { submitted, .. }) => submitted,
        Some(ContactOutcome::Sent) | None => &empty,
    };

    format!(
        concat!(
            r#"<section id="contact" class="contact reveal"><h2>{title}</h2>"#,
            r#"<form id="contactForm" class="contact-form" method="post" action="/contact">"#,
            r#"<label for="name">{name_label}</label>"#,
            r#"<input type="text" id="name" name="name" value="{name}" required>"#,
            r#"<label for="email">{email_label}</label>"#,
            r#"<input type="email" id="email" name="email" value="{email}" required>"#,
            r#"<label for="message">{message_label}</label>"#,
            r#"<textarea id="message" name="message" rows="5" required>{message}</textarea>"#,
            r#"<button type="submit" class="button">{send}</button>"#,
            "</form></section>"
        ),
        title = t(Text::ContactTitle),
        name_label = t(Text::FieldName),
        name = escape_html(&values.name),
        email_label = t(Text::FieldEmail),
        email = escape_html(&values.email),
        message_label = t(Text::FieldMessage),
        message = escape_html(&values.message),
        send = t(Text::ContactSend)
    )
}

fn render_footer(site: &SiteConfig, now: DateTime<Utc>) -> String {
    format!(
        r#"<footer class="site-footer"><p>&copy; <span id="year">{}</span> {}. {}</p></footer>"#,
        now.year(),
        escape_html(&site.owner_name),
        site.locale.text(Text::FooterRights)
    )
}

fn render_toast(site: &SiteConfig, outcome: Option<&ContactOutcome>) -> String {
    let (class, text) = match outcome {
        None => return String::new(),
        Some(ContactOutcome::Sent) => ("toast-success", Text::ContactSent),
        Some(ContactOutcome::Failed { missing, .. }) => {
            ("toast-error", missing.unwrap_or(Text::ContactFailed))
        }
    };
    format!(
        r#"<div id="notification" class="toast {}" role="status" style="--toast-duration: {}s">{}</div>"#,
        class,
        site.toast_seconds,
        site.locale.text(text)
    )
}
