//! Server-side HTML rendering shared by the page handlers and the dashboard.

use actix_web::http::header::{self, ContentType};
use actix_web::HttpResponse;

use crate::campaign::manager::StatusCount;
use crate::campaign::{Campaign, Status, StatusFilter, ALL, STATUS_OPTIONS};

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(body)
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub struct Nav<'a> {
    pub links: &'a [(&'a str, &'a str)],
    pub current: &'a str,
}

pub const SITE_NAV: Nav<'static> = Nav {
    links: &[
        ("/", "Home"),
        ("/campaigns", "Campaigns"),
        ("/report", "Report"),
        ("/dashboard", "Dashboard"),
    ],
    current: "",
};

pub fn layout(title: &str, nav: &Nav<'_>, content: &str) -> String {
    let mut links = String::new();
    for (href, label) in nav.links {
        let class = if *href == nav.current { " class=\"current\"" } else { "" };
        links.push_str(&format!(
            "<a href=\"{}\"{}>{}</a> ",
            href,
            class,
            escape(label)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:.3em .6em}}nav a.current{{font-weight:bold}}\
         .warning{{color:#8a4b00}}.success{{color:#1b6e20}}.info{{color:#1d4f91}}</style>\n\
         </head>\n<body>\n<nav>{links}</nav>\n<h1>{title}</h1>\n{content}\n</body>\n</html>\n",
        title = escape(title),
        links = links,
        content = content,
    )
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
}

pub fn notice(kind: NoticeKind, message: &str) -> String {
    let class = match kind {
        NoticeKind::Info => "info",
        NoticeKind::Success => "success",
        NoticeKind::Warning => "warning",
    };
    format!("<p class=\"{}\">{}</p>", class, escape(message))
}

/// A `<select>` over the known statuses. A current value outside the known
/// options is kept as an extra, selected entry so that submitting the form
/// unchanged does not rewrite it.
pub fn status_select(name: &str, current: &Status) -> String {
    let mut options = String::new();
    let mut known = false;
    for status in STATUS_OPTIONS.iter() {
        let selected = if status == current {
            known = true;
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option{}>{}</option>",
            selected,
            escape(status.as_str())
        ));
    }
    if !known && !current.as_str().is_empty() {
        options.push_str(&format!(
            "<option selected>{}</option>",
            escape(current.as_str())
        ));
    }
    format!("<select name=\"{}\">{}</select>", escape(name), options)
}

pub fn filter_select(name: &str, current: &StatusFilter) -> String {
    let mut options = String::new();
    let choices = std::iter::once(ALL).chain(STATUS_OPTIONS.iter().map(|s| s.as_str()));
    for choice in choices {
        let selected = if choice == current.as_str() { " selected" } else { "" };
        options.push_str(&format!("<option{}>{}</option>", selected, escape(choice)));
    }
    format!("<select name=\"{}\">{}</select>", escape(name), options)
}

/// Per-row actions rendered in an extra column of [`campaign_table`].
pub struct RowActions<'a> {
    pub update_action: &'a dyn Fn(&Campaign) -> String,
    pub delete_action: &'a dyn Fn(&Campaign) -> String,
}

pub fn campaign_table(campaigns: &[Campaign], actions: Option<&RowActions<'_>>) -> String {
    let mut rows = String::new();
    for campaign in campaigns {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            escape(&campaign.name),
            escape(&campaign.client),
            escape(&campaign.start_date),
            escape(campaign.status.as_str()),
        ));
        if let Some(actions) = actions {
            rows.push_str(&format!(
                "<td><form method=\"post\" action=\"{}\">{}<button>Update</button></form>\
                 <form method=\"post\" action=\"{}\"><button>Delete</button></form></td>",
                escape(&(actions.update_action)(campaign)),
                status_select("status", &campaign.status),
                escape(&(actions.delete_action)(campaign)),
            ));
        }
        rows.push_str("</tr>\n");
    }

    let extra = if actions.is_some() { "<th>Actions</th>" } else { "" };
    format!(
        "<table>\n<tr><th>Campaign Name</th><th>Client</th><th>Start Date</th><th>Status</th>{}</tr>\n{}</table>",
        extra, rows
    )
}

pub fn summary_table(summary: &[StatusCount]) -> String {
    let mut rows = String::new();
    for entry in summary {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(entry.status.as_str()),
            entry.count
        ));
    }
    format!(
        "<table>\n<tr><th>Status</th><th>Count</th></tr>\n{}</table>",
        rows
    )
}
