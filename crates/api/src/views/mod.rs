//! Server-rendered HTML for the browser-facing pages.
//!
//! Pages are plain `String`s built with `format!`. Every value that comes
//! from the database or the request goes through [`escape`] first.

pub mod node;
pub mod tree;

use axum::http::StatusCode;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap a page body in the shared document chrome.
pub fn layout(title: &str, body: &str) -> String {
    let title = escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Arbor</title>
<style>
body {{ font-family: sans-serif; margin: 2rem auto; max-width: 56rem; }}
nav a {{ margin-right: 1rem; }}
ul.tree ul {{ margin-left: 1.5rem; }}
.error {{ color: #a00; border: 1px solid #a00; padding: .5rem; }}
.muted {{ color: #777; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<nav><a href="/">Trees</a><a href="/trees/new">New tree</a><a href="/trees/deleted">Deleted trees</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#
    )
}

/// Error box shown above a re-rendered form.
pub fn error_box(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

/// Full page for a failed request.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status
        .canonical_reason()
        .unwrap_or("Error")
        .to_string();
    let body = format!(
        r#"<p class="error">{}</p><p><a href="/">Back to the tree list</a></p>"#,
        escape(message)
    );
    layout(&title, &body)
}

/// A `POST` form rendered as a single button.
pub fn post_button(action: &str, label: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{}"><button type="submit">{}</button></form>"#,
        escape(action),
        escape(label)
    )
}
