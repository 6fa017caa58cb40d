//! HTML rendering helpers
//!
//! Pages are assembled from the embedded `static/layout.html` shell. Values
//! are substituted in a single pass, so text coming from users or from the
//! glossary file can never inject a placeholder of its own.

use axum::response::Html;

use crate::core::types::Flash;

const LAYOUT_HTML: &str = include_str!("../../static/layout.html");

/// Site name shown in the header and the document title
pub const SITE_NAME: &str = "Termbook";

/// Navigation bar entries: (path, label)
pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/fundamentals", "Fundamentals"),
    ("/dictionary", "Glossary"),
    ("/ai", "Ask the AI"),
    ("/team", "Team"),
];

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces `{{name}}` placeholders in `template`.
///
/// Unknown placeholders are left as-is. Substituted values are not scanned
/// again.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Navigation bar with `active` highlighted.
///
/// A nav entry is active for its own path and for sub-pages of it, except
/// the home entry which only matches `/`.
pub fn nav_html(active: &str) -> String {
    NAV_ITEMS
        .iter()
        .map(|(path, label)| {
            let is_active = if *path == "/" {
                active == "/"
            } else {
                active == *path || active.starts_with(&format!("{}/", path))
            };
            let class = if is_active { " class=\"active\"" } else { "" };
            format!("<li><a href=\"{}\"{}>{}</a></li>", path, class, escape_html(label))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One dismissable alert box
pub fn flash_html(flash: &Flash) -> String {
    format!(
        "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
        flash.level,
        escape_html(&flash.message)
    )
}

/// Full page: layout + nav + flashes + `content` (already HTML)
pub fn page(title: &str, active: &str, flashes: &[Flash], content: &str) -> Html<String> {
    let full_title = if title.is_empty() {
        SITE_NAME.to_string()
    } else {
        format!("{} | {}", title, SITE_NAME)
    };
    let flashes: String = flashes.iter().map(flash_html).collect();

    Html(fill(
        LAYOUT_HTML,
        &[
            ("title", &escape_html(&full_title)),
            ("heading", &escape_html(title)),
            ("site", SITE_NAME),
            ("nav", &nav_html(active)),
            ("flashes", &flashes),
            ("content", content),
        ],
    ))
}
