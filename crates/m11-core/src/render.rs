//! HTML rendering of sections and content items
//!
//! | Item | Markup |
//! |------|--------|
//! | Heading | `<h{level}>{number} {title}</h{level}>` |
//! | Paragraph | `<p>{text}</p>` |
//! | List | `<ul><li>…</li></ul>`, nested lists inside the preceding `<li>` |
//! | Table | `<table><tr><td>…</td></tr></table>` |
//! | Image | `<img src="data:{mime};base64,…"/>` |
//!
//! Rendering never mutates the tree, so rendering the same section twice yields
//! identical markup.

use crate::content::{ContentItem, Image, List, ListEntry, Paragraph, Table, TableCell};
use crate::section::Section;
use base64::Engine;
use std::path::Path;

/// Render as HTML markup
pub trait ToHtml {
    /// HTML for this value
    fn to_html(&self) -> String;
}

/// Escape `&`, `<` and `>`; quotes are left as-is outside attributes
#[must_use = "returns the escaped text"]
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Heading markup; number-only or title-only when one is absent, empty when both are
#[must_use = "returns the heading markup"]
pub fn heading_html(level: usize, number: Option<&str>, title: Option<&str>) -> String {
    let text = match (number, title) {
        (Some(n), Some(t)) => format!("{n} {}", escape_html(t)),
        (Some(n), None) => n.to_string(),
        (None, Some(t)) => escape_html(t),
        (None, None) => return String::new(),
    };
    format!("<h{level}>{text}</h{level}>")
}

/// MIME type for an image file, from its extension
#[must_use = "returns the MIME type"]
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}

impl ToHtml for Paragraph {
    fn to_html(&self) -> String {
        format!("<p>{}</p>", escape_html(&self.text))
    }
}

impl ToHtml for List {
    fn to_html(&self) -> String {
        let mut html = String::from("<ul>");
        let mut entries = self.items.iter().peekable();
        while let Some(entry) = entries.next() {
            html.push_str("<li>");
            match entry {
                ListEntry::Item(item) => {
                    html.push_str(&escape_html(&item.text));
                    if let Some(ListEntry::List(nested)) = entries.peek() {
                        html.push_str(&nested.to_html());
                        entries.next();
                    }
                }
                ListEntry::List(nested) => html.push_str(&nested.to_html()),
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html
    }
}

impl ToHtml for TableCell {
    fn to_html(&self) -> String {
        let open = if self.col_span > 1 {
            format!("<td colspan=\"{}\">", self.col_span)
        } else {
            "<td>".to_string()
        };
        let body: String = self.items.iter().map(ToHtml::to_html).collect();
        format!("{open}{body}</td>")
    }
}

impl ToHtml for Table {
    fn to_html(&self) -> String {
        let mut html = String::from("<table>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in &row.cells {
                html.push_str(&cell.to_html());
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

impl ToHtml for Image {
    fn to_html(&self) -> String {
        let alt = self
            .path
            .file_name()
            .map(|n| escape_attr(&n.to_string_lossy()))
            .unwrap_or_default();
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let data = base64::engine::general_purpose::STANDARD.encode(bytes);
                format!(
                    "<img alt=\"{alt}\" src=\"data:{};base64,{data}\"/>",
                    image_mime_type(&self.path)
                )
            }
            Err(e) => {
                log::debug!("Image {} not readable, linking by path: {e}", self.path.display());
                format!(
                    "<img alt=\"{alt}\" src=\"{}\"/>",
                    escape_attr(&self.path.to_string_lossy())
                )
            }
        }
    }
}

impl ToHtml for ContentItem {
    fn to_html(&self) -> String {
        match self {
            Self::Paragraph(p) => p.to_html(),
            Self::List(list) => list.to_html(),
            Self::Table(table) => table.to_html(),
            Self::Image(image) => image.to_html(),
        }
    }
}

impl ToHtml for Section {
    fn to_html(&self) -> String {
        let heading = heading_html(self.level, self.number.as_deref(), self.title.as_deref());
        std::iter::once(heading)
            .filter(|h| !h.is_empty())
            .chain(self.items.iter().map(ToHtml::to_html))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
