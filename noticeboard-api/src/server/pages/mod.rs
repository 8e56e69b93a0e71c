//! Server-side HTML rendering.
//!
//! Every piece of user supplied text goes through [`escape`] (or
//! [`escape_multiline`]) before it is written into markup.

pub mod posts;
pub mod tasks;

use axum::http::StatusCode;
use time::{UtcDateTime, format_description::BorrowedFormatItem};

pub const CONNECTION_FAILURE_MESSAGE: &str =
    "Sorry, there was a problem connecting to the database. Please try again later.";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum BannerKind {
    Success,
    Error,
}

/// Status message shown above the list.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.kind {
            BannerKind::Success => "alert alert-success",
            BannerKind::Error => "alert alert-error",
        };

        format!(
            "<div class=\"{class}\" role=\"status\"><span class=\"alert-text\">{}</span></div>\n",
            escape(&self.message)
        )
    }
}

/// HTML entity escaping for text and attribute values.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

/// Like [`escape`], with line breaks kept visible as `<br>`.
#[must_use]
pub fn escape_multiline(input: &str) -> String {
    input
        .split('\n')
        .map(|line| escape(line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Vec<_>>()
        .join("<br>\n")
}

pub(crate) fn format_date(date_time: UtcDateTime, format: &[BorrowedFormatItem<'_>]) -> String {
    date_time
        .format(format)
        .unwrap_or_else(|_| date_time.to_string())
}

/// `1234567` becomes `1,234,567`.
pub(crate) fn group_thousands(number: usize) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Wraps `main` in the document shell shared by every page.
#[must_use]
pub fn layout(title: &str, banners: &[Banner], main: &str) -> String {
    let banners: String = banners.iter().map(Banner::render).collect();

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title}</title>
</head>
<body>
<div class=\"container\">
<div id=\"message-container\">
{banners}</div>
{main}</div>
</body>
</html>
",
        title = escape(title),
    )
}

#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    let main = format!(
        "<main>\n<h1>{}</h1>\n<p><a href=\"/\">Back to the list</a></p>\n</main>\n",
        escape(heading)
    );

    layout(heading, &[Banner::error(message)], &main)
}
