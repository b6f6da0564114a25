//! Small helpers: URL parsing, flexible dates, display formatting.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Path segments under blog.naver.com that are pages, not blog ids.
const NON_BLOG_SEGMENTS: &[&str] = &[
    "PostList.naver",
    "PostView.naver",
    "NBlogTop.naver",
    "SectionPostList.naver",
    "PostList",
    "PostView",
    "NBlogTop",
    "SectionPostList",
];

static BLOG_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"blog\.naver\.com/PostList\.naver\?.*?blogId=([^&]+)",
        r"blog\.naver\.com/PostView\.naver\?.*?blogId=([^&]+)",
        r"blog\.naver\.com/([A-Za-z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract the blog id from any of the URL shapes the platform uses:
/// `blog.naver.com/{id}`, `m.blog.naver.com/{id}`, and the
/// `PostList.naver`/`PostView.naver` query forms. A bare id typed without a
/// URL does not match; callers handle that case themselves.
pub fn extract_blog_id(url: &str) -> Option<String> {
    for pattern in BLOG_ID_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(url) {
            let blog_id = &captures[1];
            if !NON_BLOG_SEGMENTS.contains(&blog_id) {
                return Some(blog_id.to_string());
            }
        }
    }
    None
}

/// Make a string safe for use as a filename.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim_matches(['.', ' ']);
    let truncated: String = trimmed.chars().take(200).collect();

    if truncated.is_empty() {
        "unnamed".to_string()
    } else {
        truncated
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d.",
    "%Y.%m.%d",
    "%Y. %m. %d.",
    "%Y. %m. %d",
];

/// Parse the datetime shapes observed in scraped pages, including the
/// Korean `2024. 3. 2.` date style. Date-only forms resolve to midnight.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Compact display for large counts: `1.2K`, `3.4M`.
pub fn format_count(count: i64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}
