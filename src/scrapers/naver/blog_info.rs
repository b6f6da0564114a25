//! Blog-level metadata extraction from the mobile blog page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static SITE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*:\s*네이버\s*블로그\s*$").unwrap());
static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d[\d,]*)").unwrap());

/// Extract blog title and author nickname, both best-effort.
pub(super) fn parse_names(html: &str) -> (Option<String>, Option<String>) {
    let doc = Html::parse_document(html);

    let blog_name = meta_content(&doc, r#"meta[property="og:title"]"#)
        .or_else(|| select_text(&doc, "title"))
        .map(|title| SITE_SUFFIX.replace(&title, "").trim().to_string())
        .filter(|title| !title.is_empty())
        .or_else(|| select_text(&doc, "span.nick"));

    let author_name = select_text(&doc, "span.nick")
        .or_else(|| select_text(&doc, "strong.nick"))
        .or_else(|| meta_content(&doc, r#"meta[name="author"]"#));

    (blog_name, author_name)
}

/// Extract the total post count from the desktop post list page; 0 when
/// the page does not carry one.
pub(super) fn parse_post_count(html: &str) -> i64 {
    let doc = Html::parse_document(html);

    for selector in ["span.category_title", "em.cnt"] {
        if let Some(text) = select_text(&doc, selector) {
            if let Some(captures) = COUNT.captures(&text) {
                if let Ok(count) = captures[1].replace(',', "").parse() {
                    return count;
                }
            }
        }
    }

    0
}

pub(super) fn select_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

pub(super) fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_with_site_suffix_stripped() {
        let html = r#"<html><head>
            <meta property="og:title" content="정원 일기 : 네이버 블로그">
        </head><body><span class="nick">정원사</span></body></html>"#;

        let (blog_name, author_name) = parse_names(html);
        assert_eq!(blog_name.as_deref(), Some("정원 일기"));
        assert_eq!(author_name.as_deref(), Some("정원사"));
    }

    #[test]
    fn test_title_tag_fallback() {
        let html = "<html><head><title>My Blog : 네이버 블로그</title></head><body></body></html>";

        let (blog_name, author_name) = parse_names(html);
        assert_eq!(blog_name.as_deref(), Some("My Blog"));
        assert_eq!(author_name, None);
    }

    #[test]
    fn test_post_count_with_thousands_separator() {
        let html = r#"<html><body><em class="cnt">1,234개의 글</em></body></html>"#;
        assert_eq!(parse_post_count(html), 1234);
    }

    #[test]
    fn test_post_count_absent() {
        assert_eq!(parse_post_count("<html><body></body></html>"), 0);
    }
}
