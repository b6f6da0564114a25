//! Post body extraction from the mobile post page.

use scraper::{Html, Selector};

use super::blog_info::{meta_content, select_text};
use crate::scrapers::PostContent;

const TITLE_SELECTORS: &[&str] = &[
    "div.se-title-text",
    "h3.se_textarea",
    "div.tit_h3",
    "div.__se_title_area",
    "h3.tit_view",
    "div.se-module-text h3",
];

const CONTENT_SELECTORS: &[&str] = &[
    "div.se-main-container",
    "div.__se_component_area",
    "div.post-view",
    "div#postViewArea",
    "div.se_component_wrap",
];

const CATEGORY_SELECTORS: &[&str] = &[
    "a.blog_ctg",
    "em.category",
    "a.pcol2",
    "span.cate",
    r#"a[class*="category"]"#,
];

const DATE_SELECTORS: &[&str] = &[
    ".blog_date",
    "span.se_publishDate",
    "span.date",
    "p.date",
    r#"span[class*="date"]"#,
];

/// Parse whatever the post page yields; every field is optional.
pub(super) fn parse(html: &str) -> PostContent {
    let doc = Html::parse_document(html);

    PostContent {
        title: first_text(&doc, TITLE_SELECTORS)
            .or_else(|| meta_content(&doc, r#"meta[property="og:title"]"#)),
        content: extract_content(&doc),
        category: first_text(&doc, CATEGORY_SELECTORS),
        post_date: first_text(&doc, DATE_SELECTORS).map(|d| d.replace('/', ".").trim().to_string()),
    }
}

fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| select_text(doc, s))
}

fn extract_content(doc: &Html) -> Option<String> {
    let paragraph = Selector::parse(r#"[class*="se-text"], [class*="se-module-text"]"#).ok()?;

    for selector in CONTENT_SELECTORS {
        let container = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(_) => continue,
        };
        let root = match doc.select(&container).next() {
            Some(root) => root,
            None => continue,
        };

        // Smart Editor text modules, one paragraph per line
        let paragraphs: Vec<String> = root
            .select(&paragraph)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return Some(paragraphs.join("\n"));
        }

        // Older editors: all text under the container
        let text = root
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !text.is_empty() {
            return Some(text);
        }
    }

    meta_content(doc, r#"meta[property="og:description"]"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_editor_paragraphs() {
        let html = r#"<html><body>
            <div class="se-title-text">봄맞이 준비</div>
            <span class="se_publishDate">2024. 3. 2. 14:00</span>
            <a class="blog_ctg">원예</a>
            <div class="se-main-container">
                <p class="se-text-paragraph">첫 문단</p>
                <script>ignored()</script>
                <p class="se-text-paragraph">둘째 문단</p>
            </div>
        </body></html>"#;

        let content = parse(html);
        assert_eq!(content.title.as_deref(), Some("봄맞이 준비"));
        assert_eq!(content.content.as_deref(), Some("첫 문단\n둘째 문단"));
        assert_eq!(content.category.as_deref(), Some("원예"));
        assert_eq!(content.post_date.as_deref(), Some("2024. 3. 2. 14:00"));
    }

    #[test]
    fn test_legacy_editor_whole_container_text() {
        let html = r#"<html><body>
            <div id="postViewArea">old style <b>body</b></div>
        </body></html>"#;

        let content = parse(html);
        assert_eq!(content.content.as_deref(), Some("old style\nbody"));
    }

    #[test]
    fn test_og_fallbacks() {
        let html = r#"<html><head>
            <meta property="og:title" content="제목">
            <meta property="og:description" content="미리보기">
        </head><body></body></html>"#;

        let content = parse(html);
        assert_eq!(content.title.as_deref(), Some("제목"));
        assert_eq!(content.content.as_deref(), Some("미리보기"));
        assert_eq!(content.category, None);
        assert_eq!(content.post_date, None);
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(parse("<html><body></body></html>"), PostContent::default());
    }
}
