//! Post list parsing: JSON API response and HTML page fallback.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::scrapers::PostListItem;

static LOG_NO_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""logNo"\s*:\s*"?(\d+)"?"#).unwrap());
static TITLE_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""title"\s*:\s*"([^"]*)""#).unwrap());
static LOG_NO_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"logNo=(\d+)").unwrap());

/// Parse the `PostTitleListAsync.naver` response.
///
/// The payload is almost-JSON: HTML fragments inside it carry `\'` escapes
/// that no JSON parser accepts, so those are rewritten first. When the
/// document still does not parse, individual fields are pulled out by regex.
pub(super) fn parse_api_response(text: &str, blog_id: &str) -> Vec<PostListItem> {
    let sanitized = text.trim().replace("\\'", "'");

    if let Ok(data) = serde_json::from_str::<serde_json::Value>(&sanitized) {
        if let Some(post_list) = data.get("postList").and_then(|v| v.as_array()) {
            return post_list
                .iter()
                .filter_map(|item| {
                    let log_no = json_field_string(item.get("logNo")?)?;
                    let title = item
                        .get("title")
                        .and_then(|v| v.as_str())
                        .map(decode_title)
                        .filter(|t| !t.is_empty());
                    Some(make_item(blog_id, &log_no, title))
                })
                .collect();
        }
        return Vec::new();
    }

    // Regex extraction for responses that never parse as JSON
    let log_nos: Vec<&str> = LOG_NO_JSON
        .captures_iter(&sanitized)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();
    let log_nos: Vec<&str> = if log_nos.is_empty() {
        LOG_NO_PARAM
            .captures_iter(&sanitized)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect()
    } else {
        log_nos
    };
    let titles: Vec<&str> = TITLE_JSON
        .captures_iter(&sanitized)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .collect();

    log_nos
        .iter()
        .enumerate()
        .map(|(i, log_no)| {
            let title = titles
                .get(i)
                .map(|t| decode_title(t))
                .filter(|t| !t.is_empty());
            make_item(blog_id, log_no, title)
        })
        .collect()
}

/// Parse post links out of the HTML post list page.
pub(super) fn parse_html_page(html: &str, blog_id: &str) -> Vec<PostListItem> {
    let doc = Html::parse_document(html);
    let links = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let post_path = match Regex::new(&format!(r"/{}/(\d+)", regex::escape(blog_id))) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut posts: Vec<PostListItem> = Vec::new();
    for link in doc.select(&links) {
        let href = match link.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let log_no = match post_path.captures(href) {
            Some(captures) => captures[1].to_string(),
            None => continue,
        };

        let id = format!("{}_{}", blog_id, log_no);
        if posts.iter().any(|p| p.id == id) {
            continue;
        }

        let title = Some(link.text().collect::<String>().trim().to_string())
            .filter(|t| t.chars().count() > 1);
        posts.push(make_item(blog_id, &log_no, title));
    }

    posts
}

fn make_item(blog_id: &str, log_no: &str, title: Option<String>) -> PostListItem {
    PostListItem {
        id: format!("{}_{}", blog_id, log_no),
        blog_id: blog_id.to_string(),
        log_no: log_no.to_string(),
        title,
        post_url: format!("https://blog.naver.com/{}/{}", blog_id, log_no),
    }
}

/// The API percent-encodes titles with `+` for spaces.
fn decode_title(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|s| s.into_owned())
        .unwrap_or(plus_decoded)
        .trim()
        .to_string()
}

/// `logNo` arrives as either a JSON number or a string.
fn json_field_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_with_invalid_escapes() {
        let text = r#"{"postList":[
            {"logNo":"223111","title":"%EC%95%88%EB%85%95+%EC%84%B8%EC%83%81"},
            {"logNo":223112,"title":"it\'s+fine"}
        ]}"#;

        let posts = parse_api_response(text, "gardenlog");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "gardenlog_223111");
        assert_eq!(posts[0].title.as_deref(), Some("안녕 세상"));
        assert_eq!(posts[0].post_url, "https://blog.naver.com/gardenlog/223111");
        assert_eq!(posts[1].log_no, "223112");
        assert_eq!(posts[1].title.as_deref(), Some("it's fine"));
    }

    #[test]
    fn test_regex_fallback_on_broken_json() {
        let text = r#"{"postList":[{"logNo":"101","title":"first" oops"#;

        let posts = parse_api_response(text, "b");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "b_101");
        assert_eq!(posts[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn test_html_fallback_dedupes_links() {
        let html = r#"<html><body>
            <a href="/gardenlog/223111">봄 정원</a>
            <a href="/gardenlog/223111">봄 정원</a>
            <a href="https://blog.naver.com/gardenlog/223112">X</a>
            <a href="/other/999">elsewhere</a>
        </body></html>"#;

        let posts = parse_html_page(html, "gardenlog");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title.as_deref(), Some("봄 정원"));
        // Single-character link text is not a title
        assert_eq!(posts[1].title, None);
    }

    #[test]
    fn test_empty_post_list_yields_nothing() {
        assert!(parse_api_response(r#"{"postList":[]}"#, "b").is_empty());
        assert!(parse_api_response("", "b").is_empty());
    }
}
