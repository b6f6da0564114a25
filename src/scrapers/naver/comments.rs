//! Comment extraction from cbox markup on the post page.
//!
//! Reply parent attribution uses the nearest preceding non-reply comment in
//! document order. The markup carries no explicit parent reference, so a
//! reply that follows another thread's tail can be misattributed; the
//! stored parent is best-effort.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::Comment;
use crate::scrapers::FetchedComment;

static COMMENT_NO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"comment[_-]?(\d+)").unwrap());

pub(super) fn parse_cbox(html: &str, post_id: &str) -> Vec<FetchedComment> {
    let doc = Html::parse_document(html);

    let items: Vec<ElementRef> = match Selector::parse("li.u_cbox_comment") {
        Ok(selector) => {
            let found: Vec<_> = doc.select(&selector).collect();
            if found.is_empty() {
                match Selector::parse(".u_cbox_comment_box") {
                    Ok(fallback) => doc.select(&fallback).collect(),
                    Err(_) => Vec::new(),
                }
            } else {
                found
            }
        }
        Err(_) => Vec::new(),
    };

    let mut comments: Vec<FetchedComment> = Vec::new();
    // Nearest preceding non-reply comment, for parent attribution
    let mut last_top_level: Option<String> = None;

    for item in items {
        let author = first_text(&item, &[".u_cbox_nick", ".u_cbox_name"]);
        let content = first_text(&item, &[".u_cbox_contents", ".u_cbox_text_wrap"]);
        if author.is_none() && content.is_none() {
            continue;
        }

        let written_at = first_text(&item, &[".u_cbox_date"]);
        let like_count = first_text(&item, &[".u_cbox_cnt_recomm"])
            .and_then(|text| text.parse().ok())
            .unwrap_or(0);

        let is_reply = has_class_containing(&item, "reply")
            || select_within(&item, ".u_cbox_reply_area").is_some();

        let id = match comment_no(&item) {
            Some(no) => Comment::make_id(post_id, &no),
            None => Comment::make_id(post_id, &comments.len().to_string()),
        };

        let parent_id = if is_reply { last_top_level.clone() } else { None };
        if !is_reply {
            last_top_level = Some(id.clone());
        }

        comments.push(FetchedComment {
            id,
            post_id: post_id.to_string(),
            parent_id,
            is_reply,
            author,
            content,
            like_count,
            written_at,
        });
    }

    comments
}

fn comment_no(item: &ElementRef) -> Option<String> {
    let classes = item.value().attr("class").unwrap_or("");
    if let Some(captures) = COMMENT_NO.captures(classes) {
        return Some(captures[1].to_string());
    }
    item.value()
        .attr("data-comment-id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn has_class_containing(item: &ElementRef, needle: &str) -> bool {
    item.value().classes().any(|c| c.contains(needle))
}

fn select_within<'a>(item: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    item.select(&selector).next()
}

fn first_text(item: &ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| {
        select_within(item, s)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    })
}
