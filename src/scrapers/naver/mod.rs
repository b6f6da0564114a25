//! Naver Blog implementation of [`BlogSite`].
//!
//! Each stage hits the endpoint the platform actually serves: the mobile
//! site for blog metadata and post bodies, the `PostTitleListAsync` JSON API
//! (with an HTML fallback) for the post list, the blogserver like API for
//! reactions, and the cbox comment markup on the post page for comments.
//! Parsers are pure functions over the fetched text so they can be tested
//! against captured fixtures.

mod blog_info;
mod comments;
mod post_content;
mod post_list;
mod reactions;

use async_trait::async_trait;
use tracing::debug;

use super::{
    BlogInfo, BlogSite, FetchedComment, HttpClient, PostContent, PostListItem, ReactionSummary,
};

const DESKTOP_BASE: &str = "https://blog.naver.com";
const MOBILE_BASE: &str = "https://m.blog.naver.com";
const LIKE_API: &str = "https://apis.naver.com/blogserver/like/v1/search/contents";

/// Posts per page requested from the post list API.
const PAGE_SIZE: usize = 30;

/// Naver Blog client. Owns its HTTP resources for one crawl session.
pub struct NaverBlogClient {
    http: HttpClient,
}

impl NaverBlogClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Canonical desktop URL for a blog.
    pub fn blog_url(blog_id: &str) -> String {
        format!("{}/{}", DESKTOP_BASE, blog_id)
    }

    /// Canonical desktop URL for a post.
    pub fn post_url(blog_id: &str, log_no: &str) -> String {
        format!("{}/{}/{}", DESKTOP_BASE, blog_id, log_no)
    }

    async fn fetch_post_page(&self, blog_id: &str, page: usize) -> Vec<PostListItem> {
        let url = format!(
            "{}/PostTitleListAsync.naver?blogId={}&viewdate=&currentPage={}\
             &categoryNo=0&parentCategoryNo=0&countPerPage={}",
            DESKTOP_BASE, blog_id, page, PAGE_SIZE
        );

        if let Some(text) = self.http.get_text(&url).await {
            let posts = post_list::parse_api_response(&text, blog_id);
            if !posts.is_empty() {
                return posts;
            }
        }

        // Fallback: scrape the HTML post list page
        let url = format!(
            "{}/PostList.naver?blogId={}&from=postList&categoryNo=0&currentPage={}",
            DESKTOP_BASE, blog_id, page
        );
        match self.http.get_text(&url).await {
            Some(html) => post_list::parse_html_page(&html, blog_id),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl BlogSite for NaverBlogClient {
    async fn fetch_blog_info(&self, blog_id: &str) -> Option<BlogInfo> {
        let url = format!("{}/{}", MOBILE_BASE, blog_id);
        let html = self.http.get_text(&url).await?;
        let (blog_name, author_name) = blog_info::parse_names(&html);

        let count_url = format!(
            "{}/PostList.naver?blogId={}&categoryNo=0&from=postList",
            DESKTOP_BASE, blog_id
        );
        let post_count = match self.http.get_text(&count_url).await {
            Some(html) => blog_info::parse_post_count(&html),
            None => 0,
        };

        self.http.pace_blog_info().await;

        Some(BlogInfo {
            id: blog_id.to_string(),
            blog_name: blog_name.unwrap_or_else(|| blog_id.to_string()),
            author_name,
            url: Self::blog_url(blog_id),
            post_count,
        })
    }

    async fn fetch_post_list(&self, blog_id: &str) -> Vec<PostListItem> {
        let mut all: Vec<PostListItem> = Vec::new();
        let mut page = 1;

        loop {
            let posts = self.fetch_post_page(blog_id, page).await;
            if posts.is_empty() {
                break;
            }

            let page_len = posts.len();
            for post in posts {
                if !all.iter().any(|p| p.id == post.id) {
                    all.push(post);
                }
            }
            debug!(blog_id, page, collected = all.len(), "post list page");

            // A short page is the last page
            if page_len < PAGE_SIZE {
                break;
            }

            page += 1;
            self.http.pace_post().await;
        }

        all
    }

    async fn fetch_post_content(&self, blog_id: &str, log_no: &str) -> Option<PostContent> {
        let url = format!("{}/{}/{}", MOBILE_BASE, blog_id, log_no);
        let html = self.http.get_text(&url).await?;

        self.http.pace_post().await;

        Some(post_content::parse(&html))
    }

    async fn fetch_reactions(&self, blog_id: &str, log_no: &str) -> ReactionSummary {
        let q = urlencoding::encode(&format!("BLOG[{}_{}]", blog_id, log_no)).into_owned();
        let url = format!(
            "{}?suppress_response_codes=true&pool=blogid&q={}&isDuplication=false&cssIds=BLOG_PC",
            LIKE_API, q
        );
        let referer = Self::post_url(blog_id, log_no);

        let summary = match self.http.get_text_with_referer(&url, &referer).await {
            Some(text) => reactions::parse_api_response(&text).unwrap_or_default(),
            None => ReactionSummary::default(),
        };

        self.http.pace_post().await;
        summary
    }

    async fn fetch_comments(&self, blog_id: &str, log_no: &str) -> Vec<FetchedComment> {
        let post_id = format!("{}_{}", blog_id, log_no);
        let url = format!("{}/{}/{}", MOBILE_BASE, blog_id, log_no);

        let fetched = match self.http.get_text(&url).await {
            Some(html) => comments::parse_cbox(&html, &post_id),
            None => Vec::new(),
        };

        self.http.pace_comments().await;
        fetched
    }
}
