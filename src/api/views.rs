//! 服务端渲染的 HTML 页面（Maud）

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, html};

use crate::storage::{BlogPost, Comment};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;color:#222}\
header a{color:inherit;text-decoration:none}\
article{margin-bottom:2rem}\
.meta{color:#777;font-size:.85rem}\
.poster{max-width:100%;border-radius:4px}\
.banner{background:#fdecea;border:1px solid #f5c2c0;padding:.75rem 1rem;border-radius:4px}\
.comment{border-top:1px solid #eee;padding:.5rem 0}";

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 页面骨架
fn layout(site_title: &str, page_title: Option<&str>, body: Markup) -> Markup {
    let title = match page_title {
        Some(page) => format!("{} | {}", page, site_title),
        None => site_title.to_string(),
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (STYLE) }
            }
            body {
                header { h1 { a href="/" { (site_title) } } }
                main { (body) }
            }
        }
    }
}

/// 首页文章列表；`error` 存在时在列表上方显示错误提示
pub fn index(site_title: &str, posts: &[BlogPost], error: Option<&str>) -> Markup {
    layout(
        site_title,
        None,
        html! {
            @if let Some(message) = error {
                p.banner role="alert" { (message) }
            }
            @if posts.is_empty() {
                p { "No posts yet." }
            }
            @for post in posts {
                article {
                    h2 { a href={ "/" (post.id) } { (post.title) } }
                    p.meta { (format_date(&post.modified_on)) }
                    @if let Some(uri) = &post.poster_uri {
                        img.poster src=(uri) alt=(post.title);
                    }
                    p { (post.excerpt) }
                }
            }
        },
    )
}

/// 文章详情页
pub fn detail(site_title: &str, post: &BlogPost, comments: &[Comment]) -> Markup {
    layout(
        site_title,
        Some(&post.title),
        html! {
            article {
                h2 { (post.title) }
                p.meta {
                    "Posted " (format_date(&post.created_on))
                    @if post.modified_on != post.created_on {
                        " · updated " (format_date(&post.modified_on))
                    }
                }
                @if let Some(uri) = &post.poster_uri {
                    img.poster src=(uri) alt=(post.title);
                }
                div.content { (post.content) }
            }
            section.comments {
                h3 { "Comments (" (comments.len()) ")" }
                @for comment in comments {
                    div.comment {
                        p.meta {
                            @match &comment.website {
                                Some(site) => {
                                    a href=(site) rel="nofollow noopener" { (comment.name) }
                                }
                                None => { (comment.name) }
                            }
                            " · " (format_date(&comment.created_on))
                        }
                        p { (comment.comment) }
                    }
                }
            }
        },
    )
}

pub fn not_found(site_title: &str) -> Markup {
    layout(
        site_title,
        Some("Not found"),
        html! {
            h2 { "Not found" }
            p { "The post you are looking for does not exist." }
            p { a href="/" { "Back to all posts" } }
        },
    )
}

pub fn error_page(site_title: &str, message: &str) -> Markup {
    layout(
        site_title,
        Some("Error"),
        html! {
            h2 { "Something went wrong" }
            p.banner role="alert" { (message) }
            p { a href="/" { "Back to all posts" } }
        },
    )
}
