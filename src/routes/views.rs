//! Display-ready structs handed to templates.

use crate::db::posts::AuthoredPost;
use crate::format::{format_date, format_number, format_relative_time, get_initials, slugify};
use crate::paths;
use crate::session::Session;

/// Top bar state shared by every page.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub username: Option<String>,
    pub display_name: String,
    pub is_writer: bool,
}

impl Nav {
    pub fn from_session(session: &Session) -> Self {
        match session.user() {
            Some(user) => Self {
                username: Some(user.username.clone()),
                display_name: user.display_name.clone(),
                is_writer: user.is_writer(),
            },
            None => Self::default(),
        }
    }
}

pub struct PostCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub author_href: String,
    pub author_initials: String,
    pub category: String,
    pub tags: Vec<String>,
    pub when: String,
    pub read_time: u32,
    pub likes: String,
    pub views: String,
    pub is_draft: bool,
}

impl PostCard {
    pub fn new(entry: AuthoredPost) -> Self {
        let AuthoredPost {
            post,
            author_username,
        } = entry;
        let when = match post.published_at {
            Some(ref at) => format_relative_time(at),
            None => format!("edited {}", format_relative_time(&post.updated_at)),
        };

        Self {
            href: paths::post_detail(&post.id),
            author_href: paths::profile(&author_username),
            author_initials: get_initials(&post.author),
            is_draft: !post.is_published(),
            likes: format_number(post.likes),
            views: format_number(post.views),
            read_time: post.read_time,
            title: post.title,
            excerpt: post.excerpt,
            author: post.author,
            category: post.category,
            tags: post.tags,
            when,
        }
    }
}

pub struct PostView {
    pub href: String,
    pub slug: String,
    pub title: String,
    pub paragraphs: Vec<String>,
    pub author: String,
    pub author_href: String,
    pub author_initials: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published_on: String,
    pub updated: String,
    pub read_time: u32,
    pub likes: String,
    pub views: String,
}

impl PostView {
    pub fn new(entry: AuthoredPost) -> Self {
        let AuthoredPost {
            post,
            author_username,
        } = entry;
        let published_on = match post.published_at {
            Some(ref at) => format_date(at),
            None => "Draft".to_string(),
        };
        let paragraphs = post
            .content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            href: paths::post_detail(&post.id),
            slug: slugify(&post.title),
            author_href: paths::profile(&author_username),
            author_initials: get_initials(&post.author),
            updated: format_relative_time(&post.updated_at),
            likes: format_number(post.likes),
            views: format_number(post.views),
            read_time: post.read_time,
            title: post.title,
            paragraphs,
            author: post.author,
            category: post.category,
            tags: post.tags,
            published_on,
        }
    }
}
