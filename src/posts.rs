//! Turning a submitted authoring form into a [`Post`].
//!
//! [`PostForm::validate`] rejects blank or malformed submissions; the
//! resulting [`Submission`] maps infallibly onto a post record with its
//! derived fields (excerpt, tags, read time, timestamps) filled in.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::db::models::{Post, PostStatus, User};
use crate::error::{AppError, AppResult};
use crate::format::truncate_text;

/// Number of content characters kept in an excerpt.
pub const EXCERPT_LEN: usize = 200;
pub const WORDS_PER_MINUTE: usize = 200;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 100_000;

/// Raw authoring form as posted by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: String,
    pub status: String,
}

/// A form that passed validation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
}

impl PostForm {
    pub fn validate(self) -> AppResult<Submission> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::EmptySubmission("Title"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::BadRequest(format!(
                "Title must be {MAX_TITLE_LEN} characters or less"
            )));
        }

        if self.content.trim().is_empty() {
            return Err(AppError::EmptySubmission("Content"));
        }
        if self.content.chars().count() > MAX_CONTENT_LEN {
            return Err(AppError::BadRequest(format!(
                "Content must be {MAX_CONTENT_LEN} characters or less"
            )));
        }

        let status = PostStatus::parse(self.status.trim())
            .ok_or_else(|| AppError::BadRequest("Status must be draft or published".into()))?;

        Ok(Submission {
            title,
            content: self.content,
            category: self.category.trim().to_string(),
            tags: parse_tags(&self.tags),
            status,
        })
    }
}

impl Submission {
    /// Build the post record for `author` as of `now`.
    pub fn into_post(self, author: &User, now: DateTime<Utc>) -> Post {
        let published_at = match self.status {
            PostStatus::Published => Some(now),
            PostStatus::Draft => None,
        };

        Post {
            id: uuid::Uuid::now_v7().to_string(),
            excerpt: excerpt(&self.content),
            read_time: read_time(&self.content),
            title: self.title,
            content: self.content,
            author_id: author.id.clone(),
            author: author.display_name.clone(),
            category: self.category,
            tags: self.tags,
            status: self.status,
            published_at,
            updated_at: now,
            likes: 0,
            comments: 0,
            views: 0,
        }
    }
}

pub fn excerpt(content: &str) -> String {
    truncate_text(content, EXCERPT_LEN)
}

/// Split on commas, trimming each tag. Order and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Minutes to read at [`WORDS_PER_MINUTE`], never less than one.
pub fn read_time(content: &str) -> u32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Role;

    fn author() -> User {
        User {
            id: "user-1".into(),
            username: "ada".into(),
            display_name: "Ada Lovelace".into(),
            bio: None,
            role: Role::Writer,
            created_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    fn form(content: &str, status: &str) -> PostForm {
        PostForm {
            title: "  The Analytical Engine ".into(),
            content: content.into(),
            category: " History ".into(),
            tags: "math, engines,, math , ".into(),
            status: status.into(),
        }
    }

    #[test]
    fn published_post_gets_excerpt_and_publication_time() {
        let now = Utc::now();
        let content = "a".repeat(250);
        let post = form(&content, "published")
            .validate()
            .unwrap()
            .into_post(&author(), now);

        assert_eq!(post.excerpt.chars().count(), 203);
        assert!(post.excerpt.ends_with("..."));
        assert_eq!(post.published_at, Some(now));
        assert_eq!(post.updated_at, now);
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn draft_has_no_publication_time() {
        let post = form("short story", "draft")
            .validate()
            .unwrap()
            .into_post(&author(), Utc::now());

        assert_eq!(post.published_at, None);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.excerpt, "short story");
    }

    #[test]
    fn mapper_fills_author_and_zeroed_counters() {
        let post = form("body", "draft")
            .validate()
            .unwrap()
            .into_post(&author(), Utc::now());

        assert_eq!(post.title, "The Analytical Engine");
        assert_eq!(post.category, "History");
        assert_eq!(post.author_id, "user-1");
        assert_eq!(post.author, "Ada Lovelace");
        assert_eq!((post.likes, post.comments, post.views), (0, 0, 0));
        assert!(uuid::Uuid::parse_str(&post.id).is_ok());
    }

    #[test]
    fn ids_are_distinct() {
        let a = form("x", "draft").validate().unwrap().into_post(&author(), Utc::now());
        let b = form("x", "draft").validate().unwrap().into_post(&author(), Utc::now());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn excerpt_of_exactly_200_chars_is_untouched() {
        let content = "é".repeat(200);
        assert_eq!(excerpt(&content), content);
    }

    #[test]
    fn tags_are_trimmed_and_keep_order_and_duplicates() {
        assert_eq!(
            parse_tags("math, engines,, math , "),
            vec!["math", "engines", "math"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn read_time_rounds_up_and_has_a_floor_of_one() {
        assert_eq!(read_time(&vec!["word"; 450].join(" ")), 3);
        assert_eq!(read_time(&vec!["word"; 10].join(" ")), 1);
        assert_eq!(read_time(&vec!["word"; 200].join("\n\t ")), 1);
        assert_eq!(read_time(&vec!["word"; 201].join(" ")), 2);
        assert_eq!(read_time("   "), 1);
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        assert_eq!(word_count("  one \n\n two\tthree  "), 3);
    }

    #[test]
    fn blank_title_is_an_empty_submission() {
        let mut f = form("body", "draft");
        f.title = "   ".into();
        assert!(matches!(
            f.validate(),
            Err(AppError::EmptySubmission("Title"))
        ));
    }

    #[test]
    fn blank_content_is_an_empty_submission() {
        assert!(matches!(
            form(" \n ", "published").validate(),
            Err(AppError::EmptySubmission("Content"))
        ));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            form("body", "archived").validate(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut f = form("body", "draft");
        f.title = "t".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(f.validate(), Err(AppError::BadRequest(_))));
    }
}
