use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::db::models::User;
use crate::db::posts::{list_published_by_author, AuthoredPost};
use crate::format::{format_date, format_relative_time, get_initials, slugify};
use crate::state::DbPool;

/// A story as exposed over the API
#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Post", complex)]
pub struct PostObject {
    pub id: String,
    pub title: String,
    pub content: String,

    /// First 200 characters of the content
    pub excerpt: String,

    /// Author display name at the time of writing
    pub author: String,

    /// Username to look the author up with `author(username:)`
    pub author_username: String,

    pub category: String,
    pub tags: Vec<String>,

    /// "draft" or "published"
    pub status: String,

    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Estimated minutes to read
    pub read_time: u32,

    pub likes: i64,
    pub comments: i64,
    pub views: i64,
}

#[ComplexObject]
impl PostObject {
    /// URL-friendly form of the title
    async fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// e.g. "March 5, 2025 (2 days ago)", or "Draft"
    async fn published_label(&self) -> String {
        match self.published_at {
            Some(ref at) => format!("{} ({})", format_date(at), format_relative_time(at)),
            None => "Draft".to_string(),
        }
    }
}

impl From<AuthoredPost> for PostObject {
    fn from(entry: AuthoredPost) -> Self {
        let AuthoredPost {
            post,
            author_username,
        } = entry;
        Self {
            status: post.status.as_str().to_string(),
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            author: post.author,
            author_username,
            category: post.category,
            tags: post.tags,
            published_at: post.published_at,
            updated_at: post.updated_at,
            read_time: post.read_time,
            likes: post.likes,
            comments: post.comments,
            views: post.views,
        }
    }
}

/// A public profile
#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Author", complex)]
pub struct AuthorObject {
    #[graphql(skip)]
    pub id: String,

    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,

    /// "reader" or "writer"
    pub role: String,
}

#[ComplexObject]
impl AuthorObject {
    async fn initials(&self) -> String {
        get_initials(&self.display_name)
    }

    /// Published stories, newest first
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let pool = ctx.data::<DbPool>()?;
        let conn = pool.get()?;
        let posts = list_published_by_author(&conn, &self.id)?;
        Ok(posts.into_iter().map(PostObject::from).collect())
    }
}

impl From<User> for AuthorObject {
    fn from(user: User) -> Self {
        Self {
            role: user.role.as_str().to_string(),
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            bio: user.bio,
        }
    }
}
