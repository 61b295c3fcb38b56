use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Post, PostStatus};
use crate::db::{decode_time, encode_time};
use crate::error::{AppError, AppResult};

const POST_COLUMNS: &str = "id, title, content, excerpt, author_id, author, category, tags, \
                            status, published_at, updated_at, read_time, likes, comments, views";

/// Selected from `posts p JOIN users u`; the author's username follows the post columns.
const JOINED_COLUMNS: &str = "p.id, p.title, p.content, p.excerpt, p.author_id, p.author, \
                              p.category, p.tags, p.status, p.published_at, p.updated_at, \
                              p.read_time, p.likes, p.comments, p.views, u.username";

/// A post along with its author's username, for linking to the profile.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author_username: String,
}

fn authored_from_row(row: &Row<'_>) -> rusqlite::Result<AuthoredPost> {
    Ok(AuthoredPost {
        post: post_from_row(row)?,
        author_username: row.get(15)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    let tags: String = row.get(7)?;
    let tags = serde_json::from_str(&tags).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let status: String = row.get(8)?;
    let status = PostStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            format!("unknown post status {status:?}").into(),
        )
    })?;

    let published_at = row
        .get::<_, Option<String>>(9)?
        .map(|raw| decode_time(9, &raw))
        .transpose()?;
    let updated_at = decode_time(10, &row.get::<_, String>(10)?)?;

    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        excerpt: row.get(3)?,
        author_id: row.get(4)?,
        author: row.get(5)?,
        category: row.get(6)?,
        tags,
        status,
        published_at,
        updated_at,
        read_time: row.get(11)?,
        likes: row.get(12)?,
        comments: row.get(13)?,
        views: row.get(14)?,
    })
}

pub fn insert_post(conn: &Connection, post: &Post) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO posts ({POST_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ),
        params![
            post.id,
            post.title,
            post.content,
            post.excerpt,
            post.author_id,
            post.author,
            post.category,
            serde_json::to_string(&post.tags)?,
            post.status.as_str(),
            post.published_at.as_ref().map(encode_time),
            encode_time(&post.updated_at),
            post.read_time,
            post.likes,
            post.comments,
            post.views,
        ],
    )?;
    Ok(())
}

pub fn find_post(conn: &Connection, id: &str) -> AppResult<Option<AuthoredPost>> {
    let post = conn
        .query_row(
            &format!(
                "SELECT {JOINED_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id
                 WHERE p.id = ?1"
            ),
            params![id],
            authored_from_row,
        )
        .optional()?;
    Ok(post)
}

/// Newest published posts first.
pub fn list_published(conn: &Connection, limit: u32) -> AppResult<Vec<AuthoredPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {JOINED_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.status = 'published'
         ORDER BY p.published_at DESC
         LIMIT ?1"
    ))?;
    let posts = stmt
        .query_map(params![limit], authored_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn list_published_by_author(
    conn: &Connection,
    author_id: &str,
) -> AppResult<Vec<AuthoredPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {JOINED_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.author_id = ?1 AND p.status = 'published'
         ORDER BY p.published_at DESC"
    ))?;
    let posts = stmt
        .query_map(params![author_id], authored_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Every post by the author, drafts included, most recently updated first.
pub fn list_by_author(conn: &Connection, author_id: &str) -> AppResult<Vec<AuthoredPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {JOINED_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.author_id = ?1
         ORDER BY p.updated_at DESC"
    ))?;
    let posts = stmt
        .query_map(params![author_id], authored_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn increment_views(conn: &Connection, id: &str) -> AppResult<()> {
    let updated = conn.execute("UPDATE posts SET views = views + 1 WHERE id = ?1", params![id])?;
    if updated == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Adds a like to a published post and returns the new total.
pub fn increment_likes(conn: &Connection, id: &str) -> AppResult<i64> {
    let updated = conn.execute(
        "UPDATE posts SET likes = likes + 1 WHERE id = ?1 AND status = 'published'",
        params![id],
    )?;
    if updated == 0 {
        return Err(AppError::NotFound);
    }
    let likes = conn.query_row("SELECT likes FROM posts WHERE id = ?1", params![id], |r| {
        r.get(0)
    })?;
    Ok(likes)
}
