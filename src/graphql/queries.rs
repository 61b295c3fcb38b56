use async_graphql::*;

use crate::db::posts::{find_post, list_published};
use crate::db::users::find_by_username;
use crate::graphql::types::{AuthorObject, PostObject};
use crate::state::DbPool;

const MAX_PAGE: i32 = 100;

/// GraphQL Query root
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Latest published stories, newest first
    async fn posts(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 20)] limit: i32,
    ) -> Result<Vec<PostObject>> {
        let pool = ctx.data::<DbPool>()?;
        let conn = pool.get()?;

        let limit = limit.clamp(1, MAX_PAGE) as u32;
        let posts = list_published(&conn, limit)?;
        Ok(posts.into_iter().map(PostObject::from).collect())
    }

    /// A published story by id. Drafts are never returned.
    async fn post(&self, ctx: &Context<'_>, id: String) -> Result<Option<PostObject>> {
        let pool = ctx.data::<DbPool>()?;
        let conn = pool.get()?;

        Ok(find_post(&conn, &id)?
            .filter(|entry| entry.post.is_published())
            .map(PostObject::from))
    }

    async fn author(&self, ctx: &Context<'_>, username: String) -> Result<Option<AuthorObject>> {
        let pool = ctx.data::<DbPool>()?;
        let conn = pool.get()?;

        Ok(find_by_username(&conn, &username)?.map(AuthorObject::from))
    }
}
