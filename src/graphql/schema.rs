use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use super::queries::QueryRoot;

/// Read-only schema; all writes go through the HTML forms.
pub type HubSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema() -> HubSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .limit_depth(6)
        .finish()
}
