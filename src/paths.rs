//! Route paths shared by the router, the access gate and the templates.

pub const HOME: &str = "/";
pub const SIGN_IN: &str = "/signin";
/// Sign-in form shown to readers who reached a writer-only view.
pub const LOGIN: &str = "/login";
pub const SIGN_UP: &str = "/signup";
pub const SIGN_OUT: &str = "/signout";
pub const WRITE: &str = "/write";
pub const DASHBOARD: &str = "/dashboard";
pub const GRAPHQL: &str = "/graphql";
pub const GRAPHQL_PLAYGROUND: &str = "/graphql/playground";

// Router patterns for the parameterized pages below.
pub const POST_ROUTE: &str = "/posts/{id}";
pub const POST_LIKE_ROUTE: &str = "/posts/{id}/like";
pub const PROFILE_ROUTE: &str = "/profiles/{username}";
pub const ASSET_ROUTE: &str = "/assets/{*path}";

pub fn post_detail(id: &str) -> String {
    format!("/posts/{id}")
}

pub fn profile(username: &str) -> String {
    format!("/profiles/{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameterized_paths() {
        assert_eq!(post_detail("abc"), "/posts/abc");
        assert_eq!(profile("ada"), "/profiles/ada");
    }

    #[test]
    fn builders_fill_their_route_patterns() {
        assert_eq!(POST_ROUTE.replace("{id}", "abc"), post_detail("abc"));
        assert_eq!(PROFILE_ROUTE.replace("{username}", "ada"), profile("ada"));
        assert!(POST_LIKE_ROUTE.starts_with(POST_ROUTE));
    }
}
