//! Access gate: decides whether a view renders for a session or where the
//! requester is sent instead. The decision is pure; performing the redirect
//! is up to the caller.

use crate::db::models::Role;
use crate::paths;
use crate::session::Session;

/// What a view requires of the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    None,
    Authenticated,
    Writer,
}

/// Access requirements of one view and its fixed redirect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAccess {
    pub required: Capability,
    /// Where signed-out requesters go.
    pub sign_in: &'static str,
    /// Where signed-in requesters lacking the writer role go.
    pub forbidden: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    RedirectTo(&'static str),
    /// The session has not resolved yet; show a wait indicator and ask again.
    Pending,
}

pub const PUBLIC: ViewAccess = ViewAccess {
    required: Capability::None,
    sign_in: paths::SIGN_IN,
    forbidden: paths::SIGN_IN,
};

pub const SIGNED_IN: ViewAccess = ViewAccess {
    required: Capability::Authenticated,
    sign_in: paths::SIGN_IN,
    forbidden: paths::SIGN_IN,
};

pub const WRITE_VIEW: ViewAccess = ViewAccess {
    required: Capability::Writer,
    sign_in: paths::SIGN_IN,
    forbidden: paths::LOGIN,
};

pub const DASHBOARD_VIEW: ViewAccess = ViewAccess {
    required: Capability::Writer,
    sign_in: paths::SIGN_IN,
    forbidden: paths::LOGIN,
};

pub fn decide(session: &Session, view: &ViewAccess) -> Decision {
    if session.loading {
        return Decision::Pending;
    }

    if view.required == Capability::None {
        return Decision::Render;
    }

    if !session.is_authenticated {
        return Decision::RedirectTo(view.sign_in);
    }

    // Authenticated without a user is inconsistent; send it back to sign in.
    let Some(user) = session.user.as_ref() else {
        return Decision::RedirectTo(view.sign_in);
    };

    if view.required == Capability::Writer && user.role != Role::Writer {
        return Decision::RedirectTo(view.forbidden);
    }

    Decision::Render
}
