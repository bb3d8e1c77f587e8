//! Session authentication implementations

pub mod session;

pub use session::{
    AnonymousAuthenticator, CookieSessionAuthenticator, SESSION_COOKIE,
    session_token_from_headers,
};
