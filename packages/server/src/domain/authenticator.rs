//! Session authentication seam.

use async_trait::async_trait;

use super::{AuthError, UserId};

/// Resolves the session credential of an inbound upgrade request.
///
/// `Ok(None)` means the request is admitted without a user identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate(&self, token: Option<String>) -> Result<Option<UserId>, AuthError>;
}
