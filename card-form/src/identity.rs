use async_trait::async_trait;
use shared::Result;

/// Email magic-link identity provider.
///
/// Constructed once by the host with its publishable key and handed to the
/// [`FormController`](crate::FormController). Failures are reported as
/// [`shared::ServiceError::Provider`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Loads whatever the provider needs before a login can start.
    async fn preload(&self) -> Result<()>;

    /// Sends the magic link and waits until the user completes or abandons the flow.
    async fn login_with_email_link(&self, email: &str) -> Result<()>;
}
