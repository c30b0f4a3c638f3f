//! Bearer token acquisition for the mail-calendar API.
//!
//! Tokens are issued by the external identity provider; this core only
//! consumes them. A missing token is a caller-visible authorization
//! problem, never a transport failure.

use async_trait::async_trait;
use plandesk_domain::Result;

/// Source of bearer tokens for the mail-calendar API.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// A currently usable access token, or `None` when the account has not
    /// been connected to the identity provider.
    async fn access_token(&self) -> Result<Option<String>>;
}

/// Token provider backed by a fixed value, typically handed in from the
/// environment by the host process.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token: token.filter(|t| !t.trim().is_empty()) }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}
