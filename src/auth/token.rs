//! Bearer Token Resolution
//!
//! Turns an Authorization header into an identity, best-effort. "No
//! identity" is an ordinary value here: many routes tolerate anonymous
//! callers, so verification failures are swallowed, not propagated. The
//! raw token is never logged.

use std::sync::Arc;

use tracing::debug;

use super::provider::IdentityProvider;
use crate::domain::Identity;

#[derive(Clone)]
pub struct TokenResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl TokenResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the Authorization header to an identity, if possible
    pub async fn resolve(&self, authorization: Option<&str>) -> Option<Identity> {
        let token = authorization?.strip_prefix("Bearer ")?;
        if token.is_empty() {
            return None;
        }

        match self.provider.verify(token).await {
            Ok(identity) => Some(identity),
            Err(err) => {
                debug!("token verification failed: {}", err);
                None
            }
        }
    }
}
