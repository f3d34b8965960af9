//! Identity Provider Client
//!
//! Talks to the external auth service over HTTP. Two credential paths:
//! token verification runs with the anonymous key plus the user's bearer
//! token; email lookup runs with the service-role key and must stay
//! server-side.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DomainError, DomainResult, Identity};

/// Seam between the access-control subsystem and the external auth service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token, returning the identity it belongs to
    async fn verify(&self, token: &str) -> DomainResult<Identity>;

    /// Privileged lookup of a user by (normalized) email
    async fn lookup_by_email(&self, email: &str) -> DomainResult<Option<Identity>>;
}

/// Wire shape of a provider user record
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserPage {
    users: Vec<ProviderUser>,
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
    lookup_page_size: u32,
}

impl HttpIdentityProvider {
    pub fn new(
        base_url: String,
        anon_key: String,
        service_role_key: Option<String>,
        timeout: Duration,
        lookup_page_size: u32,
    ) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
            lookup_page_size,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, token: &str) -> DomainResult<Identity> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("identity provider: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DomainError::Unauthorized("token rejected".to_string()));
        }

        let user: ProviderUser = resp
            .json()
            .await
            .map_err(|e| DomainError::Unavailable(format!("identity provider: {}", e)))?;

        match user.email {
            Some(email) => Ok(Identity::new(user.id, email)),
            None => Err(DomainError::Unauthorized(
                "token subject has no email".to_string(),
            )),
        }
    }

    async fn lookup_by_email(&self, email: &str) -> DomainResult<Option<Identity>> {
        let key = self.service_role_key.as_ref().ok_or_else(|| {
            DomainError::Internal(
                "identity provider service credentials not configured".to_string(),
            )
        })?;

        // Single-page scan; the page size is a configured bound, large
        // enough for the expected user population.
        let resp = self
            .client
            .get(format!("{}/auth/v1/admin/users", self.base_url))
            .query(&[("page", "1".to_string()), ("per_page", self.lookup_page_size.to_string())])
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| DomainError::Unavailable(format!("user lookup: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DomainError::Unavailable(format!(
                "user lookup failed with status {}",
                resp.status()
            )));
        }

        let page: UserPage = resp
            .json()
            .await
            .map_err(|e| DomainError::Unavailable(format!("user lookup: {}", e)))?;

        for user in page.users {
            if let Some(user_email) = user.email {
                if user_email.eq_ignore_ascii_case(email) {
                    return Ok(Some(Identity::new(user.id, user_email)));
                }
            }
        }
        Ok(None)
    }
}
