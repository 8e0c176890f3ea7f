//! Session lifecycle orchestration.
//!
//! One service, two mutually exclusive deployment policies (picked by
//! configuration, never mixed):
//!
//! - Self-service: unknown keys are provisioned on first use.
//! - Administrative issuance: unknown keys are rejected; new keys are
//!   minted in bulk after the administrative secret verifies.
//!
//! Provisioning a key always means: session row, seed items, audit
//! entry.

use futures::future::join_all;
use taskbin_core::error::TaskbinResult;
use taskbin_core::models::session::TenantSession;
use taskbin_core::repository::{AuditLogRepository, ItemRepository, SessionRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{SessionConfig, SessionPolicy};
use crate::error::SessionError;
use crate::secret;
use crate::seed::seed_items;
use crate::store::ItemStore;

/// Session lifecycle service.
///
/// Generic over repository implementations so the lifecycle logic has
/// no dependency on the database crate.
pub struct SessionService<S, I, A>
where
    S: SessionRepository,
    I: ItemRepository + Clone,
    A: AuditLogRepository,
{
    sessions: S,
    items: I,
    audit: A,
    config: SessionConfig,
}

impl<S, I, A> SessionService<S, I, A>
where
    S: SessionRepository,
    I: ItemRepository + Clone,
    A: AuditLogRepository,
{
    pub fn new(sessions: S, items: I, audit: A, config: SessionConfig) -> Self {
        Self {
            sessions,
            items,
            audit,
            config,
        }
    }

    /// Validate a key under the configured policy.
    pub async fn authorize(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        match self.config.policy {
            SessionPolicy::SelfService => self.validate_or_bootstrap(api_key).await,
            SessionPolicy::AdministrativeIssuance => self.validate(api_key).await,
        }
    }

    /// Self-service lifecycle: touch an active session, or provision
    /// the key on first sight. Never fails for a syntactically valid
    /// key while storage is healthy.
    pub async fn validate_or_bootstrap(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        if self.sessions.find(api_key).await?.is_some() {
            return self.sessions.touch(api_key).await;
        }

        match self.provision(api_key).await {
            Ok(session) => Ok(session),
            Err(err) => {
                // Two first requests can race on the insert; the loser
                // finds the winner's row and proceeds as ACTIVE.
                if self.sessions.find(api_key).await?.is_some() {
                    self.sessions.touch(api_key).await
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Administrative-issuance lifecycle: only previously issued keys
    /// validate; unknown keys fail.
    pub async fn validate(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        match self.sessions.find(api_key).await? {
            Some(_) => self.sessions.touch(api_key).await,
            None => Err(SessionError::InvalidKey.into()),
        }
    }

    /// Verify the administrative secret and mint `count` fresh keys.
    ///
    /// Each key is provisioned independently and concurrently; a
    /// failed key is dropped from the result rather than aborting the
    /// batch, so partial success is an expected outcome.
    pub async fn issue_sessions(&self, secret: &str, count: u32) -> TaskbinResult<Vec<String>> {
        let reference = self
            .config
            .admin_secret_hash
            .as_deref()
            .ok_or(SessionError::IssuanceNotConfigured)?;

        let verified = secret::verify_secret(
            secret,
            reference,
            self.config.kdf_iterations,
            self.config.kdf_output_len,
        )?;
        if !verified {
            return Err(SessionError::SecretMismatch.into());
        }

        let provisions = (0..count).map(|_| {
            let api_key = Uuid::new_v4().to_string();
            async move {
                match self.provision(&api_key).await {
                    Ok(_) => Some(api_key),
                    Err(err) => {
                        warn!(error = %err, "key provisioning failed");
                        None
                    }
                }
            }
        });

        let issued: Vec<String> = join_all(provisions).await.into_iter().flatten().collect();
        info!(
            requested = count,
            issued = issued.len(),
            "administrative key issuance complete"
        );
        Ok(issued)
    }

    /// Provision one key: session row, audit entry, seed items.
    ///
    /// The session row is the unit of success; audit and seed failures
    /// are logged and swallowed so a provisioned key is never left
    /// half-revoked.
    async fn provision(&self, api_key: &str) -> TaskbinResult<TenantSession> {
        let session = self.sessions.create(api_key).await?;

        if let Err(err) = self
            .audit
            .record("info", &format!("New API key set up: {api_key}"))
            .await
        {
            warn!(error = %err, "audit log write failed");
        }

        let store = ItemStore::new(self.items.clone(), api_key);
        for bag in seed_items() {
            if let Err(err) = store.create(bag).await {
                warn!(error = %err, "seed item creation failed");
            }
        }

        info!(api_key, "tenant provisioned");
        Ok(session)
    }
}
