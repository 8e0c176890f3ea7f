//! Session lifecycle configuration.

/// Which identity lifecycle the deployment runs.
///
/// The two policies disagree on whether unknown keys auto-provision,
/// so a deployment picks exactly one; they are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Any syntactically valid key is provisioned on first use.
    SelfService,
    /// Unknown keys are rejected; keys exist only through
    /// administrative issuance.
    AdministrativeIssuance,
}

/// Configuration for the session service.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub policy: SessionPolicy,
    /// Hex-encoded reference digest the administrative secret is
    /// verified against. `None` disables issuance entirely.
    pub admin_secret_hash: Option<String>,
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100_000).
    pub kdf_iterations: u32,
    /// Derived digest length in bytes (default: 32).
    pub kdf_output_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: SessionPolicy::SelfService,
            admin_secret_hash: None,
            kdf_iterations: 100_000,
            kdf_output_len: 32,
        }
    }
}
