//! Administrative secret derivation and verification.
//!
//! The secret is never stored; deployments hold only the derived
//! digest. Derivation is PBKDF2-HMAC-SHA256 with a fixed empty salt —
//! the stored reference digest must have been produced the same way,
//! with the same iteration count and output length.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::SessionError;

/// Derive the digest for an administrative secret.
pub fn derive_secret_hash(secret: &str, iterations: u32, output_len: usize) -> Vec<u8> {
    let mut digest = vec![0u8; output_len];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), b"", iterations, &mut digest);
    digest
}

/// Verify a plaintext secret against a hex-encoded reference digest.
///
/// The comparison is constant-time. Returns `Ok(false)` on mismatch
/// (including a reference of the wrong length) and
/// `Err(SessionError::Crypto)` when the reference is not valid hex.
pub fn verify_secret(
    secret: &str,
    reference_hex: &str,
    iterations: u32,
    output_len: usize,
) -> Result<bool, SessionError> {
    let reference = hex::decode(reference_hex)
        .map_err(|e| SessionError::Crypto(format!("invalid reference digest: {e}")))?;

    let derived = derive_secret_hash(secret, iterations, output_len);
    Ok(derived.ct_eq(&reference).unwrap_u8() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITERATIONS: u32 = 1_000; // keep the test suite fast
    const OUTPUT_LEN: usize = 32;

    fn reference_for(secret: &str) -> String {
        hex::encode(derive_secret_hash(secret, ITERATIONS, OUTPUT_LEN))
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_secret_hash("hunter2", ITERATIONS, OUTPUT_LEN);
        let b = derive_secret_hash("hunter2", ITERATIONS, OUTPUT_LEN);
        assert_eq!(a, b);
        assert_eq!(a.len(), OUTPUT_LEN);
    }

    #[test]
    fn different_secrets_different_digests() {
        let a = derive_secret_hash("secret-a", ITERATIONS, OUTPUT_LEN);
        let b = derive_secret_hash("secret-b", ITERATIONS, OUTPUT_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn iteration_count_changes_the_digest() {
        let a = derive_secret_hash("hunter2", ITERATIONS, OUTPUT_LEN);
        let b = derive_secret_hash("hunter2", ITERATIONS + 1, OUTPUT_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn correct_secret_verifies() {
        let reference = reference_for("hunter2");
        assert!(verify_secret("hunter2", &reference, ITERATIONS, OUTPUT_LEN).unwrap());
    }

    #[test]
    fn wrong_secret_does_not_verify() {
        let reference = reference_for("hunter2");
        assert!(!verify_secret("wrong", &reference, ITERATIONS, OUTPUT_LEN).unwrap());
    }

    #[test]
    fn wrong_length_reference_does_not_verify() {
        let reference = hex::encode([0u8; 16]);
        assert!(!verify_secret("hunter2", &reference, ITERATIONS, OUTPUT_LEN).unwrap());
    }

    #[test]
    fn malformed_reference_returns_error() {
        let result = verify_secret("hunter2", "not-hex!", ITERATIONS, OUTPUT_LEN);
        assert!(result.is_err());
    }
}
