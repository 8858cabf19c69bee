//! The capability every chain adapter implements.

use crate::error::Result;
use crate::types::{Chain, PublicIdentity, SignatureResult, VerificationOutcome};
use bitcoin::secp256k1::{All, Secp256k1};
use std::sync::Arc;

/// Handles to the cryptographic primitive backends, built once and shared
/// by the adapters that need them.
#[derive(Clone)]
pub struct Providers {
    secp: Arc<Secp256k1<All>>,
}

impl Providers {
    /// Build the primitive backends. The secp256k1 context is randomized
    /// on construction where the platform allows it.
    pub fn new() -> Self {
        Self {
            secp: Arc::new(Secp256k1::new()),
        }
    }

    /// Shared secp256k1 signing/verification context.
    pub fn secp(&self) -> Arc<Secp256k1<All>> {
        Arc::clone(&self.secp)
    }
}

impl Default for Providers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

/// Key generation, address derivation, message signing and verification
/// for a single chain.
///
/// Implementations are stateless apart from their primitive handles, so all
/// methods take `&self` and may be called from any thread.
pub trait WalletScheme {
    /// Chain-specific private key material.
    type Key;

    /// The chain this scheme implements.
    fn chain(&self) -> Chain;

    /// Draw fresh key material from a cryptographically secure source.
    fn generate(&self) -> Result<Self::Key>;

    /// Compute the public identity of `key`.
    ///
    /// Never fails: an address that cannot be encoded is reported as an
    /// empty string.
    fn derive_address(&self, key: &Self::Key) -> PublicIdentity;

    /// Sign a UTF-8 message using the chain's message-framing convention.
    fn sign(&self, key: &Self::Key, message: &str) -> Result<SignatureResult>;

    /// Check `signature` over `message` against `address`.
    fn verify(&self, address: &str, message: &str, signature: &str) -> VerificationOutcome;
}
