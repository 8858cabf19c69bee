//! Solana: Ed25519 keys, base58 addresses, raw-message signatures.

use super::random_bytes32;
use crate::error::Result;
use crate::scheme::WalletScheme;
use crate::types::{Chain, PublicIdentity, SignatureResult, VerificationOutcome};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

#[derive(Debug, Clone, Default)]
pub struct SolanaScheme;

impl SolanaScheme {
    pub fn new() -> Self {
        Self
    }

    fn decode_address(address: &str) -> std::result::Result<VerifyingKey, String> {
        let bytes = bs58::decode(address.trim())
            .into_vec()
            .map_err(|e| format!("Invalid base58 address: {}", e))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("Expected 32 address bytes, got {}", b.len()))?;

        VerifyingKey::from_bytes(&bytes).map_err(|e| format!("Invalid Ed25519 public key: {}", e))
    }

    fn decode_signature(signature: &str) -> std::result::Result<Signature, String> {
        let bytes = bs58::decode(signature.trim())
            .into_vec()
            .map_err(|e| format!("Invalid base58 signature: {}", e))?;

        Signature::from_slice(&bytes).map_err(|e| format!("Invalid signature: {}", e))
    }
}

impl WalletScheme for SolanaScheme {
    type Key = SigningKey;

    fn chain(&self) -> Chain {
        Chain::Solana
    }

    fn generate(&self) -> Result<SigningKey> {
        let seed = random_bytes32()?;
        Ok(SigningKey::from_bytes(&seed))
    }

    fn derive_address(&self, key: &SigningKey) -> PublicIdentity {
        PublicIdentity {
            chain: Chain::Solana,
            public_key: None,
            address: bs58::encode(key.verifying_key().as_bytes()).into_string(),
        }
    }

    fn sign(&self, key: &SigningKey, message: &str) -> Result<SignatureResult> {
        let signature = key.sign(message.as_bytes());

        Ok(SignatureResult {
            chain: Chain::Solana,
            signature: bs58::encode(signature.to_bytes()).into_string(),
            message: message.to_string(),
        })
    }

    fn verify(&self, address: &str, message: &str, signature: &str) -> VerificationOutcome {
        let verifying_key = match Self::decode_address(address) {
            Ok(key) => key,
            Err(reason) => return VerificationOutcome::Error(reason),
        };

        let signature = match Self::decode_signature(signature) {
            Ok(signature) => signature,
            Err(reason) => return VerificationOutcome::Error(reason),
        };

        match verifying_key.verify(message.as_bytes(), &signature) {
            Ok(()) => VerificationOutcome::Valid,
            Err(_) => VerificationOutcome::Invalid,
        }
    }
}
