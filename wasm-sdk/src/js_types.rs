//! WASM-friendly type wrappers.
//!
//! These types wrap the core SDK types with wasm_bindgen annotations
//! for seamless JavaScript interop.

use wasm_bindgen::prelude::*;

/// Supported blockchains.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Solana,
}

impl From<keyforge_core::Chain> for Chain {
    fn from(c: keyforge_core::Chain) -> Self {
        match c {
            keyforge_core::Chain::Bitcoin => Chain::Bitcoin,
            keyforge_core::Chain::Ethereum => Chain::Ethereum,
            keyforge_core::Chain::Solana => Chain::Solana,
        }
    }
}

impl From<Chain> for keyforge_core::Chain {
    fn from(c: Chain) -> Self {
        match c {
            Chain::Bitcoin => keyforge_core::Chain::Bitcoin,
            Chain::Ethereum => keyforge_core::Chain::Ethereum,
            Chain::Solana => keyforge_core::Chain::Solana,
        }
    }
}

/// Public data of a wallet.
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone)]
pub struct PublicIdentity {
    pub chain: Chain,
    /// Address. Empty if it could not be derived.
    pub address: String,
    /// Public key in display form. Absent for Solana.
    #[wasm_bindgen(js_name = "publicKey")]
    pub public_key: Option<String>,
}

impl From<keyforge_core::PublicIdentity> for PublicIdentity {
    fn from(identity: keyforge_core::PublicIdentity) -> Self {
        Self {
            chain: identity.chain.into(),
            public_key: identity.public_key_hex(),
            address: identity.address,
        }
    }
}

/// A message signature.
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone)]
pub struct SignatureResult {
    pub chain: Chain,
    /// Signature in the chain's encoding (base64, hex or base58).
    pub signature: String,
    pub message: String,
}

impl From<keyforge_core::SignatureResult> for SignatureResult {
    fn from(sig: keyforge_core::SignatureResult) -> Self {
        Self {
            chain: sig.chain.into(),
            signature: sig.signature,
            message: sig.message,
        }
    }
}

/// Outcome of a verification.
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Whether the signature is valid.
    pub valid: bool,
    /// One of `valid`, `invalid` or `error`.
    pub status: String,
    /// Why verification could not be attempted.
    pub reason: Option<String>,
}

impl From<keyforge_core::VerificationOutcome> for VerificationResult {
    fn from(outcome: keyforge_core::VerificationOutcome) -> Self {
        use keyforge_core::VerificationOutcome;

        match outcome {
            VerificationOutcome::Valid => Self {
                valid: true,
                status: "valid".to_string(),
                reason: None,
            },
            VerificationOutcome::Invalid => Self {
                valid: false,
                status: "invalid".to_string(),
                reason: None,
            },
            VerificationOutcome::Error(reason) => Self {
                valid: false,
                status: "error".to_string(),
                reason: Some(reason),
            },
        }
    }
}
