//! Error types for the Keyforge SDK.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Keyforge SDK.
///
/// Verification problems are not represented here; they are reported through
/// [`crate::VerificationOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    /// No wallet has been created in this session yet.
    #[error("No active wallet. Create one first.")]
    NotInitialized,

    /// Randomness or key generation failed.
    #[error("Key generation failed: {0}")]
    Generation(String),

    /// Invalid mnemonic phrase.
    #[error("Invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Signing primitive failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(format!("{:#}", err))
    }
}
