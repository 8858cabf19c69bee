//! Keyforge - Core Library
//!
//! Ephemeral, in-memory wallets for Bitcoin, Ethereum and Solana: key
//! generation, address derivation, message signing and signature verification.
//!
//! Nothing is persisted and nothing touches the network. Key material lives in
//! a [`WalletSession`] and is erased when it is replaced or dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyforge_core::{Chain, Network, WalletSession};
//!
//! let mut session = WalletSession::new(Network::Bitcoin);
//! let identity = session.create(Chain::Bitcoin)?;
//! println!("address: {}", identity.address);
//!
//! let signature = session.sign("hello")?;
//! let outcome = session.verify("hello", &signature.signature)?;
//! assert!(outcome.is_valid());
//! ```

pub mod chains;
pub mod error;
pub mod hd_wallet;
pub mod scheme;
pub mod types;
pub mod wallet;

pub use chains::{ChainAdapters, KeyMaterial, verify};
pub use error::{Error, Result};
pub use hd_wallet::HdWallet;
pub use scheme::{Providers, WalletScheme};
pub use types::{Chain, Network, PublicIdentity, SignatureResult, VerificationOutcome};
pub use wallet::WalletSession;
