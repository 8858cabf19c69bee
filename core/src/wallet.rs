//! In-memory wallet session.
//!
//! A session starts empty. [`WalletSession::create`] generates key material for
//! a chain and replaces whatever wallet was active before; signing and
//! verification then operate on the active wallet.

use crate::chains::{ChainAdapters, KeyMaterial};
use crate::error::{Error, Result};
use crate::scheme::Providers;
use crate::types::{Chain, Network, PublicIdentity, SignatureResult, VerificationOutcome};

/// Key material and its derived public data.
struct ActiveWallet {
    key: KeyMaterial,
    identity: PublicIdentity,
}

enum SessionState {
    Empty,
    Active(ActiveWallet),
}

/// Holds at most one ephemeral wallet.
///
/// # Example
///
/// ```rust,ignore
/// use keyforge_core::{Chain, WalletSession};
///
/// let mut session = WalletSession::default();
/// let identity = session.create(Chain::Ethereum)?;
/// let signature = session.sign("hello")?;
/// assert!(session.verify("hello", &signature.signature)?.is_valid());
/// ```
pub struct WalletSession {
    adapters: ChainAdapters,
    network: Network,
    state: SessionState,
}

impl WalletSession {
    /// Create an empty session for the given Bitcoin network.
    pub fn new(network: Network) -> Self {
        Self::with_providers(&Providers::new(), network)
    }

    /// Create an empty session using existing primitive providers.
    pub fn with_providers(providers: &Providers, network: Network) -> Self {
        Self {
            adapters: ChainAdapters::new(providers, network),
            network,
            state: SessionState::Empty,
        }
    }

    /// Get the network this session is configured for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Generate a new wallet for `chain`, replacing the active one.
    ///
    /// The new wallet is fully built before the old one is dropped, so on
    /// error the session keeps its previous state.
    pub fn create(&mut self, chain: Chain) -> Result<PublicIdentity> {
        let key = self.adapters.generate(chain)?;
        let identity = self.adapters.derive_address(&key);

        if identity.has_address() {
            log::debug!("Created {} wallet {}", chain, identity.address);
        } else {
            log::warn!("Created {} wallet without an address", chain);
        }

        self.state = SessionState::Active(ActiveWallet {
            key,
            identity: identity.clone(),
        });

        Ok(identity)
    }

    /// Sign `message` with the active wallet.
    pub fn sign(&self, message: &str) -> Result<SignatureResult> {
        let wallet = self.active()?;
        let signature = self.adapters.sign(&wallet.key, message)?;
        log::debug!(
            "Signed {}-byte message with {} wallet {}",
            message.len(),
            wallet.identity.chain,
            wallet.identity.address
        );
        Ok(signature)
    }

    /// Verify `signature` over `message` against the active wallet's address.
    pub fn verify(&self, message: &str, signature: &str) -> Result<VerificationOutcome> {
        let wallet = self.active()?;
        self.verify_with_address(&wallet.identity.address, message, signature)
    }

    /// Verify `signature` over `message` against any address of the active
    /// wallet's chain.
    pub fn verify_with_address(
        &self,
        address: &str,
        message: &str,
        signature: &str,
    ) -> Result<VerificationOutcome> {
        let wallet = self.active()?;
        Ok(self
            .adapters
            .verify(wallet.identity.chain, address, message, signature))
    }

    /// Whether a wallet has been created.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Chain of the active wallet.
    pub fn chain(&self) -> Option<Chain> {
        self.identity().map(|identity| identity.chain)
    }

    /// Public identity of the active wallet.
    pub fn identity(&self) -> Option<&PublicIdentity> {
        match &self.state {
            SessionState::Active(wallet) => Some(&wallet.identity),
            SessionState::Empty => None,
        }
    }

    /// Address of the active wallet.
    pub fn address(&self) -> Option<&str> {
        self.identity().map(|identity| identity.address.as_str())
    }

    /// Public key bytes of the active wallet (Bitcoin and Ethereum only).
    pub fn public_key(&self) -> Option<&[u8]> {
        self.identity()?.public_key.as_deref()
    }

    fn active(&self) -> Result<&ActiveWallet> {
        match &self.state {
            SessionState::Active(wallet) => Ok(wallet),
            SessionState::Empty => Err(Error::NotInitialized),
        }
    }
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new(Network::default())
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("network", &self.network)
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let session = WalletSession::default();

        assert!(!session.is_active());
        assert!(session.chain().is_none());
        assert!(session.address().is_none());
        assert!(session.public_key().is_none());
        assert!(matches!(session.sign("hello"), Err(Error::NotInitialized)));
        assert!(matches!(
            session.verify("hello", "sig"),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_create_replaces_wallet() {
        let mut session = WalletSession::default();

        let btc = session.create(Chain::Bitcoin).unwrap();
        assert_eq!(session.chain(), Some(Chain::Bitcoin));
        assert_eq!(session.address(), Some(btc.address.as_str()));
        assert_eq!(session.public_key().unwrap().len(), 33);

        let eth = session.create(Chain::Ethereum).unwrap();
        assert_eq!(session.chain(), Some(Chain::Ethereum));
        assert_eq!(session.address(), Some(eth.address.as_str()));
        assert_eq!(session.public_key().unwrap().len(), 65);

        let sol = session.create(Chain::Solana).unwrap();
        assert_eq!(session.identity(), Some(&sol));
        assert!(session.public_key().is_none());
    }

    #[test]
    fn test_create_same_chain_gives_new_key() {
        let mut session = WalletSession::default();
        let first = session.create(Chain::Solana).unwrap();
        let second = session.create(Chain::Solana).unwrap();
        assert_ne!(first.address, second.address);
    }

    #[test]
    fn test_old_signature_does_not_verify_against_new_wallet() {
        let mut session = WalletSession::default();
        session.create(Chain::Ethereum).unwrap();
        let sig = session.sign("hello").unwrap();
        assert!(session.verify("hello", &sig.signature).unwrap().is_valid());

        session.create(Chain::Ethereum).unwrap();
        assert_eq!(
            session.verify("hello", &sig.signature).unwrap(),
            VerificationOutcome::Invalid
        );
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let mut session = WalletSession::default();
        session.create(Chain::Bitcoin).unwrap();
        let debug = format!("{:?}", session);
        assert!(debug.contains("bc1q"));
        assert!(!debug.contains("KeyMaterial"));
    }
}
