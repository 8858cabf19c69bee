//! Chain adapters and dispatch over [`Chain`].
//!
//! Each supported chain has one [`WalletScheme`] implementation. [`ChainAdapters`]
//! bundles the three and routes calls by chain, and [`KeyMaterial`] is the
//! tagged union of their key types.

pub mod btc;
pub mod eth;
pub mod sol;

use crate::error::{Error, Result};
use crate::scheme::{Providers, WalletScheme};
use crate::types::{Chain, Network, PublicIdentity, SignatureResult, VerificationOutcome};
use bitcoin::secp256k1::SecretKey;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

pub use btc::BitcoinScheme;
pub use eth::EthereumScheme;
pub use sol::SolanaScheme;

/// A secp256k1 private key that is erased when dropped.
pub struct SecpSecret(SecretKey);

impl SecpSecret {
    pub fn new(secret: SecretKey) -> Self {
        Self(secret)
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.0
    }
}

impl Drop for SecpSecret {
    fn drop(&mut self) {
        self.0.non_secure_erase();
    }
}

impl std::fmt::Debug for SecpSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecpSecret(..)")
    }
}

/// Private key material for one wallet.
///
/// Never serialized; `Debug` only reveals the chain.
pub enum KeyMaterial {
    Bitcoin(SecpSecret),
    Ethereum(SecpSecret),
    Solana(ed25519_dalek::SigningKey),
}

impl KeyMaterial {
    pub fn chain(&self) -> Chain {
        match self {
            KeyMaterial::Bitcoin(_) => Chain::Bitcoin,
            KeyMaterial::Ethereum(_) => Chain::Ethereum,
            KeyMaterial::Solana(_) => Chain::Solana,
        }
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("chain", &self.chain())
            .finish_non_exhaustive()
    }
}

/// The three chain adapters, sharing one set of primitive providers.
#[derive(Debug, Clone)]
pub struct ChainAdapters {
    bitcoin: BitcoinScheme,
    ethereum: EthereumScheme,
    solana: SolanaScheme,
}

impl ChainAdapters {
    pub fn new(providers: &Providers, network: Network) -> Self {
        Self {
            bitcoin: BitcoinScheme::new(providers, network),
            ethereum: EthereumScheme::new(providers),
            solana: SolanaScheme::new(),
        }
    }

    pub fn bitcoin(&self) -> &BitcoinScheme {
        &self.bitcoin
    }

    pub fn ethereum(&self) -> &EthereumScheme {
        &self.ethereum
    }

    pub fn solana(&self) -> &SolanaScheme {
        &self.solana
    }

    pub fn generate(&self, chain: Chain) -> Result<KeyMaterial> {
        Ok(match chain {
            Chain::Bitcoin => KeyMaterial::Bitcoin(self.bitcoin.generate()?),
            Chain::Ethereum => KeyMaterial::Ethereum(self.ethereum.generate()?),
            Chain::Solana => KeyMaterial::Solana(self.solana.generate()?),
        })
    }

    pub fn derive_address(&self, key: &KeyMaterial) -> PublicIdentity {
        match key {
            KeyMaterial::Bitcoin(k) => self.bitcoin.derive_address(k),
            KeyMaterial::Ethereum(k) => self.ethereum.derive_address(k),
            KeyMaterial::Solana(k) => self.solana.derive_address(k),
        }
    }

    pub fn sign(&self, key: &KeyMaterial, message: &str) -> Result<SignatureResult> {
        match key {
            KeyMaterial::Bitcoin(k) => self.bitcoin.sign(k, message),
            KeyMaterial::Ethereum(k) => self.ethereum.sign(k, message),
            KeyMaterial::Solana(k) => self.solana.sign(k, message),
        }
    }

    pub fn verify(
        &self,
        chain: Chain,
        address: &str,
        message: &str,
        signature: &str,
    ) -> VerificationOutcome {
        let outcome = match chain {
            Chain::Bitcoin => self.bitcoin.verify(address, message, signature),
            Chain::Ethereum => self.ethereum.verify(address, message, signature),
            Chain::Solana => self.solana.verify(address, message, signature),
        };

        if let VerificationOutcome::Error(reason) = &outcome {
            log::warn!("Could not verify {} signature for {}: {}", chain, address, reason);
        } else {
            log::debug!("Verified {} signature for {}: {}", chain, address, outcome);
        }

        outcome
    }
}

/// Verify a signature for any chain without an active wallet.
pub fn verify(
    providers: &Providers,
    network: Network,
    chain: Chain,
    address: &str,
    message: &str,
    signature: &str,
) -> VerificationOutcome {
    ChainAdapters::new(providers, network).verify(chain, address, message, signature)
}

/// Fill a 32-byte buffer from the OS CSPRNG.
pub(crate) fn random_bytes32() -> Result<Zeroizing<[u8; 32]>> {
    let mut bytes = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(&mut bytes[..])
        .map_err(|e| Error::Generation(format!("Failed to draw randomness: {}", e)))?;
    Ok(bytes)
}

/// Draw a uniformly random valid secp256k1 private key.
pub(crate) fn random_secret_key() -> Result<SecretKey> {
    loop {
        let bytes = random_bytes32()?;
        // Out-of-range scalars are vanishingly rare; redraw.
        if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
            return Ok(secret);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_material_debug_hides_secret() {
        let adapters = ChainAdapters::new(&Providers::new(), Network::Bitcoin);
        for chain in Chain::ALL {
            let key = adapters.generate(chain).unwrap();
            assert_eq!(key.chain(), chain);

            let debug = format!("{:?}", key);
            assert!(debug.contains("KeyMaterial"));
            assert!(!debug.contains("Secret"));
        }
    }

    #[test]
    fn test_random_secret_keys_differ() {
        let k1 = random_secret_key().unwrap();
        let k2 = random_secret_key().unwrap();
        assert_ne!(k1.secret_bytes(), k2.secret_bytes());
    }

    #[test]
    fn test_dispatch_round_trip() {
        let providers = Providers::new();
        let adapters = ChainAdapters::new(&providers, Network::Bitcoin);

        for chain in Chain::ALL {
            let key = adapters.generate(chain).unwrap();
            let identity = adapters.derive_address(&key);
            assert_eq!(identity.chain, chain);

            let sig = adapters.sign(&key, "hello").unwrap();
            assert_eq!(sig.chain, chain);
            assert_eq!(sig.message, "hello");

            let outcome = verify(
                &providers,
                Network::Bitcoin,
                chain,
                &identity.address,
                "hello",
                &sig.signature,
            );
            assert_eq!(outcome, VerificationOutcome::Valid, "chain {}", chain);
        }
    }
}
