//! Hierarchical Deterministic (HD) wallet implementation.
//!
//! This module provides BIP39/BIP32 key derivation for mnemonic-backed keys.

use crate::error::{Error, Result};
use anyhow::Context;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{Secp256k1, SecretKey, Signing};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Default Ethereum account path (BIP-44, coin type 60, first account).
pub const ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";

/// HD Wallet for mnemonic-backed key derivation.
pub struct HdWallet {
    mnemonic: bip39::Mnemonic,
}

impl HdWallet {
    /// Build the English mnemonic encoding `entropy`.
    ///
    /// 32 bytes of entropy yield a 24-word phrase.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let mnemonic = bip39::Mnemonic::from_entropy(entropy)
            .map_err(|e| Error::InvalidMnemonic(format!("{}", e)))?;

        Ok(Self { mnemonic })
    }

    /// Create an HD wallet from an existing mnemonic phrase.
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        let mnemonic = bip39::Mnemonic::from_str(phrase)
            .map_err(|e| Error::InvalidMnemonic(format!("{}", e)))?;

        Ok(Self { mnemonic })
    }

    /// Get the mnemonic phrase as a string.
    pub fn mnemonic_phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.mnemonic.to_string())
    }

    /// Derive the private key of the default Ethereum account.
    pub fn derive_ethereum_key<C: Signing>(&self, secp: &Secp256k1<C>) -> Result<SecretKey> {
        self.derive_secret_key(secp, ETHEREUM_PATH)
    }

    /// Derive the private key at `path`.
    pub fn derive_secret_key<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        path: &str,
    ) -> Result<SecretKey> {
        let path: DerivationPath = path
            .parse()
            .map_err(|e| Error::KeyDerivation(format!("Invalid derivation path: {}", e)))?;

        let master = self.master_xpriv()?;
        let derived = master
            .derive_priv(secp, &path)
            .map_err(|e| Error::KeyDerivation(format!("Key derivation failed: {}", e)))?;

        Ok(derived.private_key)
    }

    /// Derive the master extended private key from the mnemonic
    fn master_xpriv(&self) -> anyhow::Result<Xpriv> {
        // No passphrase.
        let seed = Zeroizing::new(self.mnemonic.to_seed(""));
        let xpriv = Xpriv::new_master(bitcoin::Network::Bitcoin, &seed[..])
            .context("Failed to derive Xpriv")?;

        Ok(xpriv)
    }
}
