//! Shared types for the Keyforge SDK.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde module for serializing optional byte strings as hex.
mod hex_bytes_opt {
    use super::*;

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| hex::decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Supported blockchains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Solana,
}

impl Chain {
    /// All supported chains.
    pub const ALL: [Chain; 3] = [Chain::Bitcoin, Chain::Ethereum, Chain::Solana];
}

impl std::str::FromStr for Chain {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Chain::Bitcoin),
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "solana" | "sol" => Ok(Chain::Solana),
            _ => Err(crate::error::Error::Parse(format!("Unknown chain: {}", s))),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Bitcoin => write!(f, "bitcoin"),
            Chain::Ethereum => write!(f, "ethereum"),
            Chain::Solana => write!(f, "solana"),
        }
    }
}

/// Bitcoin network type. Only affects the human-readable part of Bitcoin addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    #[default]
    Bitcoin,
    /// Bitcoin testnet.
    Testnet,
    /// Bitcoin regtest (local development).
    Regtest,
    /// Signet (including Mutinynet).
    Signet,
}

impl Network {
    /// Convert to bitcoin crate's Network type.
    pub fn to_bitcoin_network(self) -> bitcoin::Network {
        match self {
            Network::Bitcoin => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Regtest => bitcoin::Network::Regtest,
            Network::Signet => bitcoin::Network::Signet,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bitcoin" | "mainnet" => Ok(Network::Bitcoin),
            "testnet" | "testnet3" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            "signet" | "mutinynet" => Ok(Network::Signet),
            _ => Err(crate::error::Error::Parse(format!(
                "Unknown network: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Bitcoin => write!(f, "bitcoin"),
            Network::Testnet => write!(f, "testnet"),
            Network::Regtest => write!(f, "regtest"),
            Network::Signet => write!(f, "signet"),
        }
    }
}

/// Non-secret data derived from a wallet's key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub chain: Chain,
    /// Raw public key bytes. `None` for Solana, where the address is the key.
    #[serde(with = "hex_bytes_opt")]
    pub public_key: Option<Vec<u8>>,
    /// Encoded address. Empty if the address could not be derived.
    pub address: String,
}

impl PublicIdentity {
    /// Public key in the display form used by the chain.
    ///
    /// Ethereum keys are `0x`-prefixed, Bitcoin keys are plain hex.
    pub fn public_key_hex(&self) -> Option<String> {
        let bytes = self.public_key.as_ref()?;
        Some(match self.chain {
            Chain::Ethereum => format!("0x{}", hex::encode(bytes)),
            _ => hex::encode(bytes),
        })
    }

    /// Whether address derivation produced a usable address.
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }
}

/// A message signature in the chain's string encoding.
///
/// Bitcoin signatures are base64, Ethereum signatures `0x`-prefixed hex and
/// Solana signatures base58.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub chain: Chain,
    pub signature: String,
    pub message: String,
}

/// Result of verifying a signature against an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum VerificationOutcome {
    /// The signature was produced by the address's key over the message.
    Valid,
    /// Inputs were well-formed but the signature does not match.
    Invalid,
    /// Verification could not be attempted.
    Error(String),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationOutcome::Valid => write!(f, "valid"),
            VerificationOutcome::Invalid => write!(f, "invalid"),
            VerificationOutcome::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}
