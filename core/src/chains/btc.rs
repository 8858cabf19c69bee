//! Bitcoin: secp256k1 keys, native segwit (P2WPKH) addresses and
//! "Bitcoin Signed Message" signatures.

use super::{SecpSecret, random_secret_key};
use crate::error::Result;
use crate::scheme::{Providers, WalletScheme};
use crate::types::{Chain, Network, PublicIdentity, SignatureResult, VerificationOutcome};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bitcoin::address::NetworkUnchecked;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1};
use bitcoin::sign_message::signed_msg_hash;
use bitcoin::{Address, AddressType, CompressedPublicKey};
use std::sync::Arc;

/// Header byte of a signature made with a compressed key for a P2WPKH address.
/// The recovery id (0..=3) is added to it.
const P2WPKH_HEADER: u8 = 39;

#[derive(Clone)]
pub struct BitcoinScheme {
    secp: Arc<Secp256k1<All>>,
    network: Network,
}

impl std::fmt::Debug for BitcoinScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitcoinScheme")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

impl BitcoinScheme {
    pub fn new(providers: &Providers, network: Network) -> Self {
        Self {
            secp: providers.secp(),
            network,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// P2WPKH address of a compressed public key.
    fn p2wpkh_address(&self, public_key: &[u8]) -> std::result::Result<Address, String> {
        let public_key = CompressedPublicKey::from_slice(public_key).map_err(|e| e.to_string())?;
        Ok(Address::p2wpkh(&public_key, self.network.to_bitcoin_network()))
    }

    fn parse_address(&self, address: &str) -> std::result::Result<Address, String> {
        let address = address
            .parse::<Address<NetworkUnchecked>>()
            .map_err(|e| format!("Invalid Bitcoin address: {}", e))?
            .require_network(self.network.to_bitcoin_network())
            .map_err(|e| format!("Address is for another network: {}", e))?;

        if address.address_type() != Some(AddressType::P2wpkh) {
            return Err("Not a P2WPKH address".to_string());
        }

        Ok(address)
    }

    /// Decode a base64 65-byte signature with a P2WPKH header.
    fn decode_signature(signature: &str) -> std::result::Result<RecoverableSignature, String> {
        let bytes = BASE64
            .decode(signature.trim())
            .map_err(|e| format!("Invalid base64 signature: {}", e))?;

        if bytes.len() != 65 {
            return Err(format!("Expected 65 signature bytes, got {}", bytes.len()));
        }

        let header = bytes[0];
        if !(P2WPKH_HEADER..P2WPKH_HEADER + 4).contains(&header) {
            return Err(format!("Not a P2WPKH signature header: {}", header));
        }

        let recovery_id = RecoveryId::from_i32((header - P2WPKH_HEADER) as i32)
            .map_err(|e| format!("Invalid recovery id: {}", e))?;

        RecoverableSignature::from_compact(&bytes[1..], recovery_id)
            .map_err(|e| format!("Invalid signature: {}", e))
    }
}

/// Hash of `message` framed as a "Bitcoin Signed Message".
fn message_digest(message: &str) -> Message {
    Message::from_digest(signed_msg_hash(message).to_byte_array())
}

impl WalletScheme for BitcoinScheme {
    type Key = SecpSecret;

    fn chain(&self) -> Chain {
        Chain::Bitcoin
    }

    fn generate(&self) -> Result<SecpSecret> {
        Ok(SecpSecret::new(random_secret_key()?))
    }

    fn derive_address(&self, key: &SecpSecret) -> PublicIdentity {
        let public_key = PublicKey::from_secret_key(&*self.secp, key.secret_key()).serialize();

        let address = match self.p2wpkh_address(&public_key) {
            Ok(address) => address.to_string(),
            Err(e) => {
                log::warn!("Could not derive P2WPKH address: {}", e);
                String::new()
            }
        };

        PublicIdentity {
            chain: Chain::Bitcoin,
            public_key: Some(public_key.to_vec()),
            address,
        }
    }

    fn sign(&self, key: &SecpSecret, message: &str) -> Result<SignatureResult> {
        let digest = message_digest(message);
        let signature = self.secp.sign_ecdsa_recoverable(&digest, key.secret_key());
        let (recovery_id, compact) = signature.serialize_compact();

        let mut bytes = [0u8; 65];
        bytes[0] = P2WPKH_HEADER + recovery_id.to_i32() as u8;
        bytes[1..].copy_from_slice(&compact);

        Ok(SignatureResult {
            chain: Chain::Bitcoin,
            signature: BASE64.encode(bytes),
            message: message.to_string(),
        })
    }

    fn verify(&self, address: &str, message: &str, signature: &str) -> VerificationOutcome {
        let expected = match self.parse_address(address) {
            Ok(address) => address,
            Err(reason) => return VerificationOutcome::Error(reason),
        };

        let signature = match Self::decode_signature(signature) {
            Ok(signature) => signature,
            Err(reason) => return VerificationOutcome::Error(reason),
        };

        let recovered = match self.secp.recover_ecdsa(&message_digest(message), &signature) {
            Ok(public_key) => public_key,
            Err(e) => return VerificationOutcome::Error(format!("Public key recovery failed: {}", e)),
        };

        match self.p2wpkh_address(&recovered.serialize()) {
            Ok(actual) if actual == expected => VerificationOutcome::Valid,
            Ok(_) => VerificationOutcome::Invalid,
            Err(e) => VerificationOutcome::Error(format!("Recovered key is malformed: {}", e)),
        }
    }
}
