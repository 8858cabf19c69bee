//! Ethereum: mnemonic-derived secp256k1 keys, EIP-55 addresses and
//! personal-sign (EIP-191) signatures.

use super::{SecpSecret, random_bytes32};
use crate::error::Result;
use crate::hd_wallet::HdWallet;
use crate::scheme::{Providers, WalletScheme};
use crate::types::{Chain, PublicIdentity, SignatureResult, VerificationOutcome};
use bitcoin::secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use bitcoin::secp256k1::{All, Message, PublicKey, Secp256k1};
use sha3::{Digest, Keccak256};
use std::sync::Arc;

const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Offset added to the recovery id in the `v` byte.
const V_OFFSET: u8 = 27;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Keccak-256 of `message` with the personal-sign prefix and decimal byte length.
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Address bytes of a secp256k1 public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed point without its `0x04` tag.
pub fn address_bytes(public_key: &PublicKey) -> [u8; 20] {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// EIP-55 mixed-case checksum encoding of an address.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `0x` followed by 40 hex digits, in any case.
fn is_hex_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[derive(Clone)]
pub struct EthereumScheme {
    secp: Arc<Secp256k1<All>>,
}

impl std::fmt::Debug for EthereumScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumScheme").finish_non_exhaustive()
    }
}

impl EthereumScheme {
    pub fn new(providers: &Providers) -> Self {
        Self {
            secp: providers.secp(),
        }
    }

    /// Key of the default account of the mnemonic encoding `entropy`.
    pub fn key_from_entropy(&self, entropy: &[u8]) -> Result<SecpSecret> {
        let wallet = HdWallet::from_entropy(entropy)?;
        Ok(SecpSecret::new(wallet.derive_ethereum_key(&*self.secp)?))
    }

    /// Key of the default account of a mnemonic phrase.
    pub fn key_from_phrase(&self, phrase: &str) -> Result<SecpSecret> {
        let wallet = HdWallet::from_mnemonic(phrase)?;
        Ok(SecpSecret::new(wallet.derive_ethereum_key(&*self.secp)?))
    }

    fn decode_signature(signature: &str) -> std::result::Result<RecoverableSignature, String> {
        let signature = signature.trim();
        let hex = signature.strip_prefix("0x").unwrap_or(signature);
        let bytes = hex::decode(hex).map_err(|e| format!("Invalid hex signature: {}", e))?;

        if bytes.len() != 65 {
            return Err(format!("Expected 65 signature bytes, got {}", bytes.len()));
        }

        let v = match bytes[64] {
            v @ (27 | 28) => v - V_OFFSET,
            v => return Err(format!("Invalid recovery byte {}", v)),
        };
        let recovery_id =
            RecoveryId::from_i32(v as i32).map_err(|e| format!("Invalid recovery id: {}", e))?;

        RecoverableSignature::from_compact(&bytes[..64], recovery_id)
            .map_err(|e| format!("Invalid signature: {}", e))
    }
}

impl WalletScheme for EthereumScheme {
    type Key = SecpSecret;

    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn generate(&self) -> Result<SecpSecret> {
        let entropy = random_bytes32()?;
        self.key_from_entropy(&entropy[..])
    }

    fn derive_address(&self, key: &SecpSecret) -> PublicIdentity {
        let public_key = PublicKey::from_secret_key(&*self.secp, key.secret_key());

        PublicIdentity {
            chain: Chain::Ethereum,
            public_key: Some(public_key.serialize_uncompressed().to_vec()),
            address: to_checksum_address(&address_bytes(&public_key)),
        }
    }

    fn sign(&self, key: &SecpSecret, message: &str) -> Result<SignatureResult> {
        let digest = Message::from_digest(personal_message_hash(message));
        let signature = self.secp.sign_ecdsa_recoverable(&digest, key.secret_key());
        let (recovery_id, compact) = signature.serialize_compact();

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = V_OFFSET + recovery_id.to_i32() as u8;

        Ok(SignatureResult {
            chain: Chain::Ethereum,
            signature: format!("0x{}", hex::encode(bytes)),
            message: message.to_string(),
        })
    }

    fn verify(&self, address: &str, message: &str, signature: &str) -> VerificationOutcome {
        if !is_hex_address(address) {
            return VerificationOutcome::Error(format!("Invalid Ethereum address: {}", address));
        }

        let signature = match Self::decode_signature(signature) {
            Ok(signature) => signature,
            Err(reason) => return VerificationOutcome::Error(reason),
        };

        let digest = Message::from_digest(personal_message_hash(message));
        let recovered = match self.secp.recover_ecdsa(&digest, &signature) {
            Ok(public_key) => public_key,
            Err(e) => return VerificationOutcome::Error(format!("Public key recovery failed: {}", e)),
        };

        let recovered = to_checksum_address(&address_bytes(&recovered));
        if recovered.eq_ignore_ascii_case(address) {
            VerificationOutcome::Valid
        } else {
            VerificationOutcome::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::SecretKey;

    // Hardhat/Anvil account #0
    const ANVIL_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const ANVIL_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    const TEST_PRIVATE_KEY: &str =
        "501c797c4b1fdfa88fb7efdf7c9871b8e0f46dbc44259e3e270e0d4c938165f5";
    const TEST_ADDRESS: &str = "0xb611C31e4284BF7A7daD3296e62880F14b3b15DD";

    fn scheme() -> EthereumScheme {
        EthereumScheme::new(&Providers::new())
    }

    fn key_from_hex(hex_key: &str) -> SecpSecret {
        SecpSecret::new(SecretKey::from_slice(&hex::decode(hex_key).unwrap()).unwrap())
    }

    #[test]
    fn test_derive_address() {
        let scheme = scheme();
        assert_eq!(
            scheme.derive_address(&key_from_hex(ANVIL_PRIVATE_KEY)).address,
            ANVIL_ADDRESS
        );
        assert_eq!(
            scheme.derive_address(&key_from_hex(TEST_PRIVATE_KEY)).address,
            TEST_ADDRESS
        );
    }

    #[test]
    fn test_public_key_is_uncompressed() {
        let identity = scheme().derive_address(&key_from_hex(ANVIL_PRIVATE_KEY));
        let public_key = identity.public_key.as_ref().unwrap();
        assert_eq!(public_key.len(), 65);
        assert_eq!(public_key[0], 0x04);
        assert!(identity.public_key_hex().unwrap().starts_with("0x04"));
    }

    #[test]
    fn test_key_from_phrase() {
        let scheme = scheme();
        let key = scheme.key_from_phrase(ANVIL_MNEMONIC).unwrap();
        assert_eq!(scheme.derive_address(&key).address, ANVIL_ADDRESS);
    }

    #[test]
    fn test_zero_entropy_is_deterministic() {
        let scheme = scheme();
        let a = scheme.derive_address(&scheme.key_from_entropy(&[0u8; 32]).unwrap());
        let b = scheme.derive_address(&scheme.key_from_entropy(&[0u8; 32]).unwrap());
        assert_eq!(a, b);

        let sig = scheme
            .sign(&scheme.key_from_entropy(&[0u8; 32]).unwrap(), "hello")
            .unwrap();
        assert_eq!(
            scheme.verify(&a.address, "hello", &sig.signature),
            VerificationOutcome::Valid
        );
        assert_eq!(
            scheme.verify(&a.address, "hello!", &sig.signature),
            VerificationOutcome::Invalid
        );
    }

    #[test]
    fn test_personal_message_hash() {
        assert_eq!(
            hex::encode(personal_message_hash("Hello World")),
            "a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2"
        );
    }

    #[test]
    fn test_checksum_round_trip() {
        let lower = "0xb611c31e4284bf7a7dad3296e62880f14b3b15dd";
        let bytes: [u8; 20] = hex::decode(&lower[2..]).unwrap().try_into().unwrap();
        assert_eq!(to_checksum_address(&bytes), TEST_ADDRESS);
    }

    #[test]
    fn test_signature_format() {
        let scheme = scheme();
        let sig = scheme
            .sign(&key_from_hex(ANVIL_PRIVATE_KEY), "hello")
            .unwrap();
        assert!(sig.signature.starts_with("0x"));
        assert_eq!(sig.signature.len(), 2 + 130);

        let v = u8::from_str_radix(&sig.signature[130..], 16).unwrap();
        assert!(v == 27 || v == 28);
    }

    #[test]
    fn test_verify_accepts_lowercase_address() {
        let scheme = scheme();
        let key = key_from_hex(ANVIL_PRIVATE_KEY);
        let sig = scheme.sign(&key, "hello").unwrap();

        let lower = ANVIL_ADDRESS.to_lowercase();
        assert!(scheme.verify(&lower, "hello", &sig.signature).is_valid());
    }

    #[test]
    fn test_flipped_recovery_byte_is_rejected() {
        let scheme = scheme();
        let key = key_from_hex(ANVIL_PRIVATE_KEY);
        let sig = scheme.sign(&key, "hello").unwrap();
        let bytes = hex::decode(&sig.signature[2..]).unwrap();

        // Raw 0/1 recovery ids are not accepted.
        let mut raw_v = bytes.clone();
        raw_v[64] -= V_OFFSET;
        assert!(matches!(
            scheme.verify(ANVIL_ADDRESS, "hello", &hex::encode(&raw_v)),
            VerificationOutcome::Error(_)
        ));

        // The other recovery id recovers a different key.
        let mut other_v = bytes;
        other_v[64] = if other_v[64] == 27 { 28 } else { 27 };
        assert!(!scheme
            .verify(ANVIL_ADDRESS, "hello", &hex::encode(&other_v))
            .is_valid());
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let scheme = scheme();
        let sig = scheme
            .sign(&key_from_hex(ANVIL_PRIVATE_KEY), "hello")
            .unwrap();

        for address in ["", "0x123", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"] {
            assert!(matches!(
                scheme.verify(address, "hello", &sig.signature),
                VerificationOutcome::Error(_)
            ));
        }
        assert!(matches!(
            scheme.verify(ANVIL_ADDRESS, "hello", "0xzz"),
            VerificationOutcome::Error(_)
        ));
        assert!(matches!(
            scheme.verify(ANVIL_ADDRESS, "hello", "0x00"),
            VerificationOutcome::Error(_)
        ));

        let mut bytes = hex::decode(&sig.signature[2..]).unwrap();
        bytes[64] = 5;
        assert!(matches!(
            scheme.verify(ANVIL_ADDRESS, "hello", &hex::encode(&bytes)),
            VerificationOutcome::Error(_)
        ));
    }
}
