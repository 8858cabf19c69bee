use proptest::prelude::*;

use keyforge_core::{Chain, Network, VerificationOutcome, WalletSession};

fn chain_strategy() -> impl Strategy<Value = Chain> {
    prop_oneof![
        Just(Chain::Bitcoin),
        Just(Chain::Ethereum),
        Just(Chain::Solana),
    ]
}

/// Decode a signature string to raw bytes for the chain's encoding.
fn decode(chain: Chain, signature: &str) -> Vec<u8> {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    match chain {
        Chain::Bitcoin => BASE64.decode(signature).unwrap(),
        Chain::Ethereum => hex::decode(&signature[2..]).unwrap(),
        Chain::Solana => bs58::decode(signature).into_vec().unwrap(),
    }
}

fn encode(chain: Chain, bytes: &[u8]) -> String {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    match chain {
        Chain::Bitcoin => BASE64.encode(bytes),
        Chain::Ethereum => format!("0x{}", hex::encode(bytes)),
        Chain::Solana => bs58::encode(bytes).into_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_verify_roundtrip(
        chain in chain_strategy(),
        message in ".{0,64}",
    ) {
        let mut session = WalletSession::new(Network::Bitcoin);
        session.create(chain).unwrap();

        let sig = session.sign(&message).unwrap();
        prop_assert_eq!(
            session.verify(&message, &sig.signature).unwrap(),
            VerificationOutcome::Valid
        );
    }

    #[test]
    fn flipped_signature_byte_is_rejected(
        chain in chain_strategy(),
        message in "[a-zA-Z0-9 ]{1,32}",
        index in 0usize..65,
        flip in 1u8..=255,
    ) {
        let mut session = WalletSession::new(Network::Bitcoin);
        session.create(chain).unwrap();
        let sig = session.sign(&message).unwrap();

        let mut bytes = decode(chain, &sig.signature);
        let index = index % bytes.len();
        bytes[index] ^= flip;
        let tampered = encode(chain, &bytes);

        let outcome = session.verify(&message, &tampered).unwrap();
        prop_assert!(!outcome.is_valid(), "{} accepted a tampered signature", chain);
    }

    #[test]
    fn modified_message_is_rejected(
        chain in chain_strategy(),
        message in "[a-zA-Z0-9 ]{1,32}",
        suffix in "[a-zA-Z0-9]{1,4}",
    ) {
        let mut session = WalletSession::new(Network::Bitcoin);
        session.create(chain).unwrap();
        let sig = session.sign(&message).unwrap();

        let tampered = format!("{}{}", message, suffix);
        let outcome = session.verify(&tampered, &sig.signature).unwrap();
        prop_assert!(!outcome.is_valid());
    }
}
