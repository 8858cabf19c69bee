use crate::to_js_error;
use crate::to_js_value;
use crate::{Chain, PublicIdentity, SignatureResult, VerificationResult};
use keyforge_core::{Network, Providers};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

fn parse_network(network: Option<String>) -> Result<Network, JsValue> {
    match network {
        Some(network) => network.parse().map_err(to_js_error),
        None => Ok(Network::default()),
    }
}

/// Ephemeral wallet session.
#[wasm_bindgen]
pub struct WalletSession {
    inner: keyforge_core::WalletSession,
}

#[wasm_bindgen]
impl WalletSession {
    /// Create an empty session.
    ///
    /// # Arguments
    /// * `network` - The Bitcoin network ("bitcoin", "testnet", "regtest" or "signet").
    ///   Defaults to mainnet.
    #[wasm_bindgen(constructor)]
    pub fn new(network: Option<String>) -> Result<WalletSession, JsValue> {
        let network = parse_network(network)?;
        Ok(WalletSession {
            inner: keyforge_core::WalletSession::new(network),
        })
    }

    /// Generate a new wallet, replacing the current one.
    #[wasm_bindgen(js_name = "create")]
    pub fn create(&mut self, chain: Chain) -> Result<PublicIdentity, JsValue> {
        self.inner
            .create(chain.into())
            .map(Into::into)
            .map_err(to_js_error)
    }

    /// Sign a message with the current wallet.
    #[wasm_bindgen(js_name = "sign")]
    pub fn sign(&self, message: String) -> Result<SignatureResult, JsValue> {
        self.inner
            .sign(&message)
            .map(Into::into)
            .map_err(to_js_error)
    }

    /// Verify a signature against the current wallet's address.
    #[wasm_bindgen(js_name = "verify")]
    pub fn verify(&self, message: String, signature: String) -> Result<VerificationResult, JsValue> {
        self.inner
            .verify(&message, &signature)
            .map(Into::into)
            .map_err(to_js_error)
    }

    /// Verify a signature against another address of the current wallet's chain.
    #[wasm_bindgen(js_name = "verifyWithAddress")]
    pub fn verify_with_address(
        &self,
        address: String,
        message: String,
        signature: String,
    ) -> Result<VerificationResult, JsValue> {
        self.inner
            .verify_with_address(&address, &message, &signature)
            .map(Into::into)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn chain(&self) -> Option<Chain> {
        self.inner.chain().map(Into::into)
    }

    #[wasm_bindgen(getter)]
    pub fn address(&self) -> Option<String> {
        self.inner.address().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = "publicKey")]
    pub fn public_key(&self) -> Option<String> {
        self.inner.identity().and_then(|i| i.public_key_hex())
    }

    /// The current public identity as a plain object, or `null`.
    #[wasm_bindgen(js_name = "toJSON")]
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        match self.inner.identity() {
            Some(identity) => to_js_value(identity),
            None => Ok(JsValue::NULL),
        }
    }
}

/// Verify a signature for any chain without creating a wallet.
#[wasm_bindgen(js_name = "verifySignature")]
pub fn verify_signature(
    chain: Chain,
    network: Option<String>,
    address: String,
    message: String,
    signature: String,
) -> Result<VerificationResult, JsValue> {
    let network = parse_network(network)?;
    let outcome = keyforge_core::verify(
        &Providers::new(),
        network,
        chain.into(),
        &address,
        &message,
        &signature,
    );
    Ok(outcome.into())
}
