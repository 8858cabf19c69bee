//! Keyforge - WASM Bindings
//!
//! This crate provides WebAssembly bindings for the Keyforge core library.
//! It wraps the wallet session with WASM-compatible types for JavaScript interop.
//!
//! **Note:** This crate is WASM-only and will not compile for native targets.
//!
//! # Usage from JavaScript/TypeScript
//!
//! ```javascript
//! import init, { Chain, WalletSession, verifySignature } from '@keyforge/sdk';
//!
//! // Initialize WASM
//! await init();
//!
//! const session = new WalletSession('bitcoin');
//! const identity = session.create(Chain.Ethereum);
//! console.log(identity.address, identity.publicKey);
//!
//! const signed = session.sign('hello');
//! const result = session.verify('hello', signed.signature);
//! console.log(result.valid);
//!
//! // Verify without a wallet
//! verifySignature(Chain.Ethereum, 'bitcoin', identity.address, 'hello', signed.signature);
//! ```

// This crate only compiles for WASM targets
#![cfg(target_arch = "wasm32")]

mod client;
mod error;
mod js_types;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use client::*;
pub use error::*;
pub use js_types::*;

/// Initialize the WASM module.
///
/// This sets up logging and panic hooks for better debugging.
#[wasm_bindgen(start)]
pub fn initialize() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("Keyforge SDK initialized");
}

/// Serialize a value to JsValue as a plain object (not a Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
