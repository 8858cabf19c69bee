//! Error conversion utilities for WASM.

use keyforge_core::Error;
use wasm_bindgen::prelude::*;

/// JavaScript `Error.name` for each failure kind, so callers can branch on it.
fn error_name(err: &Error) -> &'static str {
    match err {
        Error::NotInitialized => "NotInitializedError",
        Error::Generation(_) => "GenerationError",
        Error::InvalidMnemonic(_) | Error::KeyDerivation(_) => "KeyDerivationError",
        Error::Signing(_) => "SigningError",
        Error::Parse(_) => "ParseError",
        Error::Other(_) => "Error",
    }
}

/// Convert a core error into a JavaScript `Error`.
pub fn to_js_error(err: Error) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(error_name(&err));
    js_err.into()
}
