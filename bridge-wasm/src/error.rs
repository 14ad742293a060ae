//! Error types for WebAssembly bridge implementations

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// No `window` object (e.g. running inside a worker)
    #[error("Browser global not available: {0}")]
    NotAvailable(String),

    /// JavaScript error from web-sys
    #[error("JavaScript error in {context}: {message}")]
    JavaScript {
        /// Storage call that raised the error
        context: String,
        /// Message extracted from the thrown value
        message: String,
    },
}

impl WasmError {
    /// Convert a thrown JavaScript value into a typed error
    pub fn from_js(context: &str, value: JsValue) -> Self {
        let message = if value.is_string() {
            value.as_string().unwrap_or_default()
        } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
            error.message().into()
        } else {
            format!("{:?}", value)
        };
        WasmError::JavaScript {
            context: context.to_string(),
            message,
        }
    }
}

impl From<WasmError> for bridge_traits::error::BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::NotAvailable(what) => bridge_traits::error::BridgeError::NotAvailable(what),
            other => bridge_traits::error::BridgeError::OperationFailed(other.to_string()),
        }
    }
}
