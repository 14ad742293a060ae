use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    JsonParse(String),

    #[error("Metadata lookup not configured: {0}")]
    NotConfigured(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
