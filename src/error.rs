use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimcryptError {
    #[error("Invalid peer public key: {0}")]
    InvalidPeerKey(String),

    /// Wrong password, tampered or truncated token, unknown format. Deliberately carries no detail.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeFailure),

    #[error("Encryption failed: {0}")]
    Encryption(String),
}

#[derive(Error, Debug)]
pub enum DecodeFailure {
    #[error("input is not valid Base64")]
    Base64(#[source] base64::DecodeError),

    #[error("decoded bytes are not valid UTF-8 text")]
    Utf8(#[source] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, SimcryptError>;
