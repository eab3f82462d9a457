//! simcrypt library crate: the operations behind the `simcrypt` binary.
//!
//! - `crypto::exchange`: X25519 key agreement expanded with HKDF-SHA256
//! - `crypto::password`: password-keyed Fernet tokens (legacy PBKDF2 or Argon2id)
//! - `codec`: Base64 text encoding
//! - `panel`: headless state of the interactive panels
pub mod codec;
pub mod crypto;
pub mod error;
pub mod panel;

pub use error::{DecodeFailure, Result, SimcryptError};
