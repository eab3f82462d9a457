//! Crypto module: X25519 key exchange and password-keyed Fernet tokens.

pub mod exchange;
pub mod password;
pub mod token;

pub use exchange::{derive_shared_secret, generate_keypair, Keypair};
pub use password::{
    decrypt, decrypt_with_ttl, derive_key, encrypt, encrypt_bytes, encrypt_with, Argon2Params,
    KdfProfile,
};
pub use token::FernetKey;
