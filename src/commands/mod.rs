pub mod codec;
pub mod decrypt;
pub mod derive_key;
pub mod encrypt;
pub mod exchange;
pub mod interactive;
pub mod keygen;
