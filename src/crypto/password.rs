//! Password-keyed token encryption.
//!
//! Two key derivations feed the same Fernet envelope:
//!
//! - `Legacy`: PBKDF2-HMAC-SHA256, empty salt, 10 iterations. Deterministic
//!   from the password alone, which makes it cheap to brute-force. Kept so that
//!   tokens written by the older desktop tool still open.
//! - `Hardened` (default): Argon2id with a fresh random salt per token. The
//!   salt and cost parameters travel in a small header in front of the Fernet
//!   token:
//!
//! ```text
//! Offset  Size  Field
//! 0       1     Version: 0x81
//! 1       4     m_cost (Argon2, u32 big-endian)
//! 5       4     t_cost (Argon2, u32 big-endian)
//! 9       4     p_cost (Argon2, u32 big-endian)
//! 13      16    Salt (random bytes)
//! 29      N     Raw Fernet token (starts with 0x80)
//! ```
//!
//! Both forms are URL-safe Base64 with padding. `decrypt` tells them apart by
//! the first decoded byte.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::token::{self, FernetKey, FERNET_KEY_LEN, FERNET_VERSION};
use crate::error::{Result, SimcryptError};

/// PBKDF2 iteration count of the legacy derivation.
pub const LEGACY_PBKDF2_ROUNDS: u32 = 10;

/// Version byte of a salted Argon2id token.
pub const SEALED_VERSION: u8 = 0x81;

const SALT_LEN: usize = 16;
const SEALED_HEADER_LEN: usize = 1 + 4 + 4 + 4 + SALT_LEN;

/// Upper bounds applied to parameters read back from a token header.
///
/// The header is not authenticated until after the key is derived, so these
/// cap the work a forged token can demand at what `Argon2Params::default` costs.
const MAX_M_COST: u32 = 65536;
const MAX_T_COST: u32 = 4;
const MAX_P_COST: u32 = 4;

/// Which key derivation protects a new token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfProfile {
    /// PBKDF2-SHA256, empty salt, 10 rounds; compatible with the original tool.
    Legacy,
    /// Argon2id with a random per-token salt.
    #[default]
    Hardened,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            m_cost: 65536,
            t_cost: 3,
            p_cost: 1,
        }
    }
}

impl Argon2Params {
    fn within_bounds(&self) -> bool {
        self.m_cost <= MAX_M_COST && self.t_cost <= MAX_T_COST && self.p_cost <= MAX_P_COST
    }
}

/// Legacy Fernet key: PBKDF2-HMAC-SHA256 over the password with an empty salt.
///
/// Same password, same key. Use `FernetKey::to_base64` for the text form.
pub fn derive_key(password: &str) -> FernetKey {
    let mut out = Zeroizing::new([0u8; FERNET_KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), b"", LEGACY_PBKDF2_ROUNDS, out.as_mut());
    FernetKey::from_bytes(*out)
}

/// Argon2id Fernet key from password, salt and explicit parameters.
pub fn derive_sealed_key(password: &str, salt: &[u8], params: Argon2Params) -> Result<FernetKey> {
    let argon_params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(FERNET_KEY_LEN))
        .map_err(|e| SimcryptError::Encryption(format!("argon2 params error: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut out = Zeroizing::new([0u8; FERNET_KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, out.as_mut())
        .map_err(|e| SimcryptError::Encryption(format!("argon2 hash error: {}", e)))?;
    Ok(FernetKey::from_bytes(*out))
}

/// Encrypt with the default (hardened) profile.
pub fn encrypt(password: &str, plaintext: &str) -> Result<String> {
    encrypt_with(KdfProfile::default(), password, plaintext)
}

/// Encrypt under the given key derivation profile.
pub fn encrypt_with(profile: KdfProfile, password: &str, plaintext: &str) -> Result<String> {
    match profile {
        KdfProfile::Legacy => {
            let key = derive_key(password);
            tracing::debug!(len = plaintext.len(), "sealing legacy token");
            Ok(token::seal(&key, plaintext.as_bytes()))
        }
        KdfProfile::Hardened => encrypt_sealed(password, plaintext, Argon2Params::default()),
    }
}

/// Encrypt text supplied as raw bytes; fails with `Encryption` if it is not UTF-8.
pub fn encrypt_bytes(profile: KdfProfile, password: &str, plaintext: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(plaintext)
        .map_err(|e| SimcryptError::Encryption(format!("plaintext is not valid UTF-8: {}", e)))?;
    encrypt_with(profile, password, text)
}

/// Hardened encryption with explicit Argon2id parameters.
pub fn encrypt_sealed(password: &str, plaintext: &str, params: Argon2Params) -> Result<String> {
    let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
    let key = derive_sealed_key(password, &salt, params)?;
    let iv: [u8; 16] = rand::thread_rng().gen();
    let inner = token::seal_raw(&key, plaintext.as_bytes(), token::unix_now(), iv);

    let mut envelope = Vec::with_capacity(SEALED_HEADER_LEN + inner.len());
    envelope.push(SEALED_VERSION);
    envelope.extend_from_slice(&params.m_cost.to_be_bytes());
    envelope.extend_from_slice(&params.t_cost.to_be_bytes());
    envelope.extend_from_slice(&params.p_cost.to_be_bytes());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&inner);

    tracing::debug!(len = plaintext.len(), m_cost = params.m_cost, "sealing hardened token");
    Ok(URL_SAFE.encode(envelope))
}

/// Verify and decrypt a token of either profile.
pub fn decrypt(password: &str, token: &str) -> Result<String> {
    decrypt_inner(password, token, None)
}

/// Like `decrypt`, but also rejects tokens older than `ttl` seconds.
pub fn decrypt_with_ttl(password: &str, token: &str, ttl: u64) -> Result<String> {
    decrypt_inner(password, token, Some(ttl))
}

fn decrypt_inner(password: &str, token: &str, ttl: Option<u64>) -> Result<String> {
    let raw = URL_SAFE
        .decode(token.trim())
        .map_err(|_| SimcryptError::InvalidToken)?;

    let plaintext = match raw.first() {
        Some(&FERNET_VERSION) => {
            tracing::debug!("opening legacy token");
            token::open_raw(&derive_key(password), &raw, ttl, token::unix_now())?
        }
        Some(&SEALED_VERSION) => {
            tracing::debug!("opening hardened token");
            open_sealed(password, &raw, ttl)?
        }
        _ => return Err(SimcryptError::InvalidToken),
    };

    String::from_utf8(plaintext).map_err(|_| SimcryptError::InvalidToken)
}

fn open_sealed(password: &str, raw: &[u8], ttl: Option<u64>) -> Result<Vec<u8>> {
    if raw.len() < SEALED_HEADER_LEN {
        return Err(SimcryptError::InvalidToken);
    }
    let read_u32 = |at: usize| -> Result<u32> {
        raw[at..at + 4]
            .try_into()
            .map(u32::from_be_bytes)
            .map_err(|_| SimcryptError::InvalidToken)
    };
    let params = Argon2Params {
        m_cost: read_u32(1)?,
        t_cost: read_u32(5)?,
        p_cost: read_u32(9)?,
    };
    if !params.within_bounds() {
        tracing::debug!(?params, "refusing out-of-bounds argon2 parameters");
        return Err(SimcryptError::InvalidToken);
    }

    let salt = &raw[13..SEALED_HEADER_LEN];
    let key = derive_sealed_key(password, salt, params).map_err(|_| SimcryptError::InvalidToken)?;
    token::open_raw(&key, &raw[SEALED_HEADER_LEN..], ttl, token::unix_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheap parameters so the hardened path stays fast under test.
    fn fast_params() -> Argon2Params {
        Argon2Params {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        }
    }

    #[test]
    fn test_derive_key_deterministic() {
        let a = derive_key("secret");
        let b = derive_key("secret");
        assert_eq!(a, b, "same password must yield same key");
        assert_ne!(*a.as_bytes(), [0u8; 32]);
    }

    #[test]
    fn test_derive_key_differs_per_password() {
        assert_ne!(derive_key("secret"), derive_key("wrong"));
    }

    #[test]
    fn test_derive_key_matches_pbkdf2_parameters() {
        let mut expected = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"secret", b"", 10, &mut expected);
        assert_eq!(*derive_key("secret").as_bytes(), expected);
    }

    #[test]
    fn test_derive_key_text_form_is_urlsafe_base64() {
        let text = derive_key("secret").to_base64();
        assert_eq!(text.len(), 44);
        assert!(text.ends_with('='));
        assert!(!text.contains('+') && !text.contains('/'));
    }

    #[test]
    fn test_derive_sealed_key_deterministic_per_salt() {
        let a = derive_sealed_key("pw", &[1u8; 16], fast_params()).unwrap();
        let b = derive_sealed_key("pw", &[1u8; 16], fast_params()).unwrap();
        let c = derive_sealed_key("pw", &[2u8; 16], fast_params()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c, "different salts must produce different keys");
    }

    #[test]
    fn test_legacy_round_trip() {
        let token = encrypt_with(KdfProfile::Legacy, "secret", "hello").unwrap();
        assert_eq!(decrypt("secret", &token).unwrap(), "hello");
    }

    #[test]
    fn test_legacy_wrong_password() {
        let token = encrypt_with(KdfProfile::Legacy, "secret", "hello").unwrap();
        assert!(matches!(decrypt("wrong", &token), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_default_profile_round_trip() {
        let token = encrypt("secret", "hello").unwrap();
        assert_eq!(URL_SAFE.decode(&token).unwrap()[0], SEALED_VERSION);
        assert_eq!(decrypt("secret", &token).unwrap(), "hello");
        assert!(matches!(decrypt("wrong", &token), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_sealed_round_trip_and_header() {
        let token = encrypt_sealed("secret", "hello", fast_params()).unwrap();
        let raw = URL_SAFE.decode(&token).unwrap();
        assert_eq!(raw[0], SEALED_VERSION);
        assert_eq!(u32::from_be_bytes(raw[1..5].try_into().unwrap()), 256);
        assert_eq!(raw[SEALED_HEADER_LEN], FERNET_VERSION);
        assert_eq!(decrypt("secret", &token).unwrap(), "hello");
    }

    #[test]
    fn test_sealed_tokens_use_fresh_salt() {
        let a = URL_SAFE.decode(encrypt_sealed("pw", "x", fast_params()).unwrap()).unwrap();
        let b = URL_SAFE.decode(encrypt_sealed("pw", "x", fast_params()).unwrap()).unwrap();
        assert_ne!(a[13..SEALED_HEADER_LEN], b[13..SEALED_HEADER_LEN]);
    }

    #[test]
    fn test_sealed_tampered_salt_rejected() {
        let token = encrypt_sealed("secret", "hello", fast_params()).unwrap();
        let mut raw = URL_SAFE.decode(&token).unwrap();
        raw[20] ^= 0xff;
        let bad = URL_SAFE.encode(raw);
        assert!(matches!(decrypt("secret", &bad), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_sealed_out_of_bounds_params_rejected() {
        let token = encrypt_sealed("secret", "hello", fast_params()).unwrap();
        let mut raw = URL_SAFE.decode(&token).unwrap();
        raw[1..5].copy_from_slice(&u32::MAX.to_be_bytes());
        let bad = URL_SAFE.encode(raw);
        assert!(matches!(decrypt("secret", &bad), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_default_params_within_bounds() {
        assert!(Argon2Params::default().within_bounds());
    }

    #[test]
    fn test_expensive_forged_header_rejected_without_hashing() {
        let mut raw = vec![SEALED_VERSION];
        raw.extend_from_slice(&(1u32 << 20).to_be_bytes());
        raw.extend_from_slice(&16u32.to_be_bytes());
        raw.extend_from_slice(&1u32.to_be_bytes());
        raw.extend_from_slice(&[0u8; SALT_LEN]);
        raw.extend_from_slice(&[0u8; 73]);
        let forged = URL_SAFE.encode(raw);

        let started = std::time::Instant::now();
        let result = decrypt("anything", &forged);
        assert!(matches!(result, Err(SimcryptError::InvalidToken)));
        assert!(
            started.elapsed() < std::time::Duration::from_secs(1),
            "forged cost parameters must be refused before running Argon2"
        );
    }

    #[test]
    fn test_header_params_just_over_default_rejected() {
        for (offset, value) in [(1usize, 65537u32), (5, 5), (9, 5)] {
            let token = encrypt_sealed("secret", "hello", fast_params()).unwrap();
            let mut raw = URL_SAFE.decode(&token).unwrap();
            raw[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
            let bad = URL_SAFE.encode(raw);
            assert!(matches!(decrypt("secret", &bad), Err(SimcryptError::InvalidToken)));
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let bad = URL_SAFE.encode([0x42u8; 80]);
        assert!(matches!(decrypt("secret", &bad), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_garbage_and_empty_rejected() {
        assert!(matches!(decrypt("secret", ""), Err(SimcryptError::InvalidToken)));
        assert!(matches!(decrypt("secret", "not a token"), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_token_surrounding_whitespace_ignored() {
        let token = encrypt_with(KdfProfile::Legacy, "secret", "hello").unwrap();
        assert_eq!(decrypt("secret", &format!("{}\n", token)).unwrap(), "hello");
    }

    #[test]
    fn test_non_utf8_plaintext_is_invalid_token() {
        let key = derive_key("secret");
        let raw = token::seal_raw(&key, &[0xff, 0xfe], token::unix_now(), [0u8; 16]);
        let token = URL_SAFE.encode(raw);
        assert!(matches!(decrypt("secret", &token), Err(SimcryptError::InvalidToken)));
    }

    #[test]
    fn test_encrypt_bytes_rejects_non_utf8() {
        let result = encrypt_bytes(KdfProfile::Legacy, "secret", &[0xc3, 0x28]);
        assert!(matches!(result, Err(SimcryptError::Encryption(_))));
    }

    #[test]
    fn test_encrypt_bytes_accepts_utf8() {
        let token = encrypt_bytes(KdfProfile::Legacy, "pw", "héllo".as_bytes()).unwrap();
        assert_eq!(decrypt("pw", &token).unwrap(), "héllo");
    }

    #[test]
    fn test_decrypt_with_ttl_accepts_fresh_token() {
        let token = encrypt_with(KdfProfile::Legacy, "pw", "fresh").unwrap();
        assert_eq!(decrypt_with_ttl("pw", &token, 60).unwrap(), "fresh");
    }

    #[test]
    fn test_decrypt_with_ttl_rejects_stale_token() {
        let key = derive_key("pw");
        let raw = token::seal_raw(&key, b"stale", token::unix_now() - 3_600, [0u8; 16]);
        let token = URL_SAFE.encode(raw);
        assert!(decrypt("pw", &token).is_ok());
        assert!(matches!(
            decrypt_with_ttl("pw", &token, 60),
            Err(SimcryptError::InvalidToken)
        ));
    }
}
