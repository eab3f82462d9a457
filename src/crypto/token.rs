//! Fernet envelope: AES-128-CBC encryption authenticated with HMAC-SHA256.
//!
//! Token layout (before URL-safe Base64 with padding):
//!
//! ```text
//! Offset  Size  Field
//! 0       1     Version: 0x80
//! 1       8     Timestamp (seconds since epoch, u64 big-endian)
//! 9       16    IV (random)
//! 25      N     AES-128-CBC ciphertext, PKCS7 padded (N multiple of 16)
//! 25+N    32    HMAC-SHA256 over bytes 0..25+N
//! ```
//!
//! No associated data is bound. Every verification failure collapses into
//! `SimcryptError::InvalidToken`.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, SimcryptError};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Version byte of a Fernet token.
pub const FERNET_VERSION: u8 = 0x80;

/// Raw key length: 16 bytes signing key followed by 16 bytes encryption key.
pub const FERNET_KEY_LEN: usize = 32;

const IV_LEN: usize = 16;
const TAG_LEN: usize = 32;
const BLOCK_LEN: usize = 16;
/// Version + timestamp + IV.
const HEADER_LEN: usize = 1 + 8 + IV_LEN;

/// Tokens stamped further than this into the future are rejected when a TTL is enforced.
pub const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// A 32-byte Fernet key, zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct FernetKey(Zeroizing<[u8; FERNET_KEY_LEN]>);

impl FernetKey {
    pub fn from_bytes(bytes: [u8; FERNET_KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Random key from the thread RNG.
    pub fn generate() -> Self {
        Self::from_bytes(rand::thread_rng().gen())
    }

    /// Parse the 44-character URL-safe Base64 text form.
    pub fn from_base64(text: &str) -> Option<Self> {
        let bytes = Zeroizing::new(URL_SAFE.decode(text.trim()).ok()?);
        let raw: [u8; FERNET_KEY_LEN] = bytes.as_slice().try_into().ok()?;
        Some(Self::from_bytes(raw))
    }

    /// URL-safe Base64 text form, the alphabet Fernet keys are exchanged in.
    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(&self.0[..])
    }

    pub fn as_bytes(&self) -> &[u8; FERNET_KEY_LEN] {
        &self.0
    }

    fn signing_key(&self) -> &[u8] {
        &self.0[..16]
    }

    fn encryption_key(&self) -> &[u8] {
        &self.0[16..]
    }
}

impl std::fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FernetKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    unix_seconds(std::time::SystemTime::now())
}

/// Seconds since the Unix epoch for `at`; clocks before 1970 read as 0.
fn unix_seconds(at: std::time::SystemTime) -> u64 {
    match at.duration_since(std::time::UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        Err(e) => {
            tracing::warn!(behind = ?e.duration(), "system clock is before 1970, using timestamp 0");
            0
        }
    }
}

fn mac_for(key: &FernetKey) -> HmacSha256 {
    // HMAC accepts keys of any length, 16 bytes cannot fail.
    <HmacSha256 as Mac>::new_from_slice(key.signing_key())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"))
}

/// Encrypt `plaintext` into raw (not yet Base64 encoded) token bytes with a
/// caller-supplied timestamp and IV.
pub fn seal_raw(key: &FernetKey, plaintext: &[u8], timestamp: u64, iv: [u8; IV_LEN]) -> Vec<u8> {
    let ciphertext = Aes128CbcEnc::new_from_slices(key.encryption_key(), &iv)
        .unwrap_or_else(|_| unreachable!("AES-128 key and IV are fixed length"))
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + TAG_LEN);
    token.push(FERNET_VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(&iv);
    token.extend_from_slice(&ciphertext);

    let mut mac = mac_for(key);
    mac.update(&token);
    token.extend_from_slice(&mac.finalize().into_bytes());
    token
}

/// Encrypt `plaintext` into a Base64 Fernet token stamped with the current time.
pub fn seal(key: &FernetKey, plaintext: &[u8]) -> String {
    let iv: [u8; IV_LEN] = rand::thread_rng().gen();
    URL_SAFE.encode(seal_raw(key, plaintext, unix_now(), iv))
}

/// Verify and decrypt raw token bytes.
///
/// With `ttl` set, tokens older than `ttl` seconds, or stamped more than
/// `MAX_CLOCK_SKEW_SECS` in the future relative to `now`, are rejected.
pub fn open_raw(key: &FernetKey, token: &[u8], ttl: Option<u64>, now: u64) -> Result<Vec<u8>> {
    if token.len() < HEADER_LEN + BLOCK_LEN + TAG_LEN || token[0] != FERNET_VERSION {
        return Err(SimcryptError::InvalidToken);
    }

    let (signed, tag) = token.split_at(token.len() - TAG_LEN);
    let mut mac = mac_for(key);
    mac.update(signed);
    mac.verify_slice(tag)
        .map_err(|_| SimcryptError::InvalidToken)?;

    let timestamp = u64::from_be_bytes(
        signed[1..9]
            .try_into()
            .map_err(|_| SimcryptError::InvalidToken)?,
    );
    if let Some(ttl) = ttl {
        if timestamp.saturating_add(ttl) < now || now.saturating_add(MAX_CLOCK_SKEW_SECS) < timestamp {
            tracing::debug!(timestamp, now, ttl, "token outside its validity window");
            return Err(SimcryptError::InvalidToken);
        }
    }

    let iv = &signed[9..HEADER_LEN];
    let ciphertext = &signed[HEADER_LEN..];
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(SimcryptError::InvalidToken);
    }

    Aes128CbcDec::new_from_slices(key.encryption_key(), iv)
        .map_err(|_| SimcryptError::InvalidToken)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SimcryptError::InvalidToken)
}

/// Decode and open a Base64 Fernet token.
pub fn open(key: &FernetKey, token: &str, ttl: Option<u64>) -> Result<Vec<u8>> {
    let raw = URL_SAFE
        .decode(token.trim())
        .map_err(|_| SimcryptError::InvalidToken)?;
    open_raw(key, &raw, ttl, unix_now())
}
