//! X25519 key agreement with an HKDF-SHA256 expansion step.
//!
//! Public keys and derived secrets travel as lowercase hex. The private scalar
//! never leaves the `Keypair` and is zeroed on drop by x25519-dalek.

use hkdf::Hkdf;
use rand::rngs::OsRng;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{Result, SimcryptError};

/// Byte length of an X25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Byte length of the derived shared key.
pub const SHARED_KEY_LEN: usize = 32;

/// HKDF info label binding the expansion to this key exchange.
const EXCHANGE_HKDF_INFO: &[u8] = b"exchange";

/// An X25519 static secret and its public key.
///
/// Static rather than ephemeral so the same private half can be re-used each
/// time the peer value changes.
pub struct Keypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl Keypair {
    /// Fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self::from_secret(StaticSecret::random_from_rng(OsRng))
    }

    /// Build a keypair from raw secret scalar bytes (clamping is applied by X25519).
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from(bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.public.to_bytes()
    }

    /// Public key as 64 lowercase hex characters.
    pub fn public_hex(&self) -> String {
        hex::encode(self.public.as_bytes())
    }

    /// X25519 with `peer` followed by HKDF-SHA256 expansion to 32 bytes.
    ///
    /// Rejects peers that force a non-contributory (all-zero) result.
    pub fn agree(&self, peer: &PublicKey) -> Result<Zeroizing<[u8; SHARED_KEY_LEN]>> {
        let shared = self.secret.diffie_hellman(peer);
        if !shared.was_contributory() {
            return Err(SimcryptError::InvalidPeerKey(
                "peer key is a low-order point".to_string(),
            ));
        }

        // Empty salt: HKDF substitutes HashLen zero bytes, same as an absent salt.
        let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());
        let mut okm = Zeroizing::new([0u8; SHARED_KEY_LEN]);
        hkdf.expand(EXCHANGE_HKDF_INFO, okm.as_mut())
            .map_err(|e| SimcryptError::InvalidPeerKey(format!("hkdf expand error: {}", e)))?;
        Ok(okm)
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &self.public_hex())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Generate a keypair and return it together with its hex-encoded public key.
pub fn generate_keypair() -> (Keypair, String) {
    let keypair = Keypair::generate();
    let public_hex = keypair.public_hex();
    tracing::debug!(public = %public_hex, "generated x25519 keypair");
    (keypair, public_hex)
}

/// Parse a hex-encoded X25519 public key.
///
/// ASCII whitespace anywhere is ignored, so both padded input and `"aa bb .."`
/// byte groups parse.
pub fn parse_public_hex(peer_public_hex: &str) -> Result<PublicKey> {
    let compact: String = peer_public_hex
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = hex::decode(compact)
        .map_err(|e| SimcryptError::InvalidPeerKey(format!("not valid hex: {}", e)))?;
    let bytes: [u8; PUBLIC_KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
        SimcryptError::InvalidPeerKey(format!(
            "expected {} bytes, got {}",
            PUBLIC_KEY_LEN,
            bytes.len()
        ))
    })?;
    Ok(PublicKey::from(bytes))
}

/// Derive the shared key with a peer's hex public key and return it hex-encoded.
pub fn derive_shared_secret(private: &Keypair, peer_public_hex: &str) -> Result<String> {
    let peer = parse_public_hex(peer_public_hex)?;
    let key = private.agree(&peer)?;
    tracing::debug!("derived shared key from peer public key");
    Ok(hex::encode(&key[..]))
}
