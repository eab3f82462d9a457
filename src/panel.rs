//! Toolkit-independent state for the three tool panels.
//!
//! Each panel owns its inputs, the last explicit action, and an output field.
//! Actions are the only thing that changes the mode; `render` re-runs the last
//! action against the current inputs. Every failure clears the output and is
//! otherwise swallowed.

use crate::codec;
use crate::crypto::{self, KdfProfile, Keypair};

/// Last explicit action on the cipher panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    None,
    Encrypted,
    Decrypted,
}

/// Last explicit action on the codec panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodecMode {
    #[default]
    None,
    Encoded,
    Decoded,
}

/// Key exchange panel: own keypair, peer public key, derived shared key.
pub struct ExchangePanel {
    keypair: Keypair,
    public_hex: String,
    peer: String,
    shared_key: String,
}

impl Default for ExchangePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangePanel {
    /// Starts with a freshly generated keypair.
    pub fn new() -> Self {
        let (keypair, public_hex) = crypto::generate_keypair();
        Self {
            keypair,
            public_hex,
            peer: String::new(),
            shared_key: String::new(),
        }
    }

    /// Replace the keypair and recompute against the current peer value.
    pub fn regenerate(&mut self) {
        let (keypair, public_hex) = crypto::generate_keypair();
        self.keypair = keypair;
        self.public_hex = public_hex;
        self.render();
    }

    pub fn set_peer(&mut self, peer: &str) {
        self.peer = peer.to_string();
        self.render();
    }

    /// An empty peer leaves the previous key in place; an invalid peer clears it.
    pub fn render(&mut self) {
        if self.peer.is_empty() {
            return;
        }
        self.shared_key = crypto::derive_shared_secret(&self.keypair, &self.peer).unwrap_or_default();
    }

    pub fn public_hex(&self) -> &str {
        &self.public_hex
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn shared_key(&self) -> &str {
        &self.shared_key
    }
}

/// Password encryption panel.
#[derive(Default)]
pub struct CipherPanel {
    profile: KdfProfile,
    password: String,
    input: String,
    output: String,
    mode: Mode,
}

impl CipherPanel {
    pub fn new(profile: KdfProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
        self.render();
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.render();
    }

    pub fn encrypt(&mut self) {
        self.run(Mode::Encrypted);
    }

    pub fn decrypt(&mut self) {
        self.run(Mode::Decrypted);
    }

    /// Re-run the last successful action, if any.
    pub fn render(&mut self) {
        if self.mode != Mode::None {
            self.run(self.mode);
        }
    }

    fn run(&mut self, action: Mode) {
        if self.input.is_empty() {
            return;
        }
        let result = match action {
            Mode::Encrypted => crypto::encrypt_with(self.profile, &self.password, &self.input),
            Mode::Decrypted => crypto::decrypt(&self.password, &self.input),
            Mode::None => return,
        };
        match result {
            Ok(output) => {
                self.output = output;
                self.mode = action;
            }
            Err(e) => {
                tracing::debug!(error = %e, ?action, "cipher panel action failed");
                self.output.clear();
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Base64 panel.
#[derive(Debug, Default)]
pub struct CodecPanel {
    input: String,
    output: String,
    mode: CodecMode,
}

impl CodecPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.render();
    }

    pub fn encode(&mut self) {
        self.run(CodecMode::Encoded);
    }

    pub fn decode(&mut self) {
        self.run(CodecMode::Decoded);
    }

    pub fn render(&mut self) {
        if self.mode != CodecMode::None {
            self.run(self.mode);
        }
    }

    fn run(&mut self, action: CodecMode) {
        match action {
            CodecMode::Encoded => {
                self.output = codec::encode(&self.input);
                self.mode = action;
            }
            CodecMode::Decoded => {
                if self.input.is_empty() {
                    return;
                }
                match codec::decode(&self.input) {
                    Ok(text) => {
                        self.output = text;
                        self.mode = action;
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "codec panel decode failed");
                        self.output.clear();
                    }
                }
            }
            CodecMode::None => {}
        }
    }

    pub fn mode(&self) -> CodecMode {
        self.mode
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}
