use clap::{Args, Parser, Subcommand};

use simcrypt::crypto::KdfProfile;

#[derive(Parser)]
#[command(name = "simcrypt", version, about = "X25519 key exchange, password encryption and Base64 from the terminal")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); SIMCRYPT_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a fresh X25519 public key for inspection only; the private half is discarded
    ///
    /// The private key is never saved, so this public key cannot be used for a
    /// later key agreement. Use `exchange` to run both steps in one session.
    Keygen(KeygenArgs),
    /// Generate a keypair and derive a shared key with a peer's public key
    Exchange(ExchangeArgs),
    /// Encrypt text with a password
    Encrypt(EncryptArgs),
    /// Decrypt a token with a password
    Decrypt(DecryptArgs),
    /// Print the legacy Fernet key derived from a password
    DeriveKey(PasswordArgs),
    /// Base64-encode text
    Encode(CodecArgs),
    /// Base64-decode text
    Decode(CodecArgs),
    /// Walk through the exchange, cipher and Base64 panels interactively
    Interactive(InteractiveArgs),
}

#[derive(Args)]
pub struct OutputArgs {
    /// Copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Args)]
pub struct KeygenArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct ExchangeArgs {
    /// Peer public key as 64 hex characters (prompted for if omitted)
    #[arg(value_name = "PEER_HEX")]
    pub peer: Option<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct PasswordArgs {
    /// Password (prompted for if omitted)
    #[arg(long, short = 'p', env = "SIMCRYPT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct EncryptArgs {
    /// Text to encrypt; reads stdin when omitted or `-`
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Key derivation for the new token
    #[arg(long, value_enum, env = "SIMCRYPT_KDF", default_value_t = KdfProfile::Hardened)]
    pub kdf: KdfProfile,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct DecryptArgs {
    /// Token to decrypt; reads stdin when omitted or `-`
    #[arg(value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(flatten)]
    pub password: PasswordArgs,

    /// Reject tokens older than this many seconds
    #[arg(long, value_name = "SECS")]
    pub ttl: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct CodecArgs {
    /// Input text; reads stdin when omitted or `-`
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct InteractiveArgs {
    /// Key derivation used by the cipher panel
    #[arg(long, value_enum, env = "SIMCRYPT_KDF", default_value_t = KdfProfile::Hardened)]
    pub kdf: KdfProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encrypt_defaults_to_hardened() {
        let cli = Cli::try_parse_from(["simcrypt", "encrypt", "hello", "-p", "pw"]).unwrap();
        match cli.command {
            Commands::Encrypt(args) => {
                assert_eq!(args.text.as_deref(), Some("hello"));
                assert_eq!(args.password.password.as_deref(), Some("pw"));
                assert_eq!(args.kdf, KdfProfile::Hardened);
            }
            _ => panic!("expected encrypt"),
        }
    }

    #[test]
    fn test_kdf_legacy_parses() {
        let cli = Cli::try_parse_from(["simcrypt", "encrypt", "--kdf", "legacy", "x"]).unwrap();
        assert!(matches!(cli.command, Commands::Encrypt(EncryptArgs { kdf: KdfProfile::Legacy, .. })));
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["simcrypt", "-vv", "keygen"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
