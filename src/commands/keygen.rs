/// Keygen command: prints a fresh X25519 public key.
use owo_colors::{OwoColorize, Stream::Stderr};
use serde::Serialize;

use crate::cli::KeygenArgs;
use crate::util;

#[derive(Serialize)]
struct KeygenOutput<'a> {
    public_key: &'a str,
}

/// Generate a keypair and print its public half.
///
/// The private scalar is never written anywhere; it is dropped (and zeroed)
/// when this function returns. Use `exchange` to keep it for a derivation.
pub fn run_keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let (_keypair, public_hex) = simcrypt::crypto::generate_keypair();

    if args.json {
        println!("{}", serde_json::to_string(&KeygenOutput { public_key: &public_hex })?);
    } else {
        eprintln!(
            "{}",
            "Public key (inspection only, private half discarded):".if_supports_color(Stderr, |t| t.dimmed())
        );
        util::emit(&public_hex, false);
    }
    if args.output.copy {
        util::copy_with_notice(&public_hex);
    }
    Ok(())
}
