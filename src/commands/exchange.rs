/// Exchange command: one side of an X25519 key agreement.
use std::io::{self, IsTerminal};

use anyhow::Context;
use owo_colors::{OwoColorize, Stream::Stderr, Stream::Stdout};
use serde::Serialize;

use crate::cli::ExchangeArgs;
use crate::util;

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    public_key: &'a str,
    shared_key: &'a str,
}

/// Generate a keypair, obtain the peer's public key, derive the shared key.
///
/// Without a PEER_HEX argument the own public key is shown first so it can be
/// handed to the peer, then the peer key is prompted for (or read from stdin).
pub fn run_exchange(args: ExchangeArgs) -> anyhow::Result<()> {
    let (keypair, public_hex) = simcrypt::crypto::generate_keypair();

    if !args.json {
        println!(
            "Public Key:  {}",
            public_hex.if_supports_color(Stdout, |t| t.cyan())
        );
    } else if args.peer.is_none() {
        // stdout carries only the final JSON object; the peer still needs this key now.
        eprintln!("Public Key:  {}", public_hex);
    }

    let peer = match args.peer {
        Some(peer) => peer,
        None => read_peer().context("Failed to read peer public key")?,
    };

    let shared_hex = simcrypt::crypto::derive_shared_secret(&keypair, &peer)?;

    if args.json {
        let output = ExchangeOutput {
            public_key: &public_hex,
            shared_key: &shared_hex,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Shared Key:  {}",
            shared_hex.if_supports_color(Stdout, |t| t.green())
        );
    }

    if args.output.copy {
        util::copy_with_notice(&shared_hex);
    }
    Ok(())
}

fn read_peer() -> anyhow::Result<String> {
    if io::stdin().is_terminal() {
        eprintln!(
            "{}",
            "Give the public key above to your peer and paste theirs below."
                .if_supports_color(Stderr, |t| t.dimmed())
        );
        return dialoguer::Input::<String>::new()
            .with_prompt("Peer public key")
            .interact_text()
            .map_err(|e| anyhow::anyhow!("prompt failed: {}", e));
    }
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    if line.trim().is_empty() {
        anyhow::bail!("No peer public key received from stdin");
    }
    Ok(line)
}
