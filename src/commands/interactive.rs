/// Interactive command: terminal rendition of the three tool panels.
///
/// Each screen drives a `simcrypt::panel` state struct. Failures never print
/// an error here; the panel clears its output field and the empty result is shown.
use std::io::{self, IsTerminal};

use dialoguer::{Input, Password, Select};
use owo_colors::{OwoColorize, Stream::Stdout};
use simcrypt::panel::{CipherPanel, CodecPanel, ExchangePanel};

use crate::cli::InteractiveArgs;
use crate::util;

const SCREENS: &[&str] = &["Key exchange", "Encrypt / decrypt", "Base64", "Quit"];

pub fn run_interactive(args: InteractiveArgs) -> anyhow::Result<()> {
    if !io::stdin().is_terminal() {
        anyhow::bail!("interactive mode needs a terminal");
    }

    let mut exchange = ExchangePanel::new();
    let mut cipher = CipherPanel::new(args.kdf);
    let mut codec = CodecPanel::new();

    loop {
        let choice = select("simcrypt", SCREENS)?;
        match choice {
            0 => exchange_screen(&mut exchange)?,
            1 => cipher_screen(&mut cipher)?,
            2 => codec_screen(&mut codec)?,
            _ => return Ok(()),
        }
    }
}

fn select(prompt: &str, items: &[&str]) -> anyhow::Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| anyhow::anyhow!("prompt failed: {}", e))
}

fn input(prompt: &str, initial: &str) -> anyhow::Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("prompt failed: {}", e))
}

fn show(label: &str, value: &str) {
    println!(
        "{:<12} {}",
        label,
        value.if_supports_color(Stdout, |t| t.cyan())
    );
}

fn exchange_screen(panel: &mut ExchangePanel) -> anyhow::Result<()> {
    const ACTIONS: &[&str] = &[
        "Paste peer key",
        "Regenerate",
        "Copy public key",
        "Copy shared key",
        "Back",
    ];
    loop {
        println!();
        show("Public key", panel.public_hex());
        show("Peer key", panel.peer());
        show("Shared key", panel.shared_key());

        match select("Key exchange", ACTIONS)? {
            0 => {
                let peer = input("Peer public key", panel.peer())?;
                panel.set_peer(&peer);
            }
            1 => panel.regenerate(),
            2 => util::copy_with_notice(panel.public_hex()),
            3 => util::copy_with_notice(panel.shared_key()),
            _ => return Ok(()),
        }
    }
}

fn cipher_screen(panel: &mut CipherPanel) -> anyhow::Result<()> {
    const ACTIONS: &[&str] = &[
        "Set password",
        "Set text",
        "Encrypt",
        "Decrypt",
        "Copy result",
        "Back",
    ];
    loop {
        println!();
        show("Mode", &format!("{:?}", panel.mode()));
        show("Result", panel.output());

        match select("Encrypt / decrypt", ACTIONS)? {
            0 => {
                let password = zeroize::Zeroizing::new(
                    Password::new()
                        .with_prompt("Password")
                        .allow_empty_password(true)
                        .interact()
                        .map_err(|e| anyhow::anyhow!("prompt failed: {}", e))?,
                );
                panel.set_password(&password);
            }
            1 => {
                let text = input("Text or token", "")?;
                panel.set_input(&text);
            }
            2 => panel.encrypt(),
            3 => panel.decrypt(),
            4 => util::copy_with_notice(panel.output()),
            _ => return Ok(()),
        }
    }
}

fn codec_screen(panel: &mut CodecPanel) -> anyhow::Result<()> {
    const ACTIONS: &[&str] = &["Set text", "Encode", "Decode", "Copy result", "Back"];
    loop {
        println!();
        show("Mode", &format!("{:?}", panel.mode()));
        show("Result", panel.output());

        match select("Base64", ACTIONS)? {
            0 => {
                let text = input("Text", "")?;
                panel.set_input(&text);
            }
            1 => panel.encode(),
            2 => panel.decode(),
            3 => util::copy_with_notice(panel.output()),
            _ => return Ok(()),
        }
    }
}
