//! Shared helpers for the command layer: input, passwords, clipboard, logging.

use std::io::{self, IsTerminal, Read};

use anyhow::Context;
use zeroize::Zeroizing;

/// Resolve a text argument: the value itself, or stdin when absent or `-`.
///
/// Stdin is read as raw bytes; a single trailing newline is dropped.
pub fn read_input_bytes(arg: Option<&str>) -> anyhow::Result<Vec<u8>> {
    match arg {
        Some(text) if text != "-" => Ok(text.as_bytes().to_vec()),
        _ => {
            if io::stdin().is_terminal() {
                anyhow::bail!("No input given. Pass it as an argument or pipe it on stdin");
            }
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(strip_trailing_newline(buf))
        }
    }
}

/// Like `read_input_bytes`, but the input must be UTF-8 text.
pub fn read_input(arg: Option<&str>) -> anyhow::Result<String> {
    let bytes = read_input_bytes(arg)?;
    String::from_utf8(bytes).context("Input is not valid UTF-8 text")
}

fn strip_trailing_newline(mut buf: Vec<u8>) -> Vec<u8> {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    buf
}

/// Use the given password or prompt for one on the terminal.
pub fn resolve_password(given: Option<String>, confirm: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = given {
        return Ok(Zeroizing::new(password));
    }
    if !io::stdin().is_terminal() {
        anyhow::bail!("Use --password or SIMCRYPT_PASSWORD in non-interactive mode");
    }
    let prompt = dialoguer::Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords don't match")
    } else {
        prompt
    };
    let password = prompt
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Password prompt failed: {}", e))?;
    Ok(Zeroizing::new(password))
}

pub fn try_copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => clipboard.set_text(text).is_ok(),
        Err(_) => false,
    }
}

/// Print a result and optionally copy it to the clipboard.
pub fn emit(result: &str, copy: bool) {
    println!("{}", result);
    if copy {
        copy_with_notice(result);
    }
}

/// Copy to the clipboard, reporting the outcome on stderr.
pub fn copy_with_notice(text: &str) {
    if try_copy_to_clipboard(text) {
        eprintln!("Copied to clipboard.");
    } else {
        eprintln!("(Clipboard unavailable, copy the result manually)");
    }
}

/// Install the stderr log subscriber.
///
/// `SIMCRYPT_LOG` (then `RUST_LOG`) wins; otherwise verbosity picks the level.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SIMCRYPT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
