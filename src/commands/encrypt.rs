/// Encrypt command: password-keyed token from text.
use serde::Serialize;

use simcrypt::crypto::KdfProfile;

use crate::cli::EncryptArgs;
use crate::util;

#[derive(Serialize)]
struct EncryptOutput<'a> {
    kdf: KdfProfile,
    token: &'a str,
}

pub fn run_encrypt(args: EncryptArgs) -> anyhow::Result<()> {
    let plaintext = util::read_input_bytes(args.text.as_deref())?;
    let password = util::resolve_password(args.password.password, true)?;

    if args.kdf == KdfProfile::Legacy {
        tracing::warn!("legacy KDF: unsalted PBKDF2 with 10 rounds, weak against brute force");
    }
    let token = simcrypt::crypto::encrypt_bytes(args.kdf, &password, &plaintext)?;

    if args.json {
        let output = EncryptOutput { kdf: args.kdf, token: &token };
        println!("{}", serde_json::to_string(&output)?);
        if args.output.copy {
            util::copy_with_notice(&token);
        }
    } else {
        util::emit(&token, args.output.copy);
    }
    Ok(())
}
