/// Derive-key command: shows the legacy Fernet key for a password.
use crate::cli::PasswordArgs;

/// Print the URL-safe Base64 key the legacy profile encrypts with.
///
/// Tokens made with `--kdf hardened` use a salted key that cannot be shown
/// without the token, so only the legacy key is available here.
pub fn run_derive_key(args: PasswordArgs) -> anyhow::Result<()> {
    let password = crate::util::resolve_password(args.password, false)?;
    let key = simcrypt::crypto::derive_key(&password);
    println!("{}", key.to_base64());
    Ok(())
}
