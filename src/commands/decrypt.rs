/// Decrypt command: opens a token of either KDF profile.
use zeroize::Zeroizing;

use crate::cli::DecryptArgs;
use crate::util;

pub fn run_decrypt(args: DecryptArgs) -> anyhow::Result<()> {
    let token = util::read_input(args.token.as_deref())?;
    let password = util::resolve_password(args.password.password, false)?;

    let plaintext = Zeroizing::new(match args.ttl {
        Some(ttl) => simcrypt::crypto::decrypt_with_ttl(&password, &token, ttl)?,
        None => simcrypt::crypto::decrypt(&password, &token)?,
    });

    util::emit(&plaintext, args.output.copy);
    Ok(())
}
