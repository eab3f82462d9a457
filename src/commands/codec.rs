/// Encode/decode commands: Base64 text codec.
use crate::cli::CodecArgs;
use crate::util;

pub fn run_encode(args: CodecArgs) -> anyhow::Result<()> {
    let text = util::read_input(args.text.as_deref())?;
    util::emit(&simcrypt::codec::encode(&text), args.output.copy);
    Ok(())
}

pub fn run_decode(args: CodecArgs) -> anyhow::Result<()> {
    let text = util::read_input(args.text.as_deref())?;
    let decoded = simcrypt::codec::decode(&text)?;
    util::emit(&decoded, args.output.copy);
    Ok(())
}
