mod cli;
mod commands;
mod util;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    util::init_logging(cli.verbose);

    match cli.command {
        Commands::Keygen(args) => commands::keygen::run_keygen(args)?,
        Commands::Exchange(args) => commands::exchange::run_exchange(args)?,
        Commands::Encrypt(args) => commands::encrypt::run_encrypt(args)?,
        Commands::Decrypt(args) => commands::decrypt::run_decrypt(args)?,
        Commands::DeriveKey(args) => commands::derive_key::run_derive_key(args)?,
        Commands::Encode(args) => commands::codec::run_encode(args)?,
        Commands::Decode(args) => commands::codec::run_decode(args)?,
        Commands::Interactive(args) => commands::interactive::run_interactive(args)?,
    }

    Ok(())
}
