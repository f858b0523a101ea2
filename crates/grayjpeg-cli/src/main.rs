use clap::Parser;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = grayjpeg::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::debug!("{:?}", args);

    match args.command {
        Commands::Decode(args) => args.run(),
        Commands::Inspect(args) => args.run(),
    }
}
