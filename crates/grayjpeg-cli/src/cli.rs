use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decodes a baseline grayscale JPEG into a binary PGM (P5) file
    Decode(decode::DecodeArgs),
    /// Shows frame geometry and quantization tables of JPEG files
    Inspect(inspect::InspectArgs),
}
