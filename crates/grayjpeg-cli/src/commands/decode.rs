use std::path::PathBuf;

use clap::Args;
use grayjpeg::{DecodeOptions, TransformMode};

use crate::CliResult;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Baseline grayscale JPEG file, used readonly
    #[arg(short = 'i', long = "in", value_name = "jpeg file", required = true)]
    pub input: PathBuf,

    /// Decoded image will be stored as binary PGM file
    #[arg(short = 'o', long = "out", value_name = "pgm file", required = true)]
    pub output: PathBuf,

    /// Reproduce the output of the old lab decoder (7x7 frequencies, rounding up)
    #[arg(long)]
    pub legacy_idct: bool,
}

impl DecodeArgs {
    pub fn options(&self) -> DecodeOptions {
        let transform = if self.legacy_idct {
            TransformMode::Legacy
        } else {
            TransformMode::Standard
        };
        DecodeOptions::default().with_transform(transform)
    }

    pub fn run(self) -> CliResult<()> {
        let image = grayjpeg::commands::decode_to_pgm(&self.input, &self.output, self.options())?;
        log::info!(
            "{} → {} ({}x{})",
            self.input.display(),
            self.output.display(),
            image.width(),
            image.height()
        );
        Ok(())
    }
}
