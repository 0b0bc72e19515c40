// logmask/src/commands/mask.rs
//! The `mask` command: streams input through a `MaskingWriter`.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use logmask_core::{MaskingLayoutHost, MaskingWriter};

use crate::cli::MaskCommand;
use crate::commands::configure;

/// Masks the selected input into the selected output.
pub fn run_mask(cmd: &MaskCommand, host: &dyn MaskingLayoutHost) -> Result<()> {
    configure(host, &cmd.rules)?;

    let mut input: Box<dyn Read> = match &cmd.input_file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &cmd.output {
        Some(path) => {
            info!("Writing masked content to file: {}", path.display());
            Box::new(BufWriter::new(
                File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?,
            ))
        }
        None => Box::new(io::stdout().lock()),
    };

    let engine = host.masking_layout().engine().clone();
    let mut writer = MaskingWriter::new(output, engine);
    let copied = io::copy(&mut input, &mut writer).context("Failed to mask input")?;
    writer
        .into_inner()
        .and_then(|mut out| out.flush())
        .context("Failed to write masked output")?;

    info!("Masked {} byte(s) of input.", copied);
    Ok(())
}
