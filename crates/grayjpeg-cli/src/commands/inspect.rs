use std::path::PathBuf;

use clap::Args;
use grayjpeg::JpegInfo;

use crate::CliResult;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// The jpeg image files to inspect
    #[arg(value_name = "jpeg files", required = true, num_args = 1..)]
    pub jpeg_files: Vec<PathBuf>,
}

impl InspectArgs {
    pub fn run(self) -> CliResult<()> {
        for file in &self.jpeg_files {
            let info = grayjpeg::commands::inspect_file(file)?;
            let name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            print!("{}", render(&name, &info));
        }
        Ok(())
    }
}

/// Markdown report of one file.
pub fn render(name: &str, info: &JpegInfo) -> String {
    let mut out = format!("# `{name}`\n\n");

    match info.frame {
        Some(frame) => out.push_str(&format!(
            "- Frame: {}x{}, {}-bit, component {} (sampling {}x{}, quantization table {})\n",
            frame.width,
            frame.height,
            frame.precision,
            frame.component.id,
            frame.component.h_sampling,
            frame.component.v_sampling,
            frame.component.quant_table_id
        )),
        None => out.push_str("- Frame: none\n"),
    }

    if info.restart_interval == 0 {
        out.push_str("- Restart interval: disabled\n");
    } else {
        out.push_str(&format!("- Restart interval: {} blocks\n", info.restart_interval));
    }

    for table in &info.huffman_tables {
        out.push_str(&format!(
            "- {} table {}: {} symbols\n",
            table.class.name(),
            table.id,
            table.values.len()
        ));
    }

    if let Some(scan) = info.scan {
        out.push_str(&format!(
            "- Scan: component {}, DC table {}, AC table {}, {} bytes\n",
            scan.component_id, scan.dc_table_id, scan.ac_table_id, info.scan_bytes
        ));
    }
    out.push('\n');

    for table in &info.quant_tables {
        out.push_str(&format!("## Quantization Table {}\n", table.id));
        out.push_str(&table.to_ascii_table());
        out.push('\n');
    }

    out
}
