//! Report persistence.

use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::report::FloorTestReport;
use super::types::ExportFormat;

/// Output path meaning standard output.
pub const STDOUT_PATH: &str = "-";

/// Writer that ignores broken pipe errors (e.g., when piping to `head`).
pub(crate) struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

/// Writes `report` to `output` (a file path, or `-` for stdout).
///
/// `Json` writes the whole report as one pretty-printed document; `Jsonl`
/// writes one verified hop per line. Returns the number of hop records written.
pub async fn write_report(
    report: &FloorTestReport,
    output: &Path,
    format: ExportFormat,
) -> Result<usize> {
    let writer: Box<dyn Write> = if output == Path::new(STDOUT_PATH) {
        Box::new(IgnoreBrokenPipe::new(io::stdout()))
    } else {
        let file = tokio::fs::File::create(output)
            .await
            .context(format!("Failed to create output file: {}", output.display()))?
            .into_std()
            .await;
        Box::new(file)
    };
    let mut writer = BufWriter::new(writer);
    write_to(&mut writer, report, format)?;
    writer.flush().context("Failed to flush report")?;
    Ok(report.hops.len())
}

/// Serializes `report` in `format` into any writer.
pub fn write_to<W: Write>(writer: &mut W, report: &FloorTestReport, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)
                .context("Failed to serialize report")?;
            writeln!(writer)?;
        }
        ExportFormat::Jsonl => {
            for hop in &report.hops {
                serde_json::to_writer(&mut *writer, hop).context("Failed to serialize hop")?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}
