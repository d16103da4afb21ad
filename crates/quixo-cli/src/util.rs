use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use serde::Serialize;

/// Writes `report` as pretty JSON to `output`, or to stdout when no path is given.
pub(crate) fn save_report<T>(report: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            write_report(BufWriter::new(file), report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report saved to {}", path.display());
        }
        None => write_report(io::stdout().lock(), report).context("Failed to write report")?,
    }
    Ok(())
}

fn write_report<W, T>(mut writer: W, report: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn win_rate(wins: usize, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        100.0 * wins as f64 / games as f64
    }
}
