pub mod report;
pub mod telemetry;
pub mod tree;

use anyhow::Result;
use std::io::Write;

/// Write a payload to stdout
pub(crate) fn emit(payload: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(payload.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
