use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::submitter::LaunchRecord;

/// File name of the per-run launch summary, written to the working directory.
pub const LAUNCH_SUMMARY_FILE: &str = "launch_summary.csv";

/// Writes one row per attempted launch. The summary is the only place a
/// failed spawn is visible after the run, since the submitter never waits on
/// or inspects the launched processes.
pub fn write_launch_summary(records: &[LaunchRecord], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
