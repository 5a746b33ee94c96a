use colored::Colorize;
use std::error::Error;

pub mod config;
pub mod file_match;
pub mod report;
pub mod submitter;

use crate::config::SubmitConfig;

/// Runs one submission batch: expand the per-prefix globs, launch one
/// background invocation per matched sample file, write the launch summary.
/// Returns once every launch has been issued; the launched processes are
/// never waited on and may still be running when the program exits.
pub fn run(config: SubmitConfig) -> Result<(), Box<dyn Error>> {
    let records = submitter::submit_all(&config)?;

    let summary_path = config.workdir.join(report::LAUNCH_SUMMARY_FILE);
    report::write_launch_summary(&records, &summary_path)?;

    let launched = records.iter().filter(|r| r.launched()).count();
    let failed = records.len() - launched;
    if failed > 0 {
        eprintln!(
            "⚠️ {} launch(es) failed, see {}",
            failed.to_string().red().bold(),
            summary_path.display()
        );
    }
    println!(
        "✅ {} submission(s) launched, summary in {}",
        launched,
        summary_path.display()
    );

    Ok(())
}
