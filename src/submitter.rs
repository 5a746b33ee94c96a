//! Expands the per-prefix glob and launches one background invocation of the
//! validation/upload tool per matched sample file. Launches are fire and
//! forget: each child gets its own log file for stdout and stderr, the child
//! handle is dropped without waiting, and the children keep running after the
//! submitter itself has finished.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::process::{Command, Stdio};

use crate::config::{Credentials, SubmissionProfile, SubmitConfig};
use crate::file_match::matching_files;

/// Outcome of one spawn attempt; one row in the launch summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub prefix: String,
    pub sample_file: String,
    pub log_file: String,
    pub pid: Option<u32>,
    pub status: String,
}

impl LaunchRecord {
    pub fn launched(&self) -> bool {
        self.pid.is_some()
    }
}

/// Full argument vector for one invocation: the fixed flag set, then
/// `-pre <prefix>`, then the sample file and the manifest list.
pub fn submission_args(
    profile: &SubmissionProfile,
    credentials: &Credentials,
    prefix: &str,
    sample_file: &str,
) -> Vec<String> {
    let mut args = vec![
        "-b".to_string(),
        "-t".to_string(),
        profile.title.clone(),
        "-d".to_string(),
        profile.description.clone(),
        "-s".to_string(),
        profile.scratch.clone(),
        "-u".to_string(),
        credentials.username.clone(),
        "-p".to_string(),
        credentials.password.clone(),
        "-c".to_string(),
        profile.collection.to_string(),
        "--submit".to_string(),
        "-pre".to_string(),
        prefix.to_string(),
        sample_file.to_string(),
    ];
    args.extend(profile.manifests.iter().cloned());
    args
}

/// Log file receiving the combined stdout and stderr of one invocation.
pub fn log_file_name(prefix: &str, sample_file: &str) -> String {
    format!("{}-{}.log", prefix, sample_file)
}

///
/// Runs the whole batch: for each prefix in order, expand the glob and launch
/// one invocation per matched file, printing the delimiter lines around each
/// file name. Returns one record per attempted launch.
///
/// A sample file that fails to spawn is reported and recorded; the batch
/// continues with the remaining files.
///
/// # Errors
/// Returns an error if the working directory cannot be listed or a log file
/// cannot be created.
pub fn submit_all(config: &SubmitConfig) -> Result<Vec<LaunchRecord>, Box<dyn Error>> {
    let mut records: Vec<LaunchRecord> = Vec::new();
    for prefix in &config.prefixes {
        let pattern = config.profile.pattern_for(prefix);
        let sample_files = matching_files(&config.workdir, &pattern)?;
        for sample_file in sample_files {
            println!("====");
            println!("{}", sample_file);
            records.push(launch_one(config, prefix, &sample_file)?);
            println!("----");
        }
    }
    Ok(records)
}

fn launch_one(
    config: &SubmitConfig,
    prefix: &str,
    sample_file: &str,
) -> Result<LaunchRecord, Box<dyn Error>> {
    let log_file = log_file_name(prefix, sample_file);
    // truncates a leftover log from an earlier run
    let log = File::create(config.workdir.join(&log_file))?;

    let args = submission_args(&config.profile, &config.credentials, prefix, sample_file);
    let spawned = Command::new(&config.profile.command)
        .args(&args)
        .current_dir(&config.workdir)
        .stdout(Stdio::from(log.try_clone()?))
        .stderr(Stdio::from(log))
        .spawn();

    let record = match spawned {
        // the child handle is dropped without wait(); the process runs on
        Ok(child) => LaunchRecord {
            prefix: prefix.to_string(),
            sample_file: sample_file.to_string(),
            log_file,
            pid: Some(child.id()),
            status: "launched".to_string(),
        },
        Err(e) => {
            eprintln!(
                "⚠️ Could not launch {} for {}: {}",
                config.profile.command,
                sample_file,
                e.to_string().red()
            );
            LaunchRecord {
                prefix: prefix.to_string(),
                sample_file: sample_file.to_string(),
                log_file,
                pid: None,
                status: format!("launch failed: {}", e),
            }
        }
    };
    Ok(record)
}
