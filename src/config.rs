//! # config.rs
//!
//! This module defines the configuration structures for a submission run.
//! It includes:
//! - `InputConfig`: Parses command-line arguments.
//! - `SubmissionProfile`: The fixed submission template (command, flags,
//!   glob pattern, manifest list), loaded from TOML.
//! - `Credentials`: Archive account values captured from the environment.
//! - `SubmitConfig`: The validated configuration handed to the submitter.
//!
//! A built-in profile is embedded from a TOML file; a user profile given on
//! the command line layers on top of it, so a profile file only needs the
//! keys it wants to change.

use clap::Parser;
use config::Config;
use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration parsed from CLI input arguments for a submission run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vtcmd-batch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch driver for the NIMH Data Archive validation/upload tool. Expands a per-prefix glob over sample CSV files and launches one background validation command per match, logging each invocation to its own file."
)]
pub struct InputConfig {
    /// Directory holding the sample and manifest CSV files. Log files and
    /// the launch summary are written here as well.
    #[arg(short, long, required = true)]
    pub workdir: String,
    /// Batch prefix to submit; repeat the flag for several batches.
    /// When absent, the profile's prefix list is used.
    #[arg(short = 'P', long = "prefix")]
    pub prefixes: Vec<String>,
    /// TOML profile overriding the built-in submission defaults.
    #[arg(long = "profile", required = false)]
    pub profile: Option<String>,
}

/// Environment variable holding the archive account name.
pub const USERNAME_VAR: &str = "NDA_USERNAME";
/// Environment variable holding the archive account password.
pub const PASSWORD_VAR: &str = "NDA_PASSWORD";

/// The built-in submission profile shipped with the binary.
pub const DEFAULT_PROFILE_STR: &str = include_str!("../data/submission_profile.toml");

/// Fixed submission template, reused unchanged across every invocation
/// within a run.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionProfile {
    /// Name of the external validation/upload executable.
    pub command: String,
    pub title: String,
    pub description: String,
    /// Scratch storage identifier passed through to the tool.
    pub scratch: String,
    /// Numeric archive collection id.
    pub collection: u32,
    /// Glob pattern template; `{prefix}` is substituted textually.
    pub pattern: String,
    /// Supporting manifest files appended to every invocation.
    pub manifests: Vec<String>,
    /// Default batch prefixes, used when none are given on the command line.
    pub prefixes: Vec<String>,
}

impl SubmissionProfile {
    ///
    /// Loads the submission profile: the embedded defaults, with an optional
    /// user TOML file layered on top.
    ///
    /// # Errors
    /// Returns an error if the user profile cannot be read or either source
    /// does not deserialize into a full profile.
    pub fn load(user_profile: Option<&str>) -> Result<SubmissionProfile, Box<dyn Error>> {
        let mut builder = Config::builder().add_source(config::File::from_str(
            DEFAULT_PROFILE_STR,
            config::FileFormat::Toml,
        ));
        if let Some(path) = user_profile {
            builder = builder.add_source(config::File::new(path, config::FileFormat::Toml));
        }
        let profile = builder.build()?.try_deserialize::<SubmissionProfile>()?;
        Ok(profile)
    }

    /// Substitutes a prefix into the glob pattern template.
    pub fn pattern_for(&self, prefix: &str) -> String {
        self.pattern.replace("{prefix}", prefix)
    }
}

/// Account values passed through to the external tool. Captured once at
/// startup; unset variables become empty values and are left for the tool
/// itself to reject.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// keeps the password out of dbg! output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Credentials {
            username: env::var(USERNAME_VAR).unwrap_or_default(),
            password: env::var(PASSWORD_VAR).unwrap_or_default(),
        }
    }
}

/// Validated configuration for a whole submission run.
#[derive(Debug)]
pub struct SubmitConfig {
    pub workdir: PathBuf,
    pub prefixes: Vec<String>,
    pub profile: SubmissionProfile,
    pub credentials: Credentials,
}

impl SubmitConfig {
    ///
    /// Parses command-line arguments into a validated `SubmitConfig`.
    ///
    /// # Errors
    /// Returns an error if the arguments are malformed, the profile does not
    /// load, or the working directory is missing.
    pub fn build() -> Result<SubmitConfig, Box<dyn Error>> {
        let input_config = InputConfig::parse();
        SubmitConfig::from_input(input_config)
    }

    pub fn from_input(input_config: InputConfig) -> Result<SubmitConfig, Box<dyn Error>> {
        let profile = SubmissionProfile::load(input_config.profile.as_deref())?;

        let workdir = PathBuf::from(&input_config.workdir);
        if Path::new(&workdir).is_dir() == false {
            return Err(format!(
                "Working directory {} does not exist or is not a directory",
                input_config.workdir
            )
            .into());
        }

        let prefixes = if input_config.prefixes.is_empty() {
            profile.prefixes.clone()
        } else {
            input_config.prefixes
        };
        if prefixes.is_empty() {
            return Err("No prefixes given on the command line or in the profile".into());
        }

        Ok(SubmitConfig {
            workdir,
            prefixes,
            profile,
            credentials: Credentials::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = SubmissionProfile::load(None).unwrap();
        assert_eq!(profile.command, "vtcmd");
        assert_eq!(profile.collection, 2965);
        assert_eq!(
            profile.manifests,
            vec![
                "nichd_btb02-2021-02-02.csv".to_string(),
                "genomics_subject02-2021-02-02.csv".to_string()
            ]
        );
        assert_eq!(profile.prefixes, vec!["3340241".to_string()]);
        assert_eq!(
            profile.pattern_for("3340241"),
            "genomics_sample03-3340241*.csv"
        );
    }

    #[test]
    fn test_profile_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = dir.path().join("profile.toml");
        std::fs::write(&overlay, "command = \"echo\"\ncollection = 1234\n").unwrap();

        let profile = SubmissionProfile::load(overlay.to_str()).unwrap();
        assert_eq!(profile.command, "echo");
        assert_eq!(profile.collection, 1234);
        // keys absent from the overlay keep their built-in values
        assert_eq!(profile.manifests.len(), 2);
        assert_eq!(profile.prefixes, vec!["3340241".to_string()]);
    }

    #[test]
    fn test_args() {
        let invalid_response_missing_workdir =
            InputConfig::try_parse_from(["vtcmd-batch", "--prefix", "3340241"]);

        assert!(
            invalid_response_missing_workdir.is_err(),
            "Expected an error, but parsing succeeded"
        );

        let valid_long_args = InputConfig::try_parse_from([
            "vtcmd-batch",
            "--workdir",
            "./nda",
            "--prefix",
            "3340241",
            "--prefix",
            "3340242",
        ]);

        assert!(
            valid_long_args.is_ok(),
            "Expected success, but parsing failed with error"
        );
        assert_eq!(
            valid_long_args.unwrap().prefixes,
            vec!["3340241".to_string(), "3340242".to_string()]
        );

        let valid_short_args =
            InputConfig::try_parse_from(["vtcmd-batch", "-w", "./nda", "-P", "3340241"]);

        assert!(
            valid_short_args.is_ok(),
            "Expected success, but parsing failed with error"
        );
    }

    #[test]
    fn test_from_input() {
        let dir = tempfile::tempdir().unwrap();
        let input_config = InputConfig {
            workdir: dir.path().to_string_lossy().to_string(),
            prefixes: vec![],
            profile: None,
        };
        let config = SubmitConfig::from_input(input_config).unwrap();
        // no CLI prefixes, so the profile's list applies
        assert_eq!(config.prefixes, vec!["3340241".to_string()]);

        let missing_workdir = InputConfig {
            workdir: dir.path().join("nope").to_string_lossy().to_string(),
            prefixes: vec!["3340241".to_string()],
            profile: None,
        };
        assert!(SubmitConfig::from_input(missing_workdir).is_err());
    }

    #[test]
    fn test_credentials_from_env() {
        unsafe {
            env::set_var(USERNAME_VAR, "alice");
            env::set_var(PASSWORD_VAR, "hunter2");
        }
        let credentials = Credentials::from_env();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "hunter2");

        unsafe {
            env::remove_var(USERNAME_VAR);
            env::remove_var(PASSWORD_VAR);
        }
        let credentials = Credentials::from_env();
        assert_eq!(credentials.username, "");
        assert_eq!(credentials.password, "");
    }
}
