use itertools::Itertools;
use regex::Regex;
use std::error::Error;
use std::fs;
use std::path::Path;
use tap::Pipe;

/// Translates a shell glob into an anchored regular expression.
/// Only `*` is special and matches any run of characters, including none;
/// every other character matches literally.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, Box<dyn Error>> {
    let translated = pattern
        .split('*')
        .map(|literal| regex::escape(literal))
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", translated)
        .pipe(|src| Regex::new(&src))
        .map_err(|e| format!("Invalid glob pattern {}: {}", pattern, e).into())
}

/// Lists the plain files in `dir` whose names match the glob `pattern`.
/// The result is sorted lexicographically so a run always visits matches in
/// the same order.
pub fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let re = glob_to_regex(pattern)?;
    let mut matches: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if re.is_match(&name) {
            matches.push(name);
        }
    }
    Ok(matches.into_iter().sorted().collect())
}
