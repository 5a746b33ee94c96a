use colored::Colorize;
use std::process;

use vtcmd_batch::config::SubmitConfig;

fn main() {
    println!(
        "{} {}",
        "vtcmd-batch for submitting genomics sample batches to the NIMH Data Archive.\n Version:"
            .cyan()
            .bold(),
        env!("CARGO_PKG_VERSION").cyan().bold()
    );
    let config = SubmitConfig::build().unwrap_or_else(|err| {
        eprintln!(
            "Problem parsing arguments: {}",
            err.to_string().red().bold()
        );
        process::exit(1);
    });
    #[cfg(debug_assertions)]
    dbg!(&config);
    if let Err(e) = vtcmd_batch::run(config) {
        eprintln!("Application error: {}", e.to_string().red().bold());
        process::exit(1);
    }
}
