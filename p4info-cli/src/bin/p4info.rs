// Copyright 2022 Oxide Computer Company

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".bright_red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opts = p4info_cli::Opts::parse();
    let log = p4info_cli::logger(opts.verbose);
    let pi = p4info_cli::process_file(&opts, &log)?;
    print!("{}", p4info_cli::render(&pi, &opts)?);
    Ok(())
}
