// Copyright 2022 Oxide Computer Company

use std::env;
use std::fmt::Write;
use std::fs;

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use p4info::ProgramInfo;
use p4info_bmv2::{Settings, DEFAULT_NAME_CAPACITY};
use slog::{Drain, Logger};

#[derive(Parser)]
#[command(version = "0.1")]
pub struct Opts {
    /// Print the whole program information model as JSON.
    #[arg(long)]
    pub json: bool,

    /// List actions and their parameters.
    #[arg(long)]
    pub show_actions: bool,

    /// List the flattened header fields.
    #[arg(long)]
    pub show_fields: bool,

    /// List tables with their match keys and actions.
    #[arg(long)]
    pub show_tables: bool,

    /// Capacity in bytes of composed field names.
    #[arg(long, default_value_t = DEFAULT_NAME_CAPACITY)]
    pub name_capacity: usize,

    /// Log more, may be repeated. Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// bmv2 JSON file to read.
    pub filename: String,
}

/// Build a terminal logger filtered by RUST_LOG, which defaults to a level
/// derived from `verbose`.
pub fn logger(verbose: u8) -> Logger {
    if env::var("RUST_LOG").is_err() {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        env::set_var("RUST_LOG", level);
    }

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, slog::o!())
}

pub fn process_file(opts: &Opts, log: &Logger) -> Result<ProgramInfo> {
    let contents = fs::read_to_string(&opts.filename)
        .map_err(|e| anyhow!("read input: {}: {}", opts.filename, e))?;

    let settings = Settings {
        name_capacity: opts.name_capacity,
    };
    p4info_bmv2::read_with_settings(&contents, &settings, log)
        .map_err(|e| anyhow!("{}: {}", opts.filename, e))
}

/// Render the model the way `opts` asks for.
pub fn render(pi: &ProgramInfo, opts: &Opts) -> Result<String> {
    if opts.json {
        return Ok(serde_json::to_string_pretty(pi)?);
    }

    let mut out = summary(pi);
    if opts.show_actions {
        out.push_str(&show_actions(pi));
    }
    if opts.show_fields {
        out.push_str(&show_fields(pi));
    }
    if opts.show_tables {
        out.push_str(&show_tables(pi));
    }
    Ok(out)
}

pub fn summary(pi: &ProgramInfo) -> String {
    format!(
        "{} {}\n{} {}\n{} {}\n",
        "actions".bright_blue(),
        pi.num_actions(),
        "fields".bright_blue(),
        pi.num_fields(),
        "tables".bright_blue(),
        pi.num_tables(),
    )
}

pub fn show_actions(pi: &ProgramInfo) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{}", "actions".bright_white());
    for a in pi.actions() {
        let _ = writeln!(s, "  {} {}", a.id.to_string().dimmed(), a.name.green());
        for p in &a.params {
            let _ = writeln!(
                s,
                "    {} {}: bit<{}>",
                p.id.to_string().dimmed(),
                p.name,
                p.bitwidth,
            );
        }
    }
    s
}

pub fn show_fields(pi: &ProgramInfo) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{}", "fields".bright_white());
    for f in pi.fields() {
        let _ = writeln!(
            s,
            "  {} {}: bit<{}>",
            f.id.to_string().dimmed(),
            f.name.green(),
            f.bitwidth,
        );
    }
    s
}

pub fn show_tables(pi: &ProgramInfo) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{}", "tables".bright_white());
    for t in pi.tables() {
        let _ = writeln!(s, "  {} {}", t.id.to_string().dimmed(), t.name.green());
        for m in &t.match_fields {
            let _ = writeln!(
                s,
                "    key {} {} bit<{}>",
                m.name,
                m.match_type.to_string().bright_magenta(),
                m.bitwidth,
            );
        }
        for name in &t.action_names {
            let _ = match pi.action_id_from_name(name) {
                Some(_) => writeln!(s, "    action {}", name),
                None => writeln!(
                    s,
                    "    action {} {}",
                    name,
                    "(not declared)".yellow()
                ),
            };
        }
    }
    s
}
