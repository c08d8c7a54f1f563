// Copyright 2022 Oxide Computer Company

//! Reader for the JSON pipeline description the P4 compiler emits for the
//! bmv2 software switch.
//!
//! The document is translated in three passes that must run in order:
//!
//! - actions and their runtime parameters,
//! - fields, by expanding every header instance through its header type into
//!   a flat `<instance>.<field>` namespace,
//! - tables, whose match keys are resolved against that namespace.
//!
//! All passes write into a fresh [`ProgramInfo`]. On error the partially
//! populated model is dropped, so callers never observe a half-read program.

use p4info::{ProgramInfo, ProgramInfoStore};
use serde_json::Value;
use slog::{info, warn, Logger};

mod actions;
pub mod error;
mod fields;
mod json;
pub mod name;
mod tables;

pub use error::{Problem, ReaderError, Status};
pub use name::DEFAULT_NAME_CAPACITY;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Capacity, in bytes, of the buffer composed field names must fit in,
    /// including one byte reserved for a terminator.
    pub name_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name_capacity: DEFAULT_NAME_CAPACITY,
        }
    }
}

/// Read a bmv2 JSON document with default settings.
pub fn read(config: &str, log: &Logger) -> Result<ProgramInfo, ReaderError> {
    read_with_settings(config, &Settings::default(), log)
}

pub fn read_with_settings(
    config: &str,
    settings: &Settings,
    log: &Logger,
) -> Result<ProgramInfo, ReaderError> {
    let root: Value = match serde_json::from_str(config) {
        Ok(root) => root,
        Err(e) => {
            warn!(log, "bmv2 json does not parse: {}", e);
            return Err(e.into());
        }
    };
    read_value(&root, settings, log)
}

/// Read an already parsed bmv2 JSON document.
pub fn read_value(
    root: &Value,
    settings: &Settings,
    log: &Logger,
) -> Result<ProgramInfo, ReaderError> {
    let mut pi = ProgramInfo::new();
    match run(root, settings, &mut pi, log) {
        Ok(()) => {
            info!(
                log,
                "read {} actions, {} fields, {} tables",
                pi.num_actions(),
                pi.num_fields(),
                pi.num_tables()
            );
            Ok(pi)
        }
        Err(e) => {
            warn!(log, "bmv2 json rejected: {}", e);
            Err(e)
        }
    }
}

/// Read a bmv2 JSON document and commit the result into `store`.
///
/// Nothing is inserted into `store` unless the whole document was read
/// successfully.
pub fn read_into<S: ProgramInfoStore + ?Sized>(
    config: &str,
    settings: &Settings,
    store: &mut S,
    log: &Logger,
) -> Result<(), ReaderError> {
    let staged = read_with_settings(config, settings, log)?;
    staged.commit_into(store)?;
    Ok(())
}

fn run(
    root: &Value,
    settings: &Settings,
    pi: &mut ProgramInfo,
    log: &Logger,
) -> Result<(), ReaderError> {
    actions::read(root, pi, log)?;
    fields::read(root, settings, pi, log)?;
    tables::read(root, settings, pi, log)?;
    Ok(())
}
