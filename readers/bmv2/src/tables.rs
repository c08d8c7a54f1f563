// Copyright 2022 Oxide Computer Company

use p4info::{MatchType, P4Id, ProgramInfo, ProgramInfoStore};
use serde_json::Value;
use slog::{debug, Logger};

use crate::error::{Problem, ReaderError};
use crate::json;
use crate::name;
use crate::Settings;

fn pipeline_context(pipeline: &Value, index: usize) -> String {
    match pipeline.get("name").and_then(Value::as_str) {
        Some(name) => format!("pipeline '{}'", name),
        None => format!("pipelines[{}]", index),
    }
}

/// Register the tables of every pipeline. Tables share one identifier space
/// across pipelines, assigned in pipeline order, then document order.
///
/// Match keys are resolved against the field namespace, so fields must have
/// been read before tables.
pub(crate) fn read(
    root: &Value,
    settings: &Settings,
    pi: &mut ProgramInfo,
    log: &Logger,
) -> Result<(), ReaderError> {
    let pipelines = json::array(root, "pipelines", "document")?;

    let mut num_tables = 0usize;
    for (i, pipeline) in pipelines.iter().enumerate() {
        let ctx = pipeline_context(pipeline, i);
        num_tables += json::array(pipeline, "tables", &ctx)?.len();
    }

    debug!(log, "number of tables found: {}", num_tables);
    pi.table_init(num_tables)?;

    let mut index = 0usize;
    for (i, pipeline) in pipelines.iter().enumerate() {
        let pctx = pipeline_context(pipeline, i);
        let tables = json::array(pipeline, "tables", &pctx)?;

        for (j, table) in tables.iter().enumerate() {
            let ctx = format!("{} tables[{}]", pctx, j);
            let name = json::string(table, "name", &ctx)?;

            // Any "id" the compiler wrote is ignored, identifiers are
            // positional.
            let id = P4Id::table(index).ok_or_else(|| {
                ReaderError::invalid(
                    "document",
                    "pipelines",
                    Problem::TooMany(num_tables),
                )
            })?;
            index += 1;

            let key = json::array(table, "key", &ctx)?;
            let actions = json::array(table, "actions", &ctx)?;

            debug!(log, "adding table '{}' {}", name, id);
            pi.table_add(id, name, key.len(), actions.len())?;

            let ctx = format!("table '{}'", name);
            for match_field in key {
                read_match_field(match_field, id, settings, pi, &ctx)?;
            }

            for action in actions {
                let action = action.as_str().ok_or_else(|| {
                    ReaderError::invalid(
                        &ctx,
                        "actions",
                        Problem::Expected("a list of action names"),
                    )
                })?;
                pi.table_add_action(id, action)?;
            }
        }
    }

    Ok(())
}

fn read_match_field(
    match_field: &Value,
    table: P4Id,
    settings: &Settings,
    pi: &mut ProgramInfo,
    ctx: &str,
) -> Result<(), ReaderError> {
    let match_type = json::string(match_field, "match_type", ctx)?;
    let match_type: MatchType = match_type.parse().map_err(|_| {
        ReaderError::invalid(
            ctx,
            "match_type",
            Problem::UnsupportedMatchType(match_type.to_owned()),
        )
    })?;

    let target = json::array(match_field, "target", ctx)?;
    let (instance, suffix) = match target {
        [instance, suffix] => instance.as_str().zip(suffix.as_str()),
        _ => None,
    }
    .ok_or_else(|| {
        ReaderError::invalid(
            ctx,
            "target",
            Problem::Expected("a [header, field] pair"),
        )
    })?;

    let fname = name::compose(instance, suffix, settings.name_capacity, ctx)?;
    let unresolved = || {
        ReaderError::invalid(
            ctx,
            "target",
            Problem::Unresolved {
                kind: "field",
                name: fname.clone(),
            },
        )
    };

    // The width comes from the field namespace, not from the key descriptor.
    let field = pi.field_id_from_name(&fname).ok_or_else(unresolved)?;
    let bitwidth = pi.field_bitwidth(field).ok_or_else(unresolved)?;

    pi.table_add_match_field(table, field, &fname, match_type, bitwidth)?;
    Ok(())
}
