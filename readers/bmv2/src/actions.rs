// Copyright 2022 Oxide Computer Company

use p4info::{P4Id, ProgramInfo, ProgramInfoStore};
use serde_json::Value;
use slog::{debug, Logger};

use crate::error::{Problem, ReaderError};
use crate::json;

/// Register every action of the document, with its runtime parameters, in
/// document order.
pub(crate) fn read(
    root: &Value,
    pi: &mut ProgramInfo,
    log: &Logger,
) -> Result<(), ReaderError> {
    let actions = json::array(root, "actions", "document")?;
    debug!(log, "number of actions found: {}", actions.len());
    pi.action_init(actions.len())?;

    for (index, action) in actions.iter().enumerate() {
        let ctx = format!("actions[{}]", index);
        let name = json::string(action, "name", &ctx)?;

        // Any "id" the compiler wrote is ignored, identifiers are positional.
        let id = P4Id::action(index).ok_or_else(|| {
            ReaderError::invalid(
                "document",
                "actions",
                Problem::TooMany(actions.len()),
            )
        })?;

        let params = json::array(action, "runtime_data", &ctx)?;

        debug!(log, "adding action '{}' {}", name, id);
        pi.action_add(id, name, params.len())?;

        for (param_index, param) in params.iter().enumerate() {
            let pctx = format!("action '{}' runtime_data[{}]", name, param_index);
            let param_name = json::string(param, "name", &pctx)?;
            let bitwidth = json::bitwidth(param, "bitwidth", &pctx)?;

            let param_id =
                P4Id::action_param(id, param_index).ok_or_else(|| {
                    ReaderError::invalid(
                        &ctx,
                        "runtime_data",
                        Problem::TooMany(params.len()),
                    )
                })?;

            pi.action_add_param(id, param_id, param_name, bitwidth)?;
        }
    }

    Ok(())
}
