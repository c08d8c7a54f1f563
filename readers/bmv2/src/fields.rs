// Copyright 2022 Oxide Computer Company

use std::collections::HashMap;

use p4info::{P4Id, ProgramInfo, ProgramInfoStore};
use serde_json::Value;
use slog::{debug, Logger};

use crate::error::{Problem, ReaderError};
use crate::json;
use crate::name;
use crate::Settings;

/// Header types by name. Header types are declared once and referenced by
/// many header instances, the index keeps resolution linear in the number of
/// instances. It borrows from the document and lives only as long as one call
/// to [`read`].
struct HeaderTypes<'a>(HashMap<&'a str, &'a Value>);

impl<'a> HeaderTypes<'a> {
    fn index(root: &'a Value) -> Result<Self, ReaderError> {
        let header_types = json::array(root, "header_types", "document")?;
        let mut map = HashMap::with_capacity(header_types.len());
        for (i, ht) in header_types.iter().enumerate() {
            let name =
                json::string(ht, "name", &format!("header_types[{}]", i))?;
            map.insert(name, ht);
        }
        Ok(Self(map))
    }

    /// Resolve the header type of a header instance and return its field
    /// list.
    fn fields_of(
        &self,
        header: &'a Value,
        ctx: &str,
    ) -> Result<&'a [Value], ReaderError> {
        let type_name = json::string(header, "header_type", ctx)?;
        let ht = self.0.get(type_name).copied().ok_or_else(|| {
            ReaderError::invalid(
                ctx,
                "header_type",
                Problem::Unresolved {
                    kind: "header type",
                    name: type_name.to_owned(),
                },
            )
        })?;
        json::array(ht, "fields", &format!("header type '{}'", type_name))
    }
}

/// A `[suffix, bitwidth]` entry of a header type's field list. An optional
/// third element (signedness) is accepted and ignored.
fn field_spec<'a>(
    field: &'a Value,
    ctx: &str,
) -> Result<(&'a str, usize), ReaderError> {
    let bad = || {
        ReaderError::invalid(
            ctx,
            "fields",
            Problem::Expected("a [name, bitwidth] pair"),
        )
    };
    let parts = field.as_array().ok_or_else(bad)?;
    match parts.as_slice() {
        [suffix, width] | [suffix, width, _] => {
            let suffix = suffix.as_str().ok_or_else(bad)?;
            let width = json::as_bitwidth(width).ok_or_else(bad)?;
            Ok((suffix, width))
        }
        _ => Err(bad()),
    }
}

/// Build the flat field namespace. Every field of every header instance is
/// registered as `<instance>.<field>` with a global identifier assigned in
/// header declaration order, then field order.
pub(crate) fn read(
    root: &Value,
    settings: &Settings,
    pi: &mut ProgramInfo,
    log: &Logger,
) -> Result<(), ReaderError> {
    let headers = json::array(root, "headers", "document")?;
    let types = HeaderTypes::index(root)?;

    let mut num_fields = 0usize;
    for (i, header) in headers.iter().enumerate() {
        let ctx = format!("headers[{}]", i);
        num_fields += types.fields_of(header, &ctx)?.len();
    }

    debug!(log, "number of fields found: {}", num_fields);
    pi.field_init(num_fields)?;

    let mut index = 0usize;
    for (i, header) in headers.iter().enumerate() {
        let ctx = format!("headers[{}]", i);
        let instance = json::string(header, "name", &ctx)?;
        let fields = types.fields_of(header, &ctx)?;

        let ctx = format!("header '{}'", instance);
        for field in fields {
            let (suffix, bitwidth) = field_spec(field, &ctx)?;
            let fname =
                name::compose(instance, suffix, settings.name_capacity, &ctx)?;
            let id = P4Id::field(index).ok_or_else(|| {
                ReaderError::invalid(
                    "document",
                    "headers",
                    Problem::TooMany(num_fields),
                )
            })?;
            index += 1;

            debug!(log, "adding field '{}' {}", fname, id);
            pi.field_add(id, &fname, bitwidth)?;
        }
    }

    Ok(())
}
