// Copyright 2022 Oxide Computer Company

use crate::error::ReaderError;

/// Capacity of the buffer namespaced field names are composed into. One byte is
/// reserved for a terminator, so the longest accepted name is one byte shorter.
pub const DEFAULT_NAME_CAPACITY: usize = 256;

/// Compose the flat field name `<instance>.<suffix>`.
///
/// A name that does not fit in `capacity` is an error, never truncated.
pub(crate) fn compose(
    instance: &str,
    suffix: &str,
    capacity: usize,
    ctx: &str,
) -> Result<String, ReaderError> {
    let len = instance.len() + 1 + suffix.len();
    if len >= capacity {
        return Err(ReaderError::NameCompositionOverflow {
            context: ctx.to_owned(),
            prefix: instance.to_owned(),
            suffix: suffix.to_owned(),
            capacity,
        });
    }
    let mut name = String::with_capacity(len);
    name.push_str(instance);
    name.push('.');
    name.push_str(suffix);
    Ok(name)
}
