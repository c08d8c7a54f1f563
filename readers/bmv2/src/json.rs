// Copyright 2022 Oxide Computer Company

//! Typed accessors over `serde_json::Value` that report the offending member
//! as a [`ReaderError`].

use serde_json::Value;

use crate::error::{Problem, ReaderError};

pub(crate) fn member<'a>(
    v: &'a Value,
    key: &str,
    ctx: &str,
) -> Result<&'a Value, ReaderError> {
    v.get(key)
        .ok_or_else(|| ReaderError::invalid(ctx, key, Problem::Missing))
}

pub(crate) fn array<'a>(
    v: &'a Value,
    key: &str,
    ctx: &str,
) -> Result<&'a [Value], ReaderError> {
    member(v, key, ctx)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| {
            ReaderError::invalid(ctx, key, Problem::Expected("an array"))
        })
}

pub(crate) fn string<'a>(
    v: &'a Value,
    key: &str,
    ctx: &str,
) -> Result<&'a str, ReaderError> {
    member(v, key, ctx)?.as_str().ok_or_else(|| {
        ReaderError::invalid(ctx, key, Problem::Expected("a string"))
    })
}

pub(crate) fn bitwidth(
    v: &Value,
    key: &str,
    ctx: &str,
) -> Result<usize, ReaderError> {
    as_bitwidth(member(v, key, ctx)?)
        .ok_or_else(|| ReaderError::invalid(ctx, key, Problem::Expected("a bitwidth")))
}

pub(crate) fn as_bitwidth(v: &Value) -> Option<usize> {
    v.as_u64().and_then(|w| usize::try_from(w).ok())
}
