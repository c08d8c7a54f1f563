// Copyright 2022 Oxide Computer Company

use crate::id::{P4Id, ResourceType};
use thiserror::Error;

/// Reasons a [`crate::ProgramInfoStore`] refuses an insertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("expected {expected} identifier, got {id}")]
    WrongResourceType { id: P4Id, expected: ResourceType },

    #[error("{0} already registered")]
    DuplicateId(P4Id),

    #[error("{0} not registered")]
    UnknownId(P4Id),

    #[error("{id} declared {declared} {what}, cannot add more")]
    CapacityExceeded {
        id: P4Id,
        what: &'static str,
        declared: usize,
    },

    #[error("{ty} identifiers must be added in order: expected index {expected}, got {id}")]
    OutOfOrder {
        id: P4Id,
        ty: ResourceType,
        expected: usize,
    },
}
