// Copyright 2022 Oxide Computer Company

//! Program information model for P4 control planes.
//!
//! A [`ProgramInfo`] describes the actions, fields and tables of a
//! packet-processing program in a target independent way. A control plane uses
//! it to validate table entries and to encode or decode the [`P4Id`]
//! identifiers that name those entities on the wire.

pub mod error;
pub mod id;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use id::{P4Id, ResourceType};
pub use model::{
    Action, ActionParam, Field, MatchField, MatchType, ProgramInfo, Table,
    UnsupportedMatchType,
};
pub use store::ProgramInfoStore;
