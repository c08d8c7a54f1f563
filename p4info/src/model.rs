// Copyright 2022 Oxide Computer Company

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{P4Id, ResourceType};

/// Lookup discipline of a table key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Lpm,
    Ternary,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exact => "exact",
            Self::Lpm => "lpm",
            Self::Ternary => "ternary",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMatchType(pub String);

impl fmt::Display for UnsupportedMatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported match type `{}`", self.0)
    }
}

impl std::error::Error for UnsupportedMatchType {}

impl FromStr for MatchType {
    type Err = UnsupportedMatchType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "lpm" => Ok(Self::Lpm),
            "ternary" => Ok(Self::Ternary),
            other => Err(UnsupportedMatchType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionParam {
    pub id: P4Id,
    pub name: String,
    pub bitwidth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub id: P4Id,
    pub name: String,
    /// Number of parameters announced when the action was added.
    pub num_params: usize,
    pub params: Vec<ActionParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub id: P4Id,
    /// Always `<header instance>.<field>`.
    pub name: String,
    pub bitwidth: usize,
}

impl Field {
    pub fn byte_width(&self) -> usize {
        self.bitwidth.div_ceil(8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchField {
    pub field: P4Id,
    pub name: String,
    pub match_type: MatchType,
    /// Copied from the referenced field.
    pub bitwidth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub id: P4Id,
    pub name: String,
    pub num_match_fields: usize,
    pub match_fields: Vec<MatchField>,
    pub num_actions: usize,
    /// Names of the actions this table may invoke, as written in the source.
    /// These are not checked against the action registry.
    pub action_names: Vec<String>,
}

/// The program information model: every action, field and table of a
/// packet-processing program, keyed by dense identifiers.
///
/// Entities are stored in identifier order, so the index part of an identifier
/// is also the position of the entity in its vector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgramInfo {
    pub(crate) actions: Vec<Action>,
    pub(crate) fields: Vec<Field>,
    pub(crate) tables: Vec<Table>,

    #[serde(skip)]
    pub(crate) action_names: HashMap<String, P4Id>,
    #[serde(skip)]
    pub(crate) field_names: HashMap<String, P4Id>,
    #[serde(skip)]
    pub(crate) table_names: HashMap<String, P4Id>,
}

fn slot<T>(items: &[T], id: P4Id, ty: ResourceType) -> Option<&T> {
    if !id.is(ty) {
        return None;
    }
    items.get(id.index())
}

impl ProgramInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    //
    // actions
    //

    pub fn action(&self, id: P4Id) -> Option<&Action> {
        slot(&self.actions, id, ResourceType::Action)
    }

    /// When several actions share a name, the one with the lowest id.
    pub fn action_id_from_name(&self, name: &str) -> Option<P4Id> {
        self.action_names.get(name).copied()
    }

    pub fn action_name(&self, id: P4Id) -> Option<&str> {
        self.action(id).map(|a| a.name.as_str())
    }

    pub fn action_num_params(&self, id: P4Id) -> Option<usize> {
        self.action(id).map(|a| a.params.len())
    }

    pub fn action_params(&self, id: P4Id) -> Option<&[ActionParam]> {
        self.action(id).map(|a| a.params.as_slice())
    }

    pub fn action_param_id_from_name(
        &self,
        action: P4Id,
        name: &str,
    ) -> Option<P4Id> {
        self.action(action)?
            .params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
    }

    pub fn action_param(&self, id: P4Id) -> Option<&ActionParam> {
        let action = P4Id::action(id.action_index()?)?;
        let param = self.action(action)?.params.get(id.index())?;
        (param.id == id).then_some(param)
    }

    pub fn action_param_bitwidth(&self, id: P4Id) -> Option<usize> {
        self.action_param(id).map(|p| p.bitwidth)
    }

    //
    // fields
    //

    pub fn field(&self, id: P4Id) -> Option<&Field> {
        slot(&self.fields, id, ResourceType::Field)
    }

    pub fn field_id_from_name(&self, name: &str) -> Option<P4Id> {
        self.field_names.get(name).copied()
    }

    pub fn field_name(&self, id: P4Id) -> Option<&str> {
        self.field(id).map(|f| f.name.as_str())
    }

    pub fn field_bitwidth(&self, id: P4Id) -> Option<usize> {
        self.field(id).map(|f| f.bitwidth)
    }

    pub fn field_byte_width(&self, id: P4Id) -> Option<usize> {
        self.field(id).map(Field::byte_width)
    }

    //
    // tables
    //

    pub fn table(&self, id: P4Id) -> Option<&Table> {
        slot(&self.tables, id, ResourceType::Table)
    }

    /// When several tables share a name, the one with the lowest id.
    pub fn table_id_from_name(&self, name: &str) -> Option<P4Id> {
        self.table_names.get(name).copied()
    }

    pub fn table_name(&self, id: P4Id) -> Option<&str> {
        self.table(id).map(|t| t.name.as_str())
    }

    pub fn table_match_fields(&self, id: P4Id) -> Option<&[MatchField]> {
        self.table(id).map(|t| t.match_fields.as_slice())
    }

    /// The match field of `table` that reads `field`, if any.
    pub fn table_match_field(
        &self,
        table: P4Id,
        field: P4Id,
    ) -> Option<&MatchField> {
        self.table(table)?
            .match_fields
            .iter()
            .find(|m| m.field == field)
    }

    pub fn table_num_actions(&self, id: P4Id) -> Option<usize> {
        self.table(id).map(|t| t.num_actions)
    }

    pub fn table_action_names(&self, id: P4Id) -> Option<&[String]> {
        self.table(id).map(|t| t.action_names.as_slice())
    }

    /// Identifiers of the table's actions that exist in the action registry.
    /// Names that do not resolve are skipped.
    pub fn table_action_ids(&self, id: P4Id) -> Option<Vec<P4Id>> {
        let table = self.table(id)?;
        Some(
            table
                .action_names
                .iter()
                .filter_map(|name| self.action_id_from_name(name))
                .collect(),
        )
    }

    pub fn table_is_action_of(&self, table: P4Id, action: P4Id) -> bool {
        let (Some(t), Some(a)) = (self.table(table), self.action(action))
        else {
            return false;
        };
        t.action_names.iter().any(|name| *name == a.name)
    }
}
