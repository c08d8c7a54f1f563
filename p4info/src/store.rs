// Copyright 2022 Oxide Computer Company

use crate::error::StoreError;
use crate::id::{P4Id, ResourceType};
use crate::model::{
    Action, ActionParam, Field, MatchField, MatchType, ProgramInfo, Table,
};

/// Append-only insertion interface of a program information store.
///
/// Each category is announced with an `*_init` call carrying the number of
/// entities that will follow, which a store may use to pre-size itself.
/// Entities are then added in identifier order. Nothing is ever updated or
/// removed through this interface.
///
/// Names are not required to be unique. The compiler repeats action names
/// (`NoAction`) and the same table name may appear in several pipelines.
pub trait ProgramInfoStore {
    fn action_init(&mut self, num_actions: usize) -> Result<(), StoreError>;

    fn action_add(
        &mut self,
        id: P4Id,
        name: &str,
        num_params: usize,
    ) -> Result<(), StoreError>;

    fn action_add_param(
        &mut self,
        action: P4Id,
        id: P4Id,
        name: &str,
        bitwidth: usize,
    ) -> Result<(), StoreError>;

    fn field_init(&mut self, num_fields: usize) -> Result<(), StoreError>;

    fn field_add(
        &mut self,
        id: P4Id,
        name: &str,
        bitwidth: usize,
    ) -> Result<(), StoreError>;

    fn table_init(&mut self, num_tables: usize) -> Result<(), StoreError>;

    fn table_add(
        &mut self,
        id: P4Id,
        name: &str,
        num_match_fields: usize,
        num_actions: usize,
    ) -> Result<(), StoreError>;

    fn table_add_match_field(
        &mut self,
        table: P4Id,
        field: P4Id,
        name: &str,
        match_type: MatchType,
        bitwidth: usize,
    ) -> Result<(), StoreError>;

    fn table_add_action(
        &mut self,
        table: P4Id,
        action_name: &str,
    ) -> Result<(), StoreError>;
}

fn expect_type(id: P4Id, expected: ResourceType) -> Result<(), StoreError> {
    if id.is(expected) {
        Ok(())
    } else {
        Err(StoreError::WrongResourceType { id, expected })
    }
}

/// Appending `id` to a category holding `len` entries must land exactly at the
/// end.
fn expect_next(
    id: P4Id,
    ty: ResourceType,
    len: usize,
) -> Result<(), StoreError> {
    match id.index() {
        i if i < len => Err(StoreError::DuplicateId(id)),
        i if i > len => Err(StoreError::OutOfOrder {
            id,
            ty,
            expected: len,
        }),
        _ => Ok(()),
    }
}

impl ProgramInfoStore for ProgramInfo {
    fn action_init(&mut self, num_actions: usize) -> Result<(), StoreError> {
        self.actions.reserve_exact(num_actions);
        self.action_names.reserve(num_actions);
        Ok(())
    }

    fn action_add(
        &mut self,
        id: P4Id,
        name: &str,
        num_params: usize,
    ) -> Result<(), StoreError> {
        expect_type(id, ResourceType::Action)?;
        expect_next(id, ResourceType::Action, self.actions.len())?;
        self.action_names.entry(name.to_owned()).or_insert(id);
        self.actions.push(Action {
            id,
            name: name.to_owned(),
            num_params,
            params: Vec::with_capacity(num_params),
        });
        Ok(())
    }

    fn action_add_param(
        &mut self,
        action: P4Id,
        id: P4Id,
        name: &str,
        bitwidth: usize,
    ) -> Result<(), StoreError> {
        expect_type(action, ResourceType::Action)?;
        expect_type(id, ResourceType::ActionParam)?;
        if id.action_index() != Some(action.index()) {
            return Err(StoreError::UnknownId(id));
        }
        let a = self
            .actions
            .get_mut(action.index())
            .ok_or(StoreError::UnknownId(action))?;
        expect_next(id, ResourceType::ActionParam, a.params.len())?;
        if a.params.len() >= a.num_params {
            return Err(StoreError::CapacityExceeded {
                id: action,
                what: "parameters",
                declared: a.num_params,
            });
        }
        a.params.push(ActionParam {
            id,
            name: name.to_owned(),
            bitwidth,
        });
        Ok(())
    }

    fn field_init(&mut self, num_fields: usize) -> Result<(), StoreError> {
        self.fields.reserve_exact(num_fields);
        self.field_names.reserve(num_fields);
        Ok(())
    }

    fn field_add(
        &mut self,
        id: P4Id,
        name: &str,
        bitwidth: usize,
    ) -> Result<(), StoreError> {
        expect_type(id, ResourceType::Field)?;
        expect_next(id, ResourceType::Field, self.fields.len())?;
        self.field_names.entry(name.to_owned()).or_insert(id);
        self.fields.push(Field {
            id,
            name: name.to_owned(),
            bitwidth,
        });
        Ok(())
    }

    fn table_init(&mut self, num_tables: usize) -> Result<(), StoreError> {
        self.tables.reserve_exact(num_tables);
        self.table_names.reserve(num_tables);
        Ok(())
    }

    fn table_add(
        &mut self,
        id: P4Id,
        name: &str,
        num_match_fields: usize,
        num_actions: usize,
    ) -> Result<(), StoreError> {
        expect_type(id, ResourceType::Table)?;
        expect_next(id, ResourceType::Table, self.tables.len())?;
        self.table_names.entry(name.to_owned()).or_insert(id);
        self.tables.push(Table {
            id,
            name: name.to_owned(),
            num_match_fields,
            match_fields: Vec::with_capacity(num_match_fields),
            num_actions,
            action_names: Vec::with_capacity(num_actions),
        });
        Ok(())
    }

    fn table_add_match_field(
        &mut self,
        table: P4Id,
        field: P4Id,
        name: &str,
        match_type: MatchType,
        bitwidth: usize,
    ) -> Result<(), StoreError> {
        expect_type(table, ResourceType::Table)?;
        expect_type(field, ResourceType::Field)?;
        if self.field(field).is_none() {
            return Err(StoreError::UnknownId(field));
        }
        let t = self
            .tables
            .get_mut(table.index())
            .ok_or(StoreError::UnknownId(table))?;
        if t.match_fields.len() >= t.num_match_fields {
            return Err(StoreError::CapacityExceeded {
                id: table,
                what: "match fields",
                declared: t.num_match_fields,
            });
        }
        t.match_fields.push(MatchField {
            field,
            name: name.to_owned(),
            match_type,
            bitwidth,
        });
        Ok(())
    }

    fn table_add_action(
        &mut self,
        table: P4Id,
        action_name: &str,
    ) -> Result<(), StoreError> {
        expect_type(table, ResourceType::Table)?;
        let t = self
            .tables
            .get_mut(table.index())
            .ok_or(StoreError::UnknownId(table))?;
        if t.action_names.len() >= t.num_actions {
            return Err(StoreError::CapacityExceeded {
                id: table,
                what: "actions",
                declared: t.num_actions,
            });
        }
        t.action_names.push(action_name.to_owned());
        Ok(())
    }
}

impl ProgramInfo {
    /// Replay every entity of this model, in identifier order, into `store`.
    pub fn commit_into<S: ProgramInfoStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StoreError> {
        store.action_init(self.actions.len())?;
        for a in &self.actions {
            store.action_add(a.id, &a.name, a.num_params)?;
            for p in &a.params {
                store.action_add_param(a.id, p.id, &p.name, p.bitwidth)?;
            }
        }

        store.field_init(self.fields.len())?;
        for f in &self.fields {
            store.field_add(f.id, &f.name, f.bitwidth)?;
        }

        store.table_init(self.tables.len())?;
        for t in &self.tables {
            store.table_add(t.id, &t.name, t.num_match_fields, t.num_actions)?;
            for m in &t.match_fields {
                store.table_add_match_field(
                    t.id,
                    m.field,
                    &m.name,
                    m.match_type,
                    m.bitwidth,
                )?;
            }
            for name in &t.action_names {
                store.table_add_action(t.id, name)?;
            }
        }

        Ok(())
    }
}
