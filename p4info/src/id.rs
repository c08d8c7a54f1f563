// Copyright 2022 Oxide Computer Company

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of bits used for the index part of an identifier. The remaining top
/// byte holds the resource type.
const INDEX_BITS: u32 = 24;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Largest per-action parameter index. Parameter identifiers pack the owning
/// action's index into bits 8..24, leaving a single byte for the parameter.
pub const MAX_PARAM_INDEX: usize = 0xff;

/// Largest action index that can still be packed into a parameter identifier.
pub const MAX_PARAM_ACTION_INDEX: usize = 0xffff;

/// Largest index for actions, tables and fields.
pub const MAX_INDEX: usize = INDEX_MASK as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Action,
    Table,
    ActionParam,
    Field,
}

impl ResourceType {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Action => 0x01,
            Self::Table => 0x02,
            Self::ActionParam => 0x03,
            Self::Field => 0x04,
        }
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Action),
            0x02 => Some(Self::Table),
            0x03 => Some(Self::ActionParam),
            0x04 => Some(Self::Field),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Action => "action",
            Self::Table => "table",
            Self::ActionParam => "action parameter",
            Self::Field => "field",
        };
        write!(f, "{}", s)
    }
}

/// A wire identifier for an entity of the program information model.
///
/// Identifiers are dense and derived from the position of the entity in the
/// source document, never from ids the compiler may have written into it. The
/// top byte carries the [`ResourceType`] tag so an identifier can be decoded
/// without knowing which table it came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u32", try_from = "u32")]
pub struct P4Id(u32);

impl P4Id {
    fn make(ty: ResourceType, index: usize) -> Option<Self> {
        if index > MAX_INDEX {
            return None;
        }
        Some(Self(((ty.tag() as u32) << INDEX_BITS) | index as u32))
    }

    pub fn action(index: usize) -> Option<Self> {
        Self::make(ResourceType::Action, index)
    }

    pub fn table(index: usize) -> Option<Self> {
        Self::make(ResourceType::Table, index)
    }

    pub fn field(index: usize) -> Option<Self> {
        Self::make(ResourceType::Field, index)
    }

    /// Make the identifier of the `index`th parameter of `action`. Returns
    /// `None` if `action` is not an action identifier or either index does not
    /// fit the packed layout.
    pub fn action_param(action: P4Id, index: usize) -> Option<Self> {
        if action.resource_type() != Some(ResourceType::Action) {
            return None;
        }
        let action_index = action.index();
        if action_index > MAX_PARAM_ACTION_INDEX || index > MAX_PARAM_INDEX {
            return None;
        }
        let tag = ResourceType::ActionParam.tag() as u32;
        Some(Self(
            (tag << INDEX_BITS) | ((action_index as u32) << 8) | index as u32,
        ))
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_tag((self.0 >> INDEX_BITS) as u8)
    }

    /// Position of the entity within its category. For action parameters this
    /// is the position within the owning action.
    pub fn index(&self) -> usize {
        match self.resource_type() {
            Some(ResourceType::ActionParam) => (self.0 & 0xff) as usize,
            _ => (self.0 & INDEX_MASK) as usize,
        }
    }

    /// Index of the owning action, for action parameter identifiers.
    pub fn action_index(&self) -> Option<usize> {
        match self.resource_type() {
            Some(ResourceType::ActionParam) => {
                Some(((self.0 >> 8) & 0xffff) as usize)
            }
            _ => None,
        }
    }

    pub fn is(&self, ty: ResourceType) -> bool {
        self.resource_type() == Some(ty)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for P4Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<P4Id> for u32 {
    fn from(id: P4Id) -> u32 {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownResourceType(pub u32);

impl fmt::Display for UnknownResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "identifier {:#010x} has no known resource type", self.0)
    }
}

impl std::error::Error for UnknownResourceType {}

impl TryFrom<u32> for P4Id {
    type Error = UnknownResourceType;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match ResourceType::from_tag((raw >> INDEX_BITS) as u8) {
            Some(_) => Ok(Self(raw)),
            None => Err(UnknownResourceType(raw)),
        }
    }
}
