//! JSON‑deserializable layout description.
//!
//! These types describe the *shape* of a packed record. They are intended to be
//! loaded from a configuration file shipped with your application and then
//! compiled into a [`Layout`].
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "id", "kind": { "type": "Int", "bits": 12 } },
//!     { "name": "offset", "kind": { "type": "Int", "bits": 8, "signed": true } },
//!     { "name": "label", "kind": { "type": "Ascii", "max_bytes": 16 } },
//!     { "name": "enabled", "kind": { "type": "Bool" } }
//!   ]
//! }
//! ```

use ::serde::{Deserialize, Serialize};

use crate::{
    errors::CompileError,
    layout::{Field, FieldKind, Layout},
};

/// Top‑level layout definition: the fields of one record, in packing order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutDef {
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Key of the field in packed and unpacked maps.
    pub name: String,
    pub kind: FieldKindDef,
}

/// Kind of field in the layout.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Fixed‑width integer.
    Int {
        bits: usize,
        /// Two's complement when true.
        #[serde(default)]
        signed: bool,
    },
    /// Zero‑terminated ASCII text of bounded length.
    Ascii { max_bytes: usize },
    /// Single bit.
    Bool,
}

impl From<FieldKindDef> for FieldKind {
    fn from(value: FieldKindDef) -> Self {
        match value {
            FieldKindDef::Int { bits, signed } => FieldKind::Int { bits, signed },
            FieldKindDef::Ascii { max_bytes } => FieldKind::Ascii { max_bytes },
            FieldKindDef::Bool => FieldKind::Bool,
        }
    }
}

impl From<FieldDef> for Field {
    fn from(value: FieldDef) -> Self {
        Field {
            name: value.name,
            kind: value.kind.into(),
        }
    }
}

impl TryFrom<LayoutDef> for Layout {
    type Error = CompileError;

    fn try_from(value: LayoutDef) -> Result<Self, Self::Error> {
        let fields: Vec<Field> = value.fields.into_iter().map(Into::into).collect();
        Layout::compile(&fields)
    }
}
