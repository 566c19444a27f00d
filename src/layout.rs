//! Layout: a compiled, ordered list of named fields used to pack a map of
//! values into a packed string and to unpack it again.
//!
//! The packed string itself carries no field names or widths; both sides
//! must use the same layout.

use std::collections::{BTreeMap, HashSet};

use crate::{
    bits,
    errors::{CompileError, WriteError},
    packer::BitPacker,
    unpacker::BitUnpacker,
};

/// A single named field in a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used as the key in packed and unpacked maps.
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    /// Unsigned integer field of `bits` bits.
    pub fn int(name: impl Into<String>, bits: usize) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Int {
                bits,
                signed: false,
            },
        }
    }

    /// Two's complement integer field of `bits` bits.
    pub fn signed(name: impl Into<String>, bits: usize) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Int { bits, signed: true },
        }
    }

    /// Zero-terminated ASCII field of at most `max_bytes` characters.
    pub fn ascii(name: impl Into<String>, max_bytes: usize) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Ascii { max_bytes },
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Bool,
        }
    }

    /// Largest number of bits this field can occupy.
    pub fn max_bits(&self) -> usize {
        match self.kind {
            FieldKind::Int { bits, .. } => bits,
            FieldKind::Ascii { max_bytes } => max_bytes * 8,
            FieldKind::Bool => 1,
        }
    }
}

/// The shape of a field's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed-width integer, 1 to 64 bits.
    Int { bits: usize, signed: bool },
    /// ASCII text. Takes `max_bytes * 8` bits when full, otherwise one byte
    /// per character plus a zero terminator byte.
    Ascii { max_bytes: usize },
    /// Single bit.
    Bool,
}

/// A value packed into or unpacked from a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U64(u64),
    I64(i64),
    Bool(bool),
    Text(String),
}

/// Compiled field list. Build with [`Layout::compile`].
#[derive(Debug, Clone)]
pub struct Layout {
    /// Fields in packing order.
    pub fields: Vec<Field>,
    max_bits: usize,
}

impl Layout {
    /// Validates `fields` and keeps them in order.
    pub fn compile(fields: &[Field]) -> Result<Self, CompileError> {
        let mut names = HashSet::with_capacity(fields.len());
        let mut max_bits = 0;

        for field in fields {
            if field.name.is_empty() {
                return Err(CompileError::EmptyFieldName);
            }
            if !names.insert(field.name.as_str()) {
                return Err(CompileError::DuplicateFieldName(field.name.clone()));
            }

            match field.kind {
                FieldKind::Int { bits, .. } if bits == 0 || bits > 64 => {
                    return Err(CompileError::InvalidFieldSize {
                        name: field.name.clone(),
                        bits,
                    });
                }
                FieldKind::Ascii { max_bytes: 0 } => {
                    return Err(CompileError::EmptyAsciiField(field.name.clone()));
                }
                _ => {}
            }

            max_bits += field.max_bits();
        }

        Ok(Layout {
            fields: fields.to_vec(),
            max_bits,
        })
    }

    /// Upper bound on the number of bits one packed record takes.
    pub fn max_bits(&self) -> usize {
        self.max_bits
    }

    /// Packs `values` into a packed string, fields in layout order.
    pub fn pack(&self, values: &BTreeMap<String, Value>) -> Result<String, WriteError> {
        let mut packer = BitPacker::new();
        self.pack_into(&mut packer, values)?;
        Ok(packer.to_packed())
    }

    /// Appends `values` to an existing packer. Nothing is written if any value is rejected.
    ///
    /// Text values must be ASCII without zero bytes; anything else could not be
    /// read back.
    pub fn pack_into(
        &self,
        packer: &mut BitPacker,
        values: &BTreeMap<String, Value>,
    ) -> Result<(), WriteError> {
        let mut ordered = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = values
                .get(&field.name)
                .ok_or_else(|| WriteError::MissingField(field.name.clone()))?;
            check_value(field, value)?;
            ordered.push((field, value));
        }

        for (field, value) in ordered {
            match (field.kind, value) {
                (FieldKind::Int { bits, .. }, Value::U64(v)) => {
                    packer.add_int(*v, bits);
                }
                (FieldKind::Int { bits, .. }, Value::I64(v)) => {
                    packer.add_signed(*v, bits);
                }
                (FieldKind::Ascii { max_bytes }, Value::Text(text)) => {
                    packer.add_ascii(text, max_bytes);
                }
                (FieldKind::Bool, Value::Bool(b)) => {
                    packer.add_bool(*b);
                }
                _ => return Err(WriteError::InvalidValue(field.name.clone())),
            }
        }

        Ok(())
    }

    /// Unpacks a packed string produced with this layout.
    ///
    /// Never fails: a string packed with another layout decodes to wrong values.
    pub fn unpack(&self, packed: &str) -> BTreeMap<String, Value> {
        let mut reader = BitUnpacker::from_packed(packed);
        self.unpack_from(&mut reader)
    }

    /// Reads one record from `reader`, leaving its cursor after the last field.
    pub fn unpack_from(&self, reader: &mut BitUnpacker<'_>) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();

        for field in &self.fields {
            let value = match field.kind {
                FieldKind::Int {
                    bits,
                    signed: false,
                } => Value::U64(reader.read_int(bits)),
                FieldKind::Int { bits, signed: true } => Value::I64(reader.read_signed(bits)),
                FieldKind::Ascii { max_bytes } => Value::Text(reader.read_ascii(max_bytes)),
                FieldKind::Bool => Value::Bool(reader.read_bool()),
            };
            map.insert(field.name.clone(), value);
        }

        map
    }
}

fn check_value(field: &Field, value: &Value) -> Result<(), WriteError> {
    let out_of_range = |bits| WriteError::ValueOutOfRange {
        name: field.name.clone(),
        bits,
    };

    match (field.kind, value) {
        (FieldKind::Int { bits, signed: false }, Value::U64(v)) => {
            if bits::low_bits(*v, bits) != *v {
                return Err(out_of_range(bits));
            }
        }
        (FieldKind::Int { bits, signed: true }, Value::I64(v)) => {
            if bits::sign_extend(*v as u64, bits) != *v {
                return Err(out_of_range(bits));
            }
        }
        (FieldKind::Ascii { .. }, Value::Text(text)) => {
            // A zero byte would end the field early on read.
            if !text.chars().all(|ch| ('\u{1}'..='\u{7F}').contains(&ch)) {
                return Err(WriteError::InvalidText {
                    name: field.name.clone(),
                });
            }
        }
        (FieldKind::Bool, Value::Bool(_)) => {}
        _ => return Err(WriteError::InvalidValue(field.name.clone())),
    }

    Ok(())
}
