//! Error types for layout compilation, packing and strict decoding.
//!
//! The bit vector and the permissive codec paths never fail; persistence
//! reports failures through [`std::io::Error`].

/// Errors produced when compiling [crate::layout::Field]s into a [crate::layout::Layout].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Field name is empty.
    #[error("field name is empty")]
    EmptyFieldName,
    /// Two fields share a name.
    #[error("duplicate field name {0:?}")]
    DuplicateFieldName(String),
    /// Integer field width is 0 or greater than 64 bits.
    #[error("field {name:?} has invalid width {bits}")]
    InvalidFieldSize { name: String, bits: usize },
    /// ASCII field has a zero byte budget.
    #[error("field {0:?} has a zero byte budget")]
    EmptyAsciiField(String),
}

/// Errors produced when packing values through a [crate::layout::Layout].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// No value was supplied for a field.
    #[error("missing value for field {0:?}")]
    MissingField(String),
    /// The value kind does not match the field kind.
    #[error("value for field {0:?} has the wrong type")]
    InvalidValue(String),
    /// Text contains a zero byte or a character outside ASCII.
    #[error("text for field {name:?} is not zero-free ASCII")]
    InvalidText { name: String },
    /// The value does not fit in the field width.
    #[error("value for field {name:?} does not fit in {bits} bits")]
    ValueOutOfRange { name: String, bits: usize },
}

/// Errors produced by strict packed-string decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Character outside both printable ranges of the packed alphabet.
    #[error("character {ch:?} at index {index} is not part of the packed alphabet")]
    InvalidCharacter { ch: char, index: usize },
}
