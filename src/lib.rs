//! # bitpack
//!
//! A growable bit vector and a bit-field codec built on top of it.
//!
//! [`BitVector`] is a sparse-friendly sequence of bits with range clearing,
//! nearest-set-bit search in both directions, in-place insertion of clear bits
//! and a length-prefixed binary persistence format.
//!
//! [`BitPacker`] appends fixed-width integer and bounded ASCII fields and
//! renders them as a printable string, seven bits per character.
//! [`BitUnpacker`] reads them back when given the same sequence of widths.
//! A [`Layout`] names that sequence once so records can be packed from and
//! unpacked into maps.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use bitpack::layout::{Field, Layout, Value};
//!
//! let layout = Layout::compile(&[Field::int("id", 10), Field::ascii("tag", 4)]).unwrap();
//! let record = BTreeMap::from([
//!     ("id".to_string(), Value::U64(513)),
//!     ("tag".to_string(), Value::Text("ok".to_string())),
//! ]);
//!
//! let packed = layout.pack(&record).unwrap();
//! assert_eq!(layout.unpack(&packed), record);
//! ```

pub mod alphabet;
pub mod bit_vector;
pub mod bits;
pub mod errors;
pub mod layout;
pub mod packer;
#[cfg(feature = "serde")]
pub mod serde;
pub mod unpacker;

pub use bit_vector::BitVector;
pub use layout::Layout;
pub use packer::BitPacker;
pub use unpacker::BitUnpacker;
