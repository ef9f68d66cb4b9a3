// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # fastbin - zero-copy binary containers
//!
//! Typed views over one contiguous byte buffer. Reads never copy field data:
//! strings, vectors, nested objects and arrays are borrowed straight out of
//! the buffer. The layout is a fixed little-endian ABI, so bytes written
//! here can be read by any other implementation of the format.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastbin::{alloc_zeroed, Object, ScalarKind, SchemaBuilder, Result};
//!
//! fn main() -> Result<()> {
//!     let schema = SchemaBuilder::new("ChildVar")
//!         .scalar("field1", ScalarKind::I32)
//!         .string("field2")
//!         .build()?;
//!
//!     let mut obj = Object::create(&schema, alloc_zeroed(64))?;
//!     obj.set(0, 123i32)?;
//!     obj.set_str(1, "var_text")?;
//!     assert_eq!(obj.finalize()?, 32);
//!
//!     let view = Object::open(&schema, obj.as_bytes()?);
//!     assert_eq!(view.str(1)?, "var_text");
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! ```text
//! object        [u64 size]? [field 0][field 1] ...      size only if variable
//! fixed field   [value, zero padded to 8 bytes]
//! var field     [u64 aligned | diff << 56][content][0 x diff]
//! struct array  [u64 total size][u64 count][element 0] ...
//! variant       [u64 size << 8 | tag][payload]
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Schema`] | Field list with precomputed static offsets |
//! | [`Object`] | Random-access view of a composite object |
//! | [`ObjectWriter`] | Order-checked staged writer |
//! | [`StructArray`] | Append-only packed array of objects |
//! | [`Variant`] | Tagged value out of a closed list of kinds |
//!
//! ## Features
//!
//! - `schema-json` (default): load schemas from the generator's JSON
//!   document ([`schema::SchemaSet`]).

/// Array of same-schema objects with append and indexed access.
pub mod array;
/// Storage ownership helpers shared by the containers.
pub mod buffer;
/// Field codecs (scalars, enums, variable-length headers).
pub mod codec;
/// Wire format constants.
pub mod config;
/// Error type.
pub mod error;
/// Schema descriptors and offset resolution.
pub mod layout;
/// Composite object view.
pub mod object;
/// JSON schema document loading.
#[cfg(feature = "schema-json")]
pub mod schema;
/// Tagged variant.
pub mod variant;
/// Staged, order-checked object writer.
pub mod writer;

pub use array::StructArray;
pub use buffer::{alloc_zeroed, Encoded, OwnedBuf};
pub use codec::{
    EnumDef, EnumMember, FastbinEnum, Scalar, ScalarKind, ScalarSlice, ScalarValue, VectorRef,
};
pub use error::{FastbinError, Result};
pub use layout::{FieldDef, FieldKind, Schema, SchemaBuilder, VarSize, VariantDef};
pub use object::Object;
pub use variant::{Variant, VariantValue};
pub use writer::ObjectWriter;

#[cfg(feature = "schema-json")]
pub use schema::{SchemaError, SchemaSet};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
