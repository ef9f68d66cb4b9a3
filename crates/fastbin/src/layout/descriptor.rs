// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema descriptors for runtime layout resolution.

use crate::codec::{varfield, EnumDef, Scalar, ScalarKind};
use crate::config::{FIELD_STRIDE, MAX_VARIANT_KINDS, OBJECT_HEADER_SIZE};
use crate::error::{FastbinError, Result};
use crate::variant::Variant;
use std::fmt;
use std::sync::Arc;

/// Field type kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Primitive in an 8-byte stride.
    Scalar(ScalarKind),
    /// Enum in an 8-byte stride.
    Enum(Arc<EnumDef>),
    /// UTF-8 string with a variable field header.
    String,
    /// Packed primitive vector with a variable field header.
    Vector(ScalarKind),
    /// Packed enum vector with a variable field header.
    EnumVector(Arc<EnumDef>),
    /// Nested object embedded by value.
    Object(Arc<Schema>),
    /// Struct array of the given element type, embedded by value.
    Array(Arc<Schema>),
    /// Tagged variant wrapped in a variable field header.
    Variant(Arc<VariantDef>),
}

impl FieldKind {
    /// Check the enum definition carried by an enum or enum vector kind.
    fn validate_enum(&self) -> Result<()> {
        match self {
            Self::Enum(def) | Self::EnumVector(def) => def.validate(),
            _ => Ok(()),
        }
    }

    /// Stride when the size does not depend on the content.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) | Self::Enum(_) => Some(FIELD_STRIDE),
            Self::Object(schema) => schema.fixed_size(),
            Self::String
            | Self::Vector(_)
            | Self::EnumVector(_)
            | Self::Array(_)
            | Self::Variant(_) => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    /// True for kinds preceded by a variable field header.
    pub fn has_var_header(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Vector(_) | Self::EnumVector(_) | Self::Variant(_)
        )
    }

    /// Scalar stored by a fixed field or a vector element.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) | Self::Vector(kind) => Some(*kind),
            Self::Enum(def) | Self::EnumVector(def) => Some(def.repr),
            _ => None,
        }
    }

    /// Check that `T` can read or write this scalar field.
    ///
    /// Enum fields accept their integer representation.
    pub(crate) fn expect_scalar<T: Scalar>(&self) -> Result<()> {
        let kind = match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Enum(def) => Some(def.repr),
            _ => None,
        };
        match kind {
            Some(kind) if kind == T::KIND => Ok(()),
            _ => Err(FastbinError::mismatch(self.to_string(), T::KIND.name())),
        }
    }

    /// Check that `T` matches the element kind of this vector field.
    pub(crate) fn expect_vector<T: Scalar>(&self) -> Result<()> {
        let kind = match self {
            Self::Vector(kind) => Some(*kind),
            Self::EnumVector(def) => Some(def.repr),
            _ => None,
        };
        match kind {
            Some(kind) if kind == T::KIND => Ok(()),
            _ => Err(FastbinError::mismatch(
                self.to_string(),
                format!("vector<{}>", T::KIND),
            )),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::Enum(def) => write!(f, "enum:{}", def.name),
            Self::String => f.write_str("string"),
            Self::Vector(kind) => write!(f, "vector<{}>", kind),
            Self::EnumVector(def) => write!(f, "vector<enum:{}>", def.name),
            Self::Object(schema) => write!(f, "struct:{}", schema.name()),
            Self::Array(schema) => write!(f, "vector<struct:{}>", schema.name()),
            Self::Variant(def) => write!(f, "{}", def),
        }
    }
}

/// Closed list of kinds a variant may hold. The tag is the position in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDef {
    kinds: Vec<FieldKind>,
}

impl VariantDef {
    pub fn new(kinds: Vec<FieldKind>) -> Result<Self> {
        if kinds.is_empty() {
            return Err(FastbinError::schema("variant declares no kinds"));
        }
        if kinds.len() > MAX_VARIANT_KINDS {
            return Err(FastbinError::TooManyKinds { count: kinds.len() });
        }
        for kind in &kinds {
            kind.validate_enum()?;
        }
        Ok(Self { kinds })
    }

    pub fn types_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn kinds(&self) -> &[FieldKind] {
        &self.kinds
    }

    /// Kind declared for `tag`.
    pub fn kind(&self, tag: u8) -> Result<&FieldKind> {
        self.kinds
            .get(usize::from(tag))
            .ok_or(FastbinError::IndexOutOfBounds {
                index: usize::from(tag),
                len: self.kinds.len(),
            })
    }
}

impl fmt::Display for VariantDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Variant<")?;
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", kind)?;
        }
        f.write_str(">")
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub doc: Vec<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            doc: Vec::new(),
        }
    }
}

/// Size of one variable field, supplied to [`Schema::calc_binary_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSize {
    /// Content length of a string or vector, or the full `binary_size()` of
    /// a variant (its own header included). The field header is added.
    Content(usize),
    /// Finalized size of a nested variable object or struct array.
    Embedded(usize),
}

impl VarSize {
    pub fn str(value: &str) -> Self {
        Self::Content(value.len())
    }

    pub fn slice<T: Scalar>(values: &[T]) -> Self {
        Self::Content(values.len() * T::WIDTH)
    }

    /// Size of a variant field holding `value`.
    pub fn variant<B: AsRef<[u8]>>(value: &Variant<'_, B>) -> Self {
        Self::Content(value.binary_size())
    }
}

/// A struct layout: ordered fields plus precomputed static offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    doc: Vec<String>,
    fields: Vec<FieldDef>,
    offsets: Vec<Option<usize>>,
    fixed_size: Option<usize>,
}

impl Schema {
    /// Build a schema. Empty structs and duplicate field names are rejected.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Result<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(FastbinError::schema(format!(
                "struct '{}' does not have any members",
                name
            )));
        }
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(FastbinError::schema(format!(
                    "struct '{}' has duplicate member '{}'",
                    name, field.name
                )));
            }
            field.kind.validate_enum()?;
        }

        let variable = fields.iter().any(|f| f.kind.is_variable());
        let mut offset = if variable { OBJECT_HEADER_SIZE } else { 0 };
        let mut offsets = Vec::with_capacity(fields.len());
        let mut static_offsets = true;
        for field in &fields {
            offsets.push(static_offsets.then_some(offset));
            match field.kind.fixed_size() {
                Some(size) if static_offsets => offset += size,
                _ => static_offsets = false,
            }
        }

        log::trace!(
            "[schema] {} fields={} size={}",
            name,
            fields.len(),
            if variable { "variable".to_string() } else { offset.to_string() }
        );

        Ok(Self {
            name,
            doc: Vec::new(),
            fields,
            offsets,
            fixed_size: (!variable).then_some(offset),
        })
    }

    pub fn with_doc(mut self, doc: Vec<String>) -> Self {
        self.doc = doc;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &[String] {
        &self.doc
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Result<&FieldDef> {
        self.fields
            .get(index)
            .ok_or(FastbinError::IndexOutOfBounds {
                index,
                len: self.fields.len(),
            })
    }

    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FastbinError::UnknownField { name: name.into() })
    }

    /// True when every field has a constant size.
    pub fn is_fixed(&self) -> bool {
        self.fixed_size.is_some()
    }

    /// Total size of a fixed-size schema.
    pub fn fixed_size(&self) -> Option<usize> {
        self.fixed_size
    }

    /// Bytes reserved in front of the first field: the self-size word for
    /// variable schemas, nothing for fixed ones.
    pub fn header_size(&self) -> usize {
        if self.is_fixed() {
            0
        } else {
            OBJECT_HEADER_SIZE
        }
    }

    /// Smallest buffer an instance can live in.
    pub fn min_size(&self) -> usize {
        self.fixed_size.unwrap_or(OBJECT_HEADER_SIZE)
    }

    /// Offset known without reading the buffer: every field up to and
    /// including the first variable one.
    pub fn static_offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied().flatten()
    }

    /// Precompute the buffer size of an instance from the sizes of its
    /// variable fields, given in declaration order.
    pub fn calc_binary_size(&self, var_sizes: &[VarSize]) -> Result<usize> {
        if let Some(size) = self.fixed_size {
            if !var_sizes.is_empty() {
                return Err(FastbinError::schema(format!(
                    "'{}' has no variable fields",
                    self.name
                )));
            }
            return Ok(size);
        }

        let mut sizes = var_sizes.iter();
        let mut total = OBJECT_HEADER_SIZE;
        for field in &self.fields {
            if let Some(size) = field.kind.fixed_size() {
                total = checked_total(total, size)?;
                continue;
            }
            let size = sizes.next().ok_or_else(|| {
                FastbinError::schema(format!(
                    "missing size for variable field '{}.{}'",
                    self.name, field.name
                ))
            })?;
            let field_size = match (size, field.kind.has_var_header()) {
                (VarSize::Content(len), true) => varfield::calc_size_aligned(*len)?,
                (VarSize::Embedded(len), false) => *len,
                (other, _) => {
                    return Err(FastbinError::mismatch(
                        field.kind.to_string(),
                        format!("{:?}", other),
                    ))
                }
            };
            total = checked_total(total, field_size)?;
        }
        if sizes.next().is_some() {
            return Err(FastbinError::schema(format!(
                "too many variable sizes for '{}'",
                self.name
            )));
        }
        Ok(total)
    }
}

fn checked_total(total: usize, size: usize) -> Result<usize> {
    total.checked_add(size).ok_or(FastbinError::SizeOverflow)
}
